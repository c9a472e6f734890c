// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Preamp switches of analogue inputs.
//!
//! Line/Inst level, pad, air, and phantom powering are configuration parameters. Depending on
//! the model a parameter is stored as one byte per channel or as a single bitmask byte; the
//! encoding is a static property of the model, never probed at runtime.

use super::*;

/// The mirrored state of input switches.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2InputSwitchParameters {
    /// Line/Inst level of inputs with selectable level.
    pub level_switches: Vec<bool>,
    /// Pad of inputs with optional pad.
    pub pad_switches: Vec<bool>,
    /// Air of inputs with the air feature.
    pub air_switches: Vec<bool>,
    /// Phantom powering switches.
    pub phantom_switches: Vec<bool>,
    /// Whether phantom powering persists across power cycles.
    pub retain_48v: bool,
}

/// Pack per-channel switches into the single byte used by bitmask models.
pub fn pack_switch_bitmask(switches: &[bool], offset: usize) -> i32 {
    switches
        .iter()
        .enumerate()
        .filter(|(_, &state)| state)
        .fold(0, |mask, (i, _)| mask | (1 << (i + offset)))
}

/// Operation for the switches of analogue inputs.
pub trait Scarlett2InputOperation: Scarlett2HardwareSpecification + config::Scarlett2ConfigOperation {
    fn cache_input_switches<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &mut Scarlett2InputSwitchParameters,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        if Self::PAD_INPUT_COUNT > 0 {
            let raw = Self::read_config(
                proto,
                ConfigParameter::PadSwitch,
                Self::PAD_INPUT_COUNT,
                timeout_ms,
            )?;
            params
                .pad_switches
                .iter_mut()
                .enumerate()
                .for_each(|(i, switch)| *switch = raw[i] > 0);
        }

        if Self::AIR_INPUT_COUNT > 0 {
            let count = if Self::AIR_INPUT_BITMASK {
                1
            } else {
                Self::AIR_INPUT_COUNT
            };
            let raw = Self::read_config(proto, ConfigParameter::AirSwitch, count, timeout_ms)?;
            params
                .air_switches
                .iter_mut()
                .enumerate()
                .for_each(|(i, switch)| {
                    *switch = if Self::AIR_INPUT_BITMASK {
                        raw[0] & (1 << i) > 0
                    } else {
                        raw[i] > 0
                    };
                });
        }

        if Self::LEVEL_INPUT_COUNT > 0 {
            let count = if Self::LEVEL_INPUT_BITMASK {
                1
            } else {
                Self::LEVEL_INPUT_COUNT
            };
            let raw = Self::read_config(proto, ConfigParameter::LevelSwitch, count, timeout_ms)?;
            params
                .level_switches
                .iter_mut()
                .enumerate()
                .for_each(|(i, switch)| {
                    let index = i + Self::LEVEL_INPUT_OFFSET;
                    *switch = if Self::LEVEL_INPUT_BITMASK {
                        raw[0] & (1 << index) > 0
                    } else {
                        raw[index] > 0
                    };
                });
        }

        if Self::PHANTOM_SWITCH_COUNT > 0 {
            let raw = Self::read_config(proto, ConfigParameter::PhantomPowerSwitch, 1, timeout_ms)?;
            params
                .phantom_switches
                .iter_mut()
                .enumerate()
                .for_each(|(i, switch)| *switch = raw[0] & (1 << i) > 0);
        }

        if Self::HAS_RETAIN_48V {
            let raw = Self::read_config(proto, ConfigParameter::Retain48vSwitch, 1, timeout_ms)?;
            params.retain_48v = raw[0] > 0;
        }

        Ok(())
    }

    /// The index and wire value for a write of the level switch of the channel.
    fn level_switch_write_value(
        params: &Scarlett2InputSwitchParameters,
        index: usize,
    ) -> (usize, i32) {
        if Self::LEVEL_INPUT_BITMASK {
            (
                0,
                pack_switch_bitmask(&params.level_switches, Self::LEVEL_INPUT_OFFSET),
            )
        } else {
            (
                index + Self::LEVEL_INPUT_OFFSET,
                params.level_switches[index] as i32,
            )
        }
    }

    /// The index and wire value for a write of the air switch of the channel.
    fn air_switch_write_value(
        params: &Scarlett2InputSwitchParameters,
        index: usize,
    ) -> (usize, i32) {
        if Self::AIR_INPUT_BITMASK {
            (0, pack_switch_bitmask(&params.air_switches, 0))
        } else {
            (index, params.air_switches[index] as i32)
        }
    }

    /// The wire value for a write of phantom powering; always a bitmask over the switches.
    fn phantom_switch_write_value(params: &Scarlett2InputSwitchParameters) -> i32 {
        pack_switch_bitmask(&params.phantom_switches, 0)
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2InputOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen3::{Scarlett2i2Gen3Protocol, Scarlett18i20Gen3Protocol},
    };

    #[test]
    fn bitmask_packing() {
        assert_eq!(pack_switch_bitmask(&[true, false, true], 0), 0b101);
        assert_eq!(pack_switch_bitmask(&[true], 1), 0b10);
        assert_eq!(pack_switch_bitmask(&[false, false], 0), 0);
    }

    #[test]
    fn per_channel_write_values() {
        let mut params = Scarlett18i20Gen3Protocol::create_input_switch_parameters();
        params.level_switches[1] = true;
        params.air_switches[2] = true;

        assert_eq!(
            Scarlett18i20Gen3Protocol::level_switch_write_value(&params, 1),
            (1, 1)
        );
        assert_eq!(
            Scarlett18i20Gen3Protocol::air_switch_write_value(&params, 2),
            (2, 1)
        );
    }

    #[test]
    fn bitmask_write_values() {
        let mut params = Scarlett2i2Gen3Protocol::create_input_switch_parameters();
        params.level_switches[0] = true;
        params.level_switches[1] = true;
        params.air_switches[1] = true;

        assert_eq!(
            Scarlett2i2Gen3Protocol::level_switch_write_value(&params, 1),
            (0, 0b11)
        );
        assert_eq!(
            Scarlett2i2Gen3Protocol::air_switch_write_value(&params, 0),
            (0, 0b10)
        );
    }

    #[test]
    fn bitmask_cache_decoding() {
        let mut proto = TestProtocol::default();
        // Air, level, phantom, retain, in the order the cache operation reads them.
        proto.queue_response(&[0b01]);
        proto.queue_response(&[0b10]);
        proto.queue_response(&[0b01]);
        proto.queue_response(&[0x01]);

        let mut params = Scarlett2i2Gen3Protocol::create_input_switch_parameters();
        Scarlett2i2Gen3Protocol::cache_input_switches(&mut proto, &mut params, 10).unwrap();

        assert_eq!(params.air_switches, vec![true, false]);
        assert_eq!(params.level_switches, vec![false, true]);
        assert_eq!(params.phantom_switches, vec![true]);
        assert!(params.retain_48v);
    }
}
