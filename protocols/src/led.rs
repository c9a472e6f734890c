// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Gain halo LEDs.
//!
//! Models with gain halos drive them from the measured level by default, with one colour per
//! level region. A custom mode colours each halo individually instead.

use super::*;

/// The number of level regions; clip, pre-clip, good.
pub const LED_LEVEL_COUNT: usize = 3;

/// The number of selectable colours.
pub const LED_COLOR_COUNT: usize = 8;

/// The wire value of the enable flag in custom mode.
const LED_CUSTOM_FLAG: u8 = 0x02;

/// The mirrored state of gain halo LEDs.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2LedParameters {
    /// Whether halos show custom colours instead of measured levels.
    pub custom: bool,
    /// Colour of each level region.
    pub level_colors: [usize; LED_LEVEL_COUNT],
    /// Custom colour of each halo.
    pub halo_colors: Vec<usize>,
}

/// Operation for gain halo LEDs.
pub trait Scarlett2LedOperation: Scarlett2HardwareSpecification + config::Scarlett2ConfigOperation {
    fn cache_led_state<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &mut Scarlett2LedParameters,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        if Self::GAIN_HALO_COUNT == 0 {
            return Ok(());
        }

        let raw = Self::read_config(proto, ConfigParameter::GainHaloEnable, 1, timeout_ms)?;
        params.custom = raw[0] == LED_CUSTOM_FLAG;

        let raw = Self::read_config(
            proto,
            ConfigParameter::GainHaloLevels,
            LED_LEVEL_COUNT,
            timeout_ms,
        )?;
        params
            .level_colors
            .iter_mut()
            .enumerate()
            .for_each(|(i, color)| *color = (raw[i] as usize).min(LED_COLOR_COUNT - 1));

        let raw = Self::read_config(
            proto,
            ConfigParameter::GainHaloLeds,
            Self::GAIN_HALO_COUNT,
            timeout_ms,
        )?;
        params
            .halo_colors
            .iter_mut()
            .enumerate()
            .for_each(|(i, color)| *color = (raw[i] as usize).min(LED_COLOR_COUNT - 1));

        Ok(())
    }

    /// The wire value of the custom mode flag.
    fn led_custom_write_value(custom: bool) -> i32 {
        if custom {
            LED_CUSTOM_FLAG as i32
        } else {
            0
        }
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2LedOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen3::Scarlett2i2Gen3Protocol,
    };

    #[test]
    fn led_state_decoding() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&[LED_CUSTOM_FLAG]);
        proto.queue_response(&[1, 2, 9]);
        proto.queue_response(&[4, 5]);

        let mut params = Scarlett2i2Gen3Protocol::create_led_parameters();
        Scarlett2i2Gen3Protocol::cache_led_state(&mut proto, &mut params, 10).unwrap();

        assert!(params.custom);
        // Out of range colours saturate.
        assert_eq!(params.level_colors, [1, 2, 7]);
        assert_eq!(params.halo_colors, vec![4, 5]);

        assert_eq!(Scarlett2i2Gen3Protocol::led_custom_write_value(true), 2);
        assert_eq!(Scarlett2i2Gen3Protocol::led_custom_write_value(false), 0);
    }
}
