// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Configuration parameter space of the unit.
//!
//! Each parameter has a static location and size in the data space, and most have a small
//! activation number invoked after a write so that the change takes effect. Two layouts exist;
//! one for the professional segment (8i6, 18i8, 18i20 and the Gen 2 series) and one for the home
//! segment (Solo and 2i2 Gen 3).

use super::*;

/// Parameters which can be read and written in the configuration space.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigParameter {
    /// Mute/Dim buttons.
    Buttons,
    /// Volume of analogue line outputs.
    LineOutVolume,
    /// Whether the volume of an analogue output follows the hardware knob.
    SwHwVolumeSwitch,
    /// Line/Inst level of analogue inputs.
    LevelSwitch,
    /// Pad of analogue inputs.
    PadSwitch,
    /// Air of analogue inputs.
    AirSwitch,
    /// Source of S/PDIF output.
    SpdifSourceSwitch,
    /// Phantom powering of microphone inputs.
    PhantomPowerSwitch,
    /// Mass storage device mode.
    MsdModeSwitch,
    /// Main/Alt speaker selection, with talkback state in bit 1.
    MainAltSpeakerSwitch,
    /// Whether speaker switching is in effect at all.
    SpeakerSwitchingSwitch,
    /// Enable immediate values for gain halos.
    GainHaloEnable,
    /// Custom colour of each gain halo.
    GainHaloLeds,
    /// Colour of gain halos at each level; clip, pre-clip, good.
    GainHaloLevels,
    /// Talkback enable for each output of the internal mixer.
    MixTalkback,
    /// Whether phantom powering persists across power cycles.
    Retain48vSwitch,
    /// Hardware mute of each analogue output.
    OutputMutes,
    /// Direct monitor mode.
    DirectMonitorSwitch,
}

/// Location, size, and activation number of one configuration parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConfigItem {
    pub offset: usize,
    pub size: usize,
    pub activate: u32,
}

/// The layout for professional segment devices.
pub const PRO_CONFIG_ITEMS: &[(ConfigParameter, ConfigItem)] = &[
    (
        ConfigParameter::Buttons,
        ConfigItem {
            offset: 0x31,
            size: 1,
            activate: 2,
        },
    ),
    (
        ConfigParameter::LineOutVolume,
        ConfigItem {
            offset: 0x34,
            size: 2,
            activate: 1,
        },
    ),
    (
        ConfigParameter::OutputMutes,
        ConfigItem {
            offset: 0x5c,
            size: 1,
            activate: 1,
        },
    ),
    (
        ConfigParameter::SwHwVolumeSwitch,
        ConfigItem {
            offset: 0x66,
            size: 1,
            activate: 3,
        },
    ),
    (
        ConfigParameter::LevelSwitch,
        ConfigItem {
            offset: 0x7c,
            size: 1,
            activate: 7,
        },
    ),
    (
        ConfigParameter::PadSwitch,
        ConfigItem {
            offset: 0x84,
            size: 1,
            activate: 8,
        },
    ),
    (
        ConfigParameter::AirSwitch,
        ConfigItem {
            offset: 0x8c,
            size: 1,
            activate: 8,
        },
    ),
    (
        ConfigParameter::SpdifSourceSwitch,
        ConfigItem {
            offset: 0x94,
            size: 1,
            activate: 6,
        },
    ),
    (
        ConfigParameter::PhantomPowerSwitch,
        ConfigItem {
            offset: 0x9c,
            size: 1,
            activate: 8,
        },
    ),
    (
        ConfigParameter::MsdModeSwitch,
        ConfigItem {
            offset: 0x9d,
            size: 1,
            activate: 6,
        },
    ),
    (
        ConfigParameter::Retain48vSwitch,
        ConfigItem {
            offset: 0x9e,
            size: 1,
            activate: 0,
        },
    ),
    (
        ConfigParameter::MainAltSpeakerSwitch,
        ConfigItem {
            offset: 0x9f,
            size: 1,
            activate: 10,
        },
    ),
    (
        ConfigParameter::SpeakerSwitchingSwitch,
        ConfigItem {
            offset: 0xa0,
            size: 1,
            activate: 10,
        },
    ),
    (
        ConfigParameter::GainHaloEnable,
        ConfigItem {
            offset: 0xa1,
            size: 1,
            activate: 9,
        },
    ),
    (
        ConfigParameter::GainHaloLeds,
        ConfigItem {
            offset: 0xa2,
            size: 1,
            activate: 9,
        },
    ),
    (
        ConfigParameter::GainHaloLevels,
        ConfigItem {
            offset: 0xa6,
            size: 1,
            activate: 11,
        },
    ),
    (
        ConfigParameter::MixTalkback,
        ConfigItem {
            offset: 0xb0,
            size: 2,
            activate: 10,
        },
    ),
];

/// The layout for home segment devices.
pub const HOME_CONFIG_ITEMS: &[(ConfigParameter, ConfigItem)] = &[
    (
        ConfigParameter::Retain48vSwitch,
        ConfigItem {
            offset: 0x05,
            size: 1,
            activate: 0,
        },
    ),
    (
        ConfigParameter::PhantomPowerSwitch,
        ConfigItem {
            offset: 0x06,
            size: 1,
            activate: 3,
        },
    ),
    (
        ConfigParameter::DirectMonitorSwitch,
        ConfigItem {
            offset: 0x07,
            size: 1,
            activate: 4,
        },
    ),
    (
        ConfigParameter::LevelSwitch,
        ConfigItem {
            offset: 0x08,
            size: 1,
            activate: 7,
        },
    ),
    (
        ConfigParameter::AirSwitch,
        ConfigItem {
            offset: 0x09,
            size: 1,
            activate: 8,
        },
    ),
    (
        ConfigParameter::GainHaloEnable,
        ConfigItem {
            offset: 0x16,
            size: 1,
            activate: 9,
        },
    ),
    (
        ConfigParameter::GainHaloLeds,
        ConfigItem {
            offset: 0x17,
            size: 1,
            activate: 9,
        },
    ),
    (
        ConfigParameter::GainHaloLevels,
        ConfigItem {
            offset: 0x1a,
            size: 1,
            activate: 11,
        },
    ),
];

/// Operations against the configuration space, provided for every model.
pub trait Scarlett2ConfigOperation: Scarlett2HardwareSpecification {
    /// Read `count` consecutive entries of the parameter. The result carries `size` bytes per
    /// entry.
    fn read_config<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        param: ConfigParameter,
        count: usize,
        timeout_ms: u32,
    ) -> Result<Vec<u8>, Error> {
        let item = Self::config_item(param).ok_or_else(|| {
            let msg = format!("configuration parameter not available: {:?}", param);
            Error::new(Scarlett2ControlError::NotSupported, &msg)
        })?;
        proto.read_data(item.offset, item.size * count, timeout_ms)
    }

    /// Write one entry of the parameter, then invoke its activation when it has one. The value is
    /// truncated to the size of the entry in little endian order.
    fn write_config<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        param: ConfigParameter,
        index: usize,
        value: i32,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        let item = Self::config_item(param).ok_or_else(|| {
            let msg = format!("configuration parameter not available: {:?}", param);
            Error::new(Scarlett2ControlError::NotSupported, &msg)
        })?;

        let mut args = Vec::with_capacity(8 + item.size);
        args.extend_from_slice(&((item.offset + index * item.size) as u32).to_le_bytes());
        args.extend_from_slice(&(item.size as u32).to_le_bytes());
        args.extend_from_slice(&value.to_le_bytes()[..item.size]);
        proto.transaction(CMD_SET_DATA, &args, 0, timeout_ms)?;

        if item.activate > 0 {
            proto.data_command(item.activate, timeout_ms)?;
        }

        Ok(())
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2ConfigOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen2::Scarlett18i20Gen2Protocol,
        crate::gen3::ScarlettSoloGen3Protocol,
    };

    #[test]
    fn item_lookup() {
        let item = Scarlett18i20Gen2Protocol::config_item(ConfigParameter::LineOutVolume).unwrap();
        assert_eq!(item.offset, 0x34);
        assert_eq!(item.size, 2);
        assert_eq!(item.activate, 1);

        assert!(Scarlett18i20Gen2Protocol::config_item(ConfigParameter::DirectMonitorSwitch)
            .is_none());
        assert!(ScarlettSoloGen3Protocol::config_item(ConfigParameter::MixTalkback).is_none());
    }

    #[test]
    fn volume_write_request() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&[]);
        proto.queue_response(&[]);

        Scarlett18i20Gen2Protocol::write_config(
            &mut proto,
            ConfigParameter::LineOutVolume,
            0,
            100 - 127,
            10,
        )
        .unwrap();

        assert_eq!(proto.requests.len(), 2);

        let frame = &proto.requests[0];
        assert_eq!(&frame[..4], &CMD_SET_DATA.to_le_bytes());
        // offset 0x34 + 0 * 2, 2 bytes, value -27 as u16.
        assert_eq!(&frame[16..20], &0x34u32.to_le_bytes());
        assert_eq!(&frame[20..24], &2u32.to_le_bytes());
        assert_eq!(&frame[24..26], &[0xe5, 0xff]);

        let frame = &proto.requests[1];
        assert_eq!(&frame[..4], &CMD_DATA_CMD.to_le_bytes());
        assert_eq!(&frame[16..20], &1u32.to_le_bytes());
    }

    #[test]
    fn mute_write_request() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&[]);
        proto.queue_response(&[]);

        Scarlett18i20Gen2Protocol::write_config(
            &mut proto,
            ConfigParameter::OutputMutes,
            0,
            1,
            10,
        )
        .unwrap();

        let frame = &proto.requests[0];
        assert_eq!(&frame[16..20], &0x5cu32.to_le_bytes());
        assert_eq!(&frame[20..24], &1u32.to_le_bytes());
        assert_eq!(frame[24], 1);

        let frame = &proto.requests[1];
        assert_eq!(&frame[16..20], &1u32.to_le_bytes());
    }

    #[test]
    fn retain_48v_has_no_activation() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&[]);

        ScarlettSoloGen3Protocol::write_config(
            &mut proto,
            ConfigParameter::Retain48vSwitch,
            0,
            1,
            10,
        )
        .unwrap();

        assert_eq!(proto.requests.len(), 1);
    }
}
