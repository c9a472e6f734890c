// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Speaker switching, talkback, and direct monitor.

use super::*;

/// State of speaker switching.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpeakerSwitch {
    /// Switching is not in effect.
    Off,
    Main,
    Alt,
}

impl Default for SpeakerSwitch {
    fn default() -> Self {
        Self::Off
    }
}

/// The flavour of direct monitor a model has.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectMonitorVariant {
    /// Off/On.
    Mono,
    /// Off/Mono/Stereo.
    Stereo,
}

/// The mirrored state of monitoring features.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2MonitorParameters {
    pub speaker_switch: SpeakerSwitch,
    pub talkback_switch: bool,
    /// Direct monitor state; 0 is off, then mono and stereo where available.
    pub direct_monitor: u32,
    /// Talkback enable for each output of the internal mixer.
    pub mix_talkbacks: Vec<bool>,
}

/// Operation for monitoring features.
pub trait Scarlett2MonitorOperation: Scarlett2HardwareSpecification + config::Scarlett2ConfigOperation {
    fn cache_monitor_state<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &mut Scarlett2MonitorParameters,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        if Self::HAS_SPEAKER_SWITCHING {
            let switching =
                Self::read_config(proto, ConfigParameter::SpeakerSwitchingSwitch, 1, timeout_ms)?;
            let state =
                Self::read_config(proto, ConfigParameter::MainAltSpeakerSwitch, 1, timeout_ms)?;

            params.speaker_switch = if switching[0] == 0 {
                SpeakerSwitch::Off
            } else if state[0] & 0x01 > 0 {
                SpeakerSwitch::Alt
            } else {
                SpeakerSwitch::Main
            };
            if Self::HAS_TALKBACK {
                params.talkback_switch = state[0] & 0x02 > 0;
            }
        }

        if let Some(variant) = Self::DIRECT_MONITOR {
            let raw = Self::read_config(proto, ConfigParameter::DirectMonitorSwitch, 1, timeout_ms)?;
            params.direct_monitor = match variant {
                DirectMonitorVariant::Mono => (raw[0] > 0) as u32,
                DirectMonitorVariant::Stereo => {
                    if raw[0] < 3 {
                        raw[0] as u32
                    } else {
                        0
                    }
                }
            };
        }

        if Self::HAS_TALKBACK {
            let raw = Self::read_config(proto, ConfigParameter::MixTalkback, 1, timeout_ms)?;
            let mut doublet = [0; 2];
            doublet.copy_from_slice(&raw[..2]);
            let mask = u16::from_le_bytes(doublet);
            params
                .mix_talkbacks
                .iter_mut()
                .enumerate()
                .for_each(|(i, talkback)| *talkback = mask & (1 << i) > 0);
        }

        Ok(())
    }

    /// Write a change of speaker and talkback state. The switching enable is only touched when
    /// crossing the off boundary; the speaker selection byte carries talkback in bit 1.
    fn update_speaker_state<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &mut Scarlett2MonitorParameters,
        speaker: SpeakerSwitch,
        talkback: bool,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        if params.speaker_switch == speaker && params.talkback_switch == talkback {
            return Ok(());
        }

        let was_off = params.speaker_switch == SpeakerSwitch::Off;
        let is_off = speaker == SpeakerSwitch::Off;

        params.speaker_switch = speaker;
        params.talkback_switch = talkback;

        if was_off != is_off {
            Self::write_config(
                proto,
                ConfigParameter::SpeakerSwitchingSwitch,
                0,
                !is_off as i32,
                timeout_ms,
            )?;
        }

        let mut value = (speaker == SpeakerSwitch::Alt) as i32;
        if Self::HAS_TALKBACK {
            value |= (talkback as i32) << 1;
        }
        Self::write_config(
            proto,
            ConfigParameter::MainAltSpeakerSwitch,
            0,
            value,
            timeout_ms,
        )
    }

    /// The wire value of the per-mix talkback mask.
    fn mix_talkback_write_value(params: &Scarlett2MonitorParameters) -> i32 {
        params
            .mix_talkbacks
            .iter()
            .enumerate()
            .filter(|(_, &talkback)| talkback)
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2MonitorOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen3::{Scarlett2i2Gen3Protocol, Scarlett18i20Gen3Protocol},
    };

    #[test]
    fn monitor_state_decoding() {
        let mut proto = TestProtocol::default();
        // Switching enabled, alt selected with talkback, mix talkback mask.
        proto.queue_response(&[1]);
        proto.queue_response(&[0x03]);
        proto.queue_response(&0x0005u16.to_le_bytes());

        let mut params = Scarlett18i20Gen3Protocol::create_monitor_parameters();
        Scarlett18i20Gen3Protocol::cache_monitor_state(&mut proto, &mut params, 10).unwrap();

        assert_eq!(params.speaker_switch, SpeakerSwitch::Alt);
        assert!(params.talkback_switch);
        assert!(params.mix_talkbacks[0]);
        assert!(!params.mix_talkbacks[1]);
        assert!(params.mix_talkbacks[2]);
    }

    #[test]
    fn direct_monitor_decoding() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&[2]);

        let mut params = Scarlett2i2Gen3Protocol::create_monitor_parameters();
        Scarlett2i2Gen3Protocol::cache_monitor_state(&mut proto, &mut params, 10).unwrap();
        assert_eq!(params.direct_monitor, 2);

        // Out of range values fall back to off.
        proto.queue_response(&[3]);
        Scarlett2i2Gen3Protocol::cache_monitor_state(&mut proto, &mut params, 10).unwrap();
        assert_eq!(params.direct_monitor, 0);
    }

    #[test]
    fn speaker_switch_transitions() {
        let mut proto = TestProtocol::default();
        (0..4).for_each(|_| proto.queue_response(&[]));

        let mut params = Scarlett18i20Gen3Protocol::create_monitor_parameters();
        // Off to alt crosses the boundary and touches the switching enable first.
        Scarlett18i20Gen3Protocol::update_speaker_state(
            &mut proto,
            &mut params,
            SpeakerSwitch::Alt,
            true,
            10,
        )
        .unwrap();

        // Two configuration writes, each with activation.
        assert_eq!(proto.requests.len(), 4);
        let frame = &proto.requests[0];
        assert_eq!(&frame[16..20], &0xa0u32.to_le_bytes());
        assert_eq!(frame[24], 1);
        let frame = &proto.requests[2];
        assert_eq!(&frame[16..20], &0x9fu32.to_le_bytes());
        assert_eq!(frame[24], 0x03);

        // Alt to main stays within switching; only the selection byte is written.
        proto.requests.clear();
        (0..2).for_each(|_| proto.queue_response(&[]));
        Scarlett18i20Gen3Protocol::update_speaker_state(
            &mut proto,
            &mut params,
            SpeakerSwitch::Main,
            true,
            10,
        )
        .unwrap();
        assert_eq!(proto.requests.len(), 2);
        assert_eq!(&proto.requests[0][16..20], &0x9fu32.to_le_bytes());
    }
}
