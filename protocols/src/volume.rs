// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Output volumes, mutes, and the hardware volume path.
//!
//! The unit reports buttons, software and hardware volumes, mutes, and the position of the front
//! panel knob in one status image at the beginning of its data space. Volumes travel on the wire
//! as signed decibel values between -127 and 0; the user visible representation is biased by 127
//! into 0..=127.

use super::*;

/// The bias between user visible volume and the signed decibel value on the wire.
pub const VOLUME_BIAS: i32 = 127;

/// The minimum user visible volume.
pub const VOLUME_MIN: i32 = 0;
/// The maximum user visible volume.
pub const VOLUME_MAX: i32 = VOLUME_BIAS;
/// The step of user visible volume, one decibel.
pub const VOLUME_STEP: i32 = 1;

const VOLUME_STATUS_SIZE: usize = 0x100;

const BUTTONS_OFFSET: usize = 0x31;
const SW_VOLS_OFFSET: usize = 0x34;
const HW_VOLS_OFFSET: usize = 0x48;
const MUTES_OFFSET: usize = 0x5c;
const SW_HW_SWITCHES_OFFSET: usize = 0x66;
const MASTER_VOL_OFFSET: usize = 0x76;

const STATUS_ANALOGUE_OUTPUT_COUNT: usize = 10;
const STATUS_BUTTON_COUNT: usize = 2;

fn biased_volume(raw: i16) -> i32 {
    (raw as i32 + VOLUME_BIAS).clamp(VOLUME_MIN, VOLUME_MAX)
}

/// Image of the volume status area of the data space.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2VolumeStatus {
    /// State of the mute and dim buttons.
    pub buttons: [bool; STATUS_BUTTON_COUNT],
    /// Software volume of each analogue output, biased.
    pub sw_vols: [i32; STATUS_ANALOGUE_OUTPUT_COUNT],
    /// Actual volume of each analogue output including dim, biased.
    pub hw_vols: [i32; STATUS_ANALOGUE_OUTPUT_COUNT],
    /// Hardware mute of each analogue output.
    pub mutes: [bool; STATUS_ANALOGUE_OUTPUT_COUNT],
    /// Whether each analogue output follows the hardware knob.
    pub sw_hw_switches: [bool; STATUS_ANALOGUE_OUTPUT_COUNT],
    /// Position of the front panel knob, biased.
    pub master_vol: i32,
}

fn deserialize_volume_status(status: &mut Scarlett2VolumeStatus, raw: &[u8]) {
    assert_eq!(raw.len(), VOLUME_STATUS_SIZE);

    let mut doublet = [0; 2];

    status
        .buttons
        .iter_mut()
        .enumerate()
        .for_each(|(i, button)| *button = raw[BUTTONS_OFFSET + i] > 0);

    status
        .sw_vols
        .iter_mut()
        .enumerate()
        .for_each(|(i, vol)| {
            let pos = SW_VOLS_OFFSET + i * 2;
            doublet.copy_from_slice(&raw[pos..(pos + 2)]);
            *vol = biased_volume(i16::from_le_bytes(doublet));
        });

    status
        .hw_vols
        .iter_mut()
        .enumerate()
        .for_each(|(i, vol)| {
            let pos = HW_VOLS_OFFSET + i * 2;
            doublet.copy_from_slice(&raw[pos..(pos + 2)]);
            *vol = biased_volume(i16::from_le_bytes(doublet));
        });

    status
        .mutes
        .iter_mut()
        .enumerate()
        .for_each(|(i, mute)| *mute = raw[MUTES_OFFSET + i] > 0);

    status
        .sw_hw_switches
        .iter_mut()
        .enumerate()
        .for_each(|(i, switch)| *switch = raw[SW_HW_SWITCHES_OFFSET + i] > 0);

    doublet.copy_from_slice(&raw[MASTER_VOL_OFFSET..(MASTER_VOL_OFFSET + 2)]);
    status.master_vol = biased_volume(i16::from_le_bytes(doublet));
}

/// The mirrored state of outputs.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2OutputParameters {
    /// Position of the front panel knob, biased.
    pub master_vol: i32,
    /// Volume of each analogue output, biased.
    pub vols: Vec<i32>,
    /// Mute of each output covered by mute switches.
    pub mutes: Vec<bool>,
    /// Whether each analogue output follows the hardware knob.
    pub vol_sw_hw_switches: Vec<bool>,
    /// State of the mute and dim buttons.
    pub buttons: Vec<bool>,
}

/// Operation for the volume status area.
pub trait Scarlett2VolumeOperation: Scarlett2HardwareSpecification {
    fn cache_volume_status<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        status: &mut Scarlett2VolumeStatus,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        proto
            .read_data(0, VOLUME_STATUS_SIZE, timeout_ms)
            .map(|raw| deserialize_volume_status(status, &raw))
    }

    /// Merge the status image into the mirrored output state. A hardware controlled output
    /// follows the knob; a software controlled output keeps its software volume.
    fn parse_volume_status(params: &mut Scarlett2OutputParameters, status: &Scarlett2VolumeStatus) {
        params.master_vol = status.master_vol;

        let count = Self::analogue_output_count();
        (0..count).for_each(|i| {
            params.vol_sw_hw_switches[i] = Self::LINE_OUT_HW_VOL && status.sw_hw_switches[i];
            params.mutes[i] = status.mutes[i];
            params.vols[i] = if params.vol_sw_hw_switches[i] {
                status.master_vol
            } else {
                status.sw_vols[i]
            };
        });

        params
            .buttons
            .iter_mut()
            .zip(&status.buttons)
            .for_each(|(button, &state)| *button = state);
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2VolumeOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen2::Scarlett18i20Gen2Protocol,
    };

    fn status_image() -> Vec<u8> {
        let mut raw = vec![0; VOLUME_STATUS_SIZE];
        raw[BUTTONS_OFFSET] = 1;
        // Software volume of the first output is -27 dB.
        raw[SW_VOLS_OFFSET..(SW_VOLS_OFFSET + 2)].copy_from_slice(&(-27i16).to_le_bytes());
        // The second output is under hardware control and muted.
        raw[MUTES_OFFSET + 1] = 1;
        raw[SW_HW_SWITCHES_OFFSET + 1] = 1;
        // The knob is at -12 dB.
        raw[MASTER_VOL_OFFSET..(MASTER_VOL_OFFSET + 2)].copy_from_slice(&(-12i16).to_le_bytes());
        raw
    }

    #[test]
    fn volume_status_deserialization() {
        let mut status = Scarlett2VolumeStatus::default();
        deserialize_volume_status(&mut status, &status_image());

        assert_eq!(status.buttons, [true, false]);
        assert_eq!(status.sw_vols[0], 100);
        assert_eq!(status.sw_vols[1], 127);
        assert!(status.mutes[1]);
        assert!(status.sw_hw_switches[1]);
        assert_eq!(status.master_vol, 115);
    }

    #[test]
    fn volume_status_merge() {
        let mut status = Scarlett2VolumeStatus::default();
        deserialize_volume_status(&mut status, &status_image());

        let mut params = Scarlett18i20Gen2Protocol::create_output_parameters();
        Scarlett18i20Gen2Protocol::parse_volume_status(&mut params, &status);

        assert_eq!(params.master_vol, 115);
        // Software controlled output keeps its own volume.
        assert_eq!(params.vols[0], 100);
        // Hardware controlled output follows the knob.
        assert!(params.vol_sw_hw_switches[1]);
        assert_eq!(params.vols[1], 115);
        assert!(params.mutes[1]);
        assert!(params.buttons[0]);
    }

    #[test]
    fn status_read_request() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&status_image());

        let mut status = Scarlett2VolumeStatus::default();
        Scarlett18i20Gen2Protocol::cache_volume_status(&mut proto, &mut status, 10).unwrap();

        let frame = &proto.requests[0];
        assert_eq!(&frame[..4], &CMD_GET_DATA.to_le_bytes());
        assert_eq!(&frame[16..20], &0u32.to_le_bytes());
        assert_eq!(&frame[20..24], &(VOLUME_STATUS_SIZE as u32).to_le_bytes());
    }
}
