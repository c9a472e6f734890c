// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! The internal matrix mixer.
//!
//! Each mix is a weighted sum of up to `mixer_input_count` sources. The gain of a cell is a half
//! decibel index between 0 and 172 covering -80 dB to +6 dB; index 160 is unity. The unit takes
//! 16 bit linear coefficients, looked up in a precomputed table which approximates
//! `8192 * 10^((index - 160) / 40)`.

use super::*;

/// The lowest gain of a mixer cell in dB.
pub const MIXER_GAIN_MIN_DB: i32 = -80;
/// The highest gain of a mixer cell in dB.
pub const MIXER_GAIN_MAX_DB: i32 = 6;
/// The bias from half dB values into the index domain.
pub const MIXER_GAIN_BIAS: i32 = -MIXER_GAIN_MIN_DB * 2;
/// The highest half dB index of a mixer cell.
pub const MIXER_GAIN_MAX: i32 = (MIXER_GAIN_MAX_DB - MIXER_GAIN_MIN_DB) * 2;
/// The step of the half dB index.
pub const MIXER_GAIN_STEP: i32 = 1;

/// The linear coefficient transmitted for the talkback contribution, unity.
const TALKBACK_COEFFICIENT: u16 = 0x2000;

/// Map from half dB index to 16 bit linear coefficient;
/// `int(8192 * pow(10, ((index - 160) / 2 / 20)))`.
pub const MIXER_VALUES: [u16; 173] = [
    0, 0, 0, 0, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1,
    2, 2, 2, 2, 2, 2, 2, 3,
    3, 3, 3, 3, 4, 4, 4, 4,
    5, 5, 5, 6, 6, 6, 7, 7,
    8, 8, 9, 9, 10, 10, 11, 12,
    12, 13, 14, 15, 16, 17, 18, 19,
    20, 21, 23, 24, 25, 27, 29, 30,
    32, 34, 36, 38, 41, 43, 46, 48,
    51, 54, 57, 61, 65, 68, 73, 77,
    81, 86, 91, 97, 103, 109, 115, 122,
    129, 137, 145, 154, 163, 173, 183, 194,
    205, 217, 230, 244, 259, 274, 290, 307,
    326, 345, 365, 387, 410, 434, 460, 487,
    516, 547, 579, 614, 650, 689, 730, 773,
    819, 867, 919, 973, 1031, 1092, 1157, 1225,
    1298, 1375, 1456, 1543, 1634, 1731, 1833, 1942,
    2057, 2179, 2308, 2445, 2590, 2744, 2906, 3078,
    3261, 3454, 3659, 3876, 4105, 4349, 4606, 4879,
    5168, 5475, 5799, 6143, 6507, 6892, 7301, 7733,
    8192, 8677, 9191, 9736, 10313, 10924, 11571, 12257,
    12983, 13752, 14567, 15430, 16345,
];

/// High halves of the 32 bit floating point values stored in the software configuration area for
/// each half dB index. The lowest index encodes as -128.0 for compatibility with the vendor
/// application.
pub const SW_CONFIG_MIXER_VALUES: [u16; 173] = [
    0xc300, 0xc29f, 0xc29e, 0xc29d, 0xc29c, 0xc29b, 0xc29a, 0xc299,
    0xc298, 0xc297, 0xc296, 0xc295, 0xc294, 0xc293, 0xc292, 0xc291,
    0xc290, 0xc28f, 0xc28e, 0xc28d, 0xc28c, 0xc28b, 0xc28a, 0xc289,
    0xc288, 0xc287, 0xc286, 0xc285, 0xc284, 0xc283, 0xc282, 0xc281,
    0xc280, 0xc27e, 0xc27c, 0xc27a, 0xc278, 0xc276, 0xc274, 0xc272,
    0xc270, 0xc26e, 0xc26c, 0xc26a, 0xc268, 0xc266, 0xc264, 0xc262,
    0xc260, 0xc25e, 0xc25c, 0xc25a, 0xc258, 0xc256, 0xc254, 0xc252,
    0xc250, 0xc24e, 0xc24c, 0xc24a, 0xc248, 0xc246, 0xc244, 0xc242,
    0xc240, 0xc23e, 0xc23c, 0xc23a, 0xc238, 0xc236, 0xc234, 0xc232,
    0xc230, 0xc22e, 0xc22c, 0xc22a, 0xc228, 0xc226, 0xc224, 0xc222,
    0xc220, 0xc21e, 0xc21c, 0xc21a, 0xc218, 0xc216, 0xc214, 0xc212,
    0xc210, 0xc20e, 0xc20c, 0xc20a, 0xc208, 0xc206, 0xc204, 0xc202,
    0xc200, 0xc1fc, 0xc1f8, 0xc1f4, 0xc1f0, 0xc1ec, 0xc1e8, 0xc1e4,
    0xc1e0, 0xc1dc, 0xc1d8, 0xc1d4, 0xc1d0, 0xc1cc, 0xc1c8, 0xc1c4,
    0xc1c0, 0xc1bc, 0xc1b8, 0xc1b4, 0xc1b0, 0xc1ac, 0xc1a8, 0xc1a4,
    0xc1a0, 0xc19c, 0xc198, 0xc194, 0xc190, 0xc18c, 0xc188, 0xc184,
    0xc180, 0xc178, 0xc170, 0xc168, 0xc160, 0xc158, 0xc150, 0xc148,
    0xc140, 0xc138, 0xc130, 0xc128, 0xc120, 0xc118, 0xc110, 0xc108,
    0xc100, 0xc0f0, 0xc0e0, 0xc0d0, 0xc0c0, 0xc0b0, 0xc0a0, 0xc090,
    0xc080, 0xc060, 0xc040, 0xc020, 0xc000, 0xbfc0, 0xbf80, 0xbf00,
    0x0000, 0x3f00, 0x3f80, 0x3fc0, 0x4000, 0x4020, 0x4040, 0x4060,
    0x4080, 0x4090, 0x40a0, 0x40b0, 0x40c0,
];

/// Decode a 32 bit floating point value into a signed half dB value between -160 and 12. Any
/// bit pattern is accepted, including infinities and NaNs.
pub fn float_to_mixer_level(v: u32) -> i32 {
    let exp = (v >> 23) & 0xff;
    // abs(v) < 0.5
    if exp < 0x7e {
        return 0;
    }

    let sign = v >> 31 > 0;
    // abs(v) > 80.0
    if exp > 0x85 {
        return if sign { -160 } else { 12 };
    }

    let frac = ((v & 0x007fffff) | 0x00800000) >> (0x95 - exp);
    let res = if sign { -(frac as i32) } else { frac as i32 };

    res.clamp(-160, 12)
}

/// Invert a 16 bit linear coefficient into the half dB index; the first index whose coefficient
/// reaches the value, saturating at the maximum.
pub fn nearest_mixer_level(coefficient: u16) -> usize {
    MIXER_VALUES
        .iter()
        .position(|&value| value >= coefficient)
        .unwrap_or(MIXER_GAIN_MAX as usize)
}

/// The mirrored state of the matrix mixer.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2MixerParameters {
    /// Half dB gain index of each cell, per mix then per input.
    pub gains: Vec<Vec<usize>>,
    /// Mute of each cell, per mix then per input.
    pub mutes: Vec<Vec<bool>>,
}

/// Operation for the matrix mixer.
pub trait Scarlett2MixerOperation: Scarlett2HardwareSpecification {
    /// The payload of the request updating one mix. A muted cell transmits the coefficient of
    /// silence; models with a talkback bus append one unity coefficient for its contribution.
    fn serialize_mix(params: &Scarlett2MixerParameters, mix: usize) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&(mix as u16).to_le_bytes());
        params.gains[mix]
            .iter()
            .zip(&params.mutes[mix])
            .for_each(|(&gain, &mute)| {
                let index = if mute { 0 } else { gain };
                raw.extend_from_slice(&MIXER_VALUES[index].to_le_bytes());
            });
        if Self::HAS_TALKBACK {
            raw.extend_from_slice(&TALKBACK_COEFFICIENT.to_le_bytes());
        }
        raw
    }

    fn update_mix<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &Scarlett2MixerParameters,
        mix: usize,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        if mix >= Self::mixer_output_count() {
            let msg = format!("invalid index of mix: {}", mix);
            Err(Error::new(Scarlett2ControlError::BadArgument, &msg))?;
        }
        let raw = Self::serialize_mix(params, mix);
        proto.transaction(CMD_SET_MIX, &raw, 0, timeout_ms).map(|_| ())
    }

    /// Read the coefficients of one mix back and invert them into half dB indices.
    fn cache_mix<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &mut Scarlett2MixerParameters,
        mix: usize,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        if mix >= Self::mixer_output_count() {
            let msg = format!("invalid index of mix: {}", mix);
            Err(Error::new(Scarlett2ControlError::BadArgument, &msg))?;
        }

        let count = Self::mixer_input_count();
        let mut args = [0; 4];
        args[..2].copy_from_slice(&(mix as u16).to_le_bytes());
        args[2..].copy_from_slice(&(count as u16).to_le_bytes());

        let raw = proto.transaction(CMD_GET_MIX, &args, 2 * count, timeout_ms)?;
        let mut doublet = [0; 2];
        params.gains[mix]
            .iter_mut()
            .enumerate()
            .for_each(|(i, gain)| {
                doublet.copy_from_slice(&raw[(i * 2)..(i * 2 + 2)]);
                *gain = nearest_mixer_level(u16::from_le_bytes(doublet));
            });

        Ok(())
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2MixerOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen2::Scarlett18i20Gen2Protocol,
        crate::gen3::Scarlett18i20Gen3Protocol,
    };

    #[test]
    fn coefficient_quantization_round_trip() {
        // Inversion returns the first index carrying the coefficient; past index 48 the table is
        // strictly increasing and the round trip is exact.
        (0..=MIXER_GAIN_MAX as usize).for_each(|index| {
            let first = MIXER_VALUES
                .iter()
                .position(|&value| value == MIXER_VALUES[index])
                .unwrap();
            assert_eq!(nearest_mixer_level(MIXER_VALUES[index]), first);
        });
        (49..=MIXER_GAIN_MAX as usize).for_each(|index| {
            assert_eq!(nearest_mixer_level(MIXER_VALUES[index]), index);
        });
        assert_eq!(MIXER_VALUES[MIXER_GAIN_MAX as usize], 16345);
        assert_eq!(nearest_mixer_level(0xffff), MIXER_GAIN_MAX as usize);
    }

    #[test]
    fn float_decoding() {
        // 0.0 is unity in the half dB domain.
        assert_eq!(float_to_mixer_level(0x00000000), 0);
        // 6.0.
        assert_eq!(float_to_mixer_level(0x40c00000), 12);
        // -6.0.
        assert_eq!(float_to_mixer_level(0xc0c00000), -12);
        // -128.0 saturates.
        assert_eq!(float_to_mixer_level(0xc3000000), -160);
        // Positive infinity saturates.
        assert_eq!(float_to_mixer_level(0x7f800000), 12);
        // Denormals collapse to unity.
        assert_eq!(float_to_mixer_level(0x00000001), 0);

        // The software configuration table decodes back to its own index.
        SW_CONFIG_MIXER_VALUES
            .iter()
            .enumerate()
            .for_each(|(index, &high)| {
                let level = float_to_mixer_level((high as u32) << 16);
                assert_eq!(level + MIXER_GAIN_BIAS, index as i32);
            });
    }

    #[test]
    fn mix_serialization() {
        let mut params = Scarlett18i20Gen2Protocol::create_mixer_parameters();
        params.gains[0][1] = 160;
        params.gains[0][2] = 172;
        params.mutes[0][2] = true;

        let raw = Scarlett18i20Gen2Protocol::serialize_mix(&params, 0);
        // Mix number, then one coefficient per input.
        assert_eq!(raw.len(), 2 + 2 * 18);
        assert_eq!(&raw[..2], &[0, 0]);
        assert_eq!(&raw[2..4], &[0, 0]);
        assert_eq!(&raw[4..6], &8192u16.to_le_bytes());
        // The muted cell transmits silence regardless of its gain.
        assert_eq!(&raw[6..8], &[0, 0]);
    }

    #[test]
    fn talkback_contribution_is_appended() {
        let params = Scarlett18i20Gen3Protocol::create_mixer_parameters();
        let raw = Scarlett18i20Gen3Protocol::serialize_mix(&params, 11);
        assert_eq!(raw.len(), 2 + 2 * 24 + 2);
        assert_eq!(&raw[..2], &11u16.to_le_bytes());
        assert_eq!(&raw[(raw.len() - 2)..], &TALKBACK_COEFFICIENT.to_le_bytes());
    }

    #[test]
    fn mix_read_back() {
        let mut proto = TestProtocol::default();
        let mut resp = Vec::new();
        (0..18u16).for_each(|i| {
            resp.extend_from_slice(&MIXER_VALUES[(i as usize) * 9].to_le_bytes())
        });
        proto.queue_response(&resp);

        let mut params = Scarlett18i20Gen2Protocol::create_mixer_parameters();
        Scarlett18i20Gen2Protocol::cache_mix(&mut proto, &mut params, 1, 10).unwrap();

        let frame = &proto.requests[0];
        assert_eq!(&frame[..4], &CMD_GET_MIX.to_le_bytes());
        assert_eq!(&frame[16..18], &1u16.to_le_bytes());
        assert_eq!(&frame[18..20], &18u16.to_le_bytes());

        assert_eq!(params.gains[1][2], nearest_mixer_level(MIXER_VALUES[18]));
    }
}
