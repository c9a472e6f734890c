// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Level meters and the state of sampling clock synchronisation.
//!
//! Both are pulled on demand and never mirrored; the unit raises an interrupt when the sync
//! state changes so that readers know to ask again.

use super::*;

/// The minimum value of a peak meter.
pub const METER_LEVEL_MIN: i32 = 0;
/// The maximum value of a peak meter, 12 bit.
pub const METER_LEVEL_MAX: i32 = 4095;
/// The step of a peak meter.
pub const METER_LEVEL_STEP: i32 = 1;

const METER_LEVELS_MAGIC: u32 = 1;

/// Operation for level meters and sync status.
pub trait Scarlett2MeterOperation: Scarlett2HardwareSpecification {
    fn read_meter_levels<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        timeout_ms: u32,
    ) -> Result<Vec<u16>, Error> {
        let count = Self::METER_COUNT;

        let mut args = [0; 8];
        args[2..4].copy_from_slice(&(count as u16).to_le_bytes());
        args[4..].copy_from_slice(&METER_LEVELS_MAGIC.to_le_bytes());

        let raw = proto.transaction(CMD_GET_METER_LEVELS, &args, 4 * count, timeout_ms)?;
        let mut quadlet = [0; 4];
        let levels = (0..count)
            .map(|i| {
                quadlet.copy_from_slice(&raw[(i * 4)..(i * 4 + 4)]);
                u32::from_le_bytes(quadlet) as u16
            })
            .collect();
        Ok(levels)
    }

    fn read_sync_status<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        timeout_ms: u32,
    ) -> Result<bool, Error> {
        let raw = proto.transaction(CMD_GET_SYNC, &[], 4, timeout_ms)?;
        let mut quadlet = [0; 4];
        quadlet.copy_from_slice(&raw[..4]);
        Ok(u32::from_le_bytes(quadlet) > 0)
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2MeterOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen2::Scarlett18i20Gen2Protocol,
    };

    #[test]
    fn meter_levels_request_and_decoding() {
        let mut proto = TestProtocol::default();
        let mut resp = Vec::new();
        (0..Scarlett18i20Gen2Protocol::METER_COUNT as u32)
            .for_each(|i| resp.extend_from_slice(&(i * 16).to_le_bytes()));
        proto.queue_response(&resp);

        let levels = Scarlett18i20Gen2Protocol::read_meter_levels(&mut proto, 10).unwrap();

        let frame = &proto.requests[0];
        assert_eq!(&frame[..4], &CMD_GET_METER_LEVELS.to_le_bytes());
        assert_eq!(&frame[16..18], &[0, 0]);
        assert_eq!(&frame[18..20], &56u16.to_le_bytes());
        assert_eq!(&frame[20..24], &METER_LEVELS_MAGIC.to_le_bytes());

        assert_eq!(levels.len(), 56);
        assert_eq!(levels[1], 16);
    }

    #[test]
    fn sync_status_decoding() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&1u32.to_le_bytes());
        assert!(Scarlett18i20Gen2Protocol::read_sync_status(&mut proto, 10).unwrap());

        proto.queue_response(&0u32.to_le_bytes());
        assert!(!Scarlett18i20Gen2Protocol::read_sync_status(&mut proto, 10).unwrap());
    }
}
