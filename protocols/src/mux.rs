// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! The routing mux of the unit.
//!
//! The mux connects one source to each destination. On the wire one connection is a 32 bit entry
//! packing the destination identifier in the lower 12 bits and the source identifier in the next
//! 12 bits. The host keeps a single routing table; transmission happens once per rate mode
//! following the assignment layout of the model, with unused slots zero filled.

use super::*;

/// One run of destinations in the mux assignment layout of a model. Runs of type `None` express
/// zero filled padding slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MuxAssignment {
    pub port_type: PortType,
    /// The channel number of the first destination of the run.
    pub start: usize,
    pub count: usize,
}

/// The mirrored routing table; one optional source per flat destination index.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2MuxParameters {
    pub routes: Vec<Option<usize>>,
}

/// Operation for the routing mux.
pub trait Scarlett2MuxOperation: Scarlett2HardwareSpecification {
    /// Serialise the routing table into the entries for one rate mode. A destination whose mute
    /// switch is set transmits source zero regardless of the mirrored route.
    fn serialize_mux_entries(
        params: &Scarlett2MuxParameters,
        mutes: &[bool],
        mode: RateMode,
    ) -> Vec<u32> {
        let groups = Self::PORTS;
        let mut entries = Vec::with_capacity(Self::mux_slot_count(mode));

        Self::MUX_ASSIGNMENTS[mode.index()]
            .iter()
            .for_each(|assignment| {
                if assignment.port_type == PortType::None {
                    entries.extend(std::iter::repeat(0).take(assignment.count));
                    return;
                }

                (0..assignment.count).for_each(|i| {
                    let num = assignment.start + i;
                    let index =
                        port_flat_index(groups, PortDirection::Output, assignment.port_type, num);

                    let muted = mute_switch_index(groups, assignment.port_type, num)
                        .map(|pos| mutes.get(pos).copied().unwrap_or_default())
                        .unwrap_or_default();
                    let src_id = if muted {
                        0
                    } else {
                        params.routes[index]
                            .map(|src| port_wire_id(groups, PortDirection::Input, src) as u32)
                            .unwrap_or_default()
                    };
                    let dst_id = port_wire_id(groups, PortDirection::Output, index) as u32;

                    entries.push((src_id << 12) | dst_id);
                });
            });

        entries
    }

    fn update_mux<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &Scarlett2MuxParameters,
        mutes: &[bool],
        timeout_ms: u32,
    ) -> Result<(), Error> {
        [RateMode::Low, RateMode::Middle, RateMode::High]
            .iter()
            .try_for_each(|&mode| {
                let entries = Self::serialize_mux_entries(params, mutes, mode);

                let mut args = Vec::with_capacity(4 + entries.len() * 4);
                args.extend_from_slice(&0u16.to_le_bytes());
                args.extend_from_slice(&(mode.index() as u16).to_le_bytes());
                entries
                    .iter()
                    .for_each(|entry| args.extend_from_slice(&entry.to_le_bytes()));

                proto
                    .transaction(CMD_SET_MUX, &args, 0, timeout_ms)
                    .map(|_| ())
            })
    }

    /// Read the routing table back. Entries whose destination is not decodable are dropped;
    /// sources which are not decodable leave the destination disconnected.
    fn cache_mux<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        params: &mut Scarlett2MuxParameters,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        let groups = Self::PORTS;
        let count = Self::mux_slot_count(RateMode::Low);

        let mut args = [0; 4];
        args[2..].copy_from_slice(&(count as u16).to_le_bytes());

        let raw = proto.transaction(CMD_GET_MUX, &args, 4 * count, timeout_ms)?;

        params.routes.iter_mut().for_each(|route| *route = None);

        let mut quadlet = [0; 4];
        (0..count).for_each(|i| {
            quadlet.copy_from_slice(&raw[(i * 4)..(i * 4 + 4)]);
            let entry = u32::from_le_bytes(quadlet);

            let dst =
                port_index_from_wire_id(groups, PortDirection::Output, (entry & 0xfff) as u16);
            let src =
                port_index_from_wire_id(groups, PortDirection::Input, ((entry >> 12) & 0xfff) as u16);
            if let Some(index) = dst {
                params.routes[index] = src;
            }
        });

        Ok(())
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2MuxOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen2::Scarlett18i20Gen2Protocol,
        crate::gen3::Scarlett18i20Gen3Protocol,
    };

    #[test]
    fn assignment_layouts_cover_declared_slots() {
        fn check<T: Scarlett2HardwareSpecification>() {
            [RateMode::Low, RateMode::Middle, RateMode::High]
                .iter()
                .for_each(|&mode| {
                    let total: usize = T::MUX_ASSIGNMENTS[mode.index()]
                        .iter()
                        .map(|assignment| assignment.count)
                        .sum();
                    assert_eq!(total, T::mux_slot_count(mode));
                });
        }

        check::<Scarlett18i20Gen2Protocol>();
        check::<Scarlett18i20Gen3Protocol>();
    }

    #[test]
    fn serialization_for_low_rate_mode() {
        // Analogue outputs 0 and 1 driven by PCM inputs 0 and 1, everything else disconnected.
        let mut params = Scarlett18i20Gen2Protocol::create_mux_parameters();
        let groups = Scarlett18i20Gen2Protocol::PORTS;
        let pcm_in_0 = port_flat_index(groups, PortDirection::Input, PortType::Pcm, 0);
        params.routes[0] = Some(pcm_in_0);
        params.routes[1] = Some(pcm_in_0 + 1);

        let mutes = vec![false; Scarlett18i20Gen2Protocol::mute_switch_count()];
        let entries =
            Scarlett18i20Gen2Protocol::serialize_mux_entries(&params, &mutes, RateMode::Low);

        assert_eq!(entries.len(), 77);
        // PCM destinations first, disconnected.
        (0..18).for_each(|i| assert_eq!(entries[i], 0x600 + i as u32));
        // Then the two routed analogue destinations.
        assert_eq!(entries[18], (0x600 << 12) | 0x080);
        assert_eq!(entries[19], (0x601 << 12) | 0x081);
        // The trailing padding slots stay zero filled.
        assert_eq!(&entries[56..], &[0; 21]);
    }

    #[test]
    fn muted_destination_transmits_no_source() {
        let mut params = Scarlett18i20Gen2Protocol::create_mux_parameters();
        params.routes[0] = Some(0);

        let mut mutes = vec![false; Scarlett18i20Gen2Protocol::mute_switch_count()];
        mutes[0] = true;

        let entries =
            Scarlett18i20Gen2Protocol::serialize_mux_entries(&params, &mutes, RateMode::Low);
        assert_eq!(entries[18], 0x080);
    }

    #[test]
    fn per_rate_mode_requests() {
        let mut proto = TestProtocol::default();
        (0..3).for_each(|_| proto.queue_response(&[]));

        let params = Scarlett18i20Gen2Protocol::create_mux_parameters();
        let mutes = vec![false; Scarlett18i20Gen2Protocol::mute_switch_count()];
        Scarlett18i20Gen2Protocol::update_mux(&mut proto, &params, &mutes, 10).unwrap();

        assert_eq!(proto.requests.len(), 3);
        [77usize, 73, 46].iter().enumerate().for_each(|(i, &slots)| {
            let frame = &proto.requests[i];
            assert_eq!(&frame[..4], &CMD_SET_MUX.to_le_bytes());
            assert_eq!(&frame[16..18], &[0, 0]);
            assert_eq!(&frame[18..20], &(i as u16).to_le_bytes());
            assert_eq!(frame.len(), FRAME_HEADER_SIZE + 4 + slots * 4);
        });
    }

    #[test]
    fn read_back_round_trip() {
        let mut params = Scarlett18i20Gen2Protocol::create_mux_parameters();
        let groups = Scarlett18i20Gen2Protocol::PORTS;
        let pcm_in_0 = port_flat_index(groups, PortDirection::Input, PortType::Pcm, 0);
        params.routes[0] = Some(pcm_in_0);
        params.routes[1] = Some(pcm_in_0 + 1);
        params.routes[30] = Some(2);

        let mutes = vec![false; Scarlett18i20Gen2Protocol::mute_switch_count()];
        let entries =
            Scarlett18i20Gen2Protocol::serialize_mux_entries(&params, &mutes, RateMode::Low);
        let mut resp = Vec::new();
        entries
            .iter()
            .for_each(|entry| resp.extend_from_slice(&entry.to_le_bytes()));

        let mut proto = TestProtocol::default();
        proto.queue_response(&resp);

        let mut cached = Scarlett18i20Gen2Protocol::create_mux_parameters();
        Scarlett18i20Gen2Protocol::cache_mux(&mut proto, &mut cached, 10).unwrap();

        let frame = &proto.requests[0];
        assert_eq!(&frame[..4], &CMD_GET_MUX.to_le_bytes());
        assert_eq!(&frame[18..20], &77u16.to_le_bytes());

        assert_eq!(cached, params);
    }

    #[test]
    fn unknown_entries_are_dropped() {
        let mut proto = TestProtocol::default();
        let count = Scarlett18i20Gen2Protocol::mux_slot_count(RateMode::Low);
        let mut resp = vec![0; count * 4];
        // An entry with an undeclared destination identifier.
        resp[..4].copy_from_slice(&(((0x080u32) << 12) | 0xf7f).to_le_bytes());
        proto.queue_response(&resp);

        let mut cached = Scarlett18i20Gen2Protocol::create_mux_parameters();
        Scarlett18i20Gen2Protocol::cache_mux(&mut proto, &mut cached, 10).unwrap();
        assert!(cached.routes.iter().all(|route| route.is_none()));
    }
}
