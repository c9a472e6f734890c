// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! The software configuration area persisted on the unit.
//!
//! Gen 3 units with a mixer keep a structured area of 0x1984 bytes at offset 0xec of the data
//! space, mirroring the vendor application's view of routing, stereo pairing, output volumes,
//! and mixer state. The trailing 32 bit word is a checksum chosen so that the sum of every 32
//! bit word of the area is zero. Any write of a field rewrites the checksum as well.

use super::*;

/// The offset of the area in the data space of the unit.
pub const SW_CONFIG_BASE: usize = 0xec;
/// The length of the area.
pub const SW_CONFIG_SIZE: usize = 0x1984;

/// The number of gain columns per mix in the area.
pub const SW_CONFIG_MIXER_INPUTS: usize = 30;
/// The number of mixes in the area.
pub const SW_CONFIG_MIXER_OUTPUTS: usize = 12;
/// The number of entries of the output routing table.
pub const SW_CONFIG_OUTPUT_COUNT: usize = 26;
/// The number of software volume entries.
pub const SW_CONFIG_VOLUME_COUNT: usize = 10;

const ALL_SIZE_OFFSET: usize = 0x00;
const MAGIC_OFFSET: usize = 0x02;
const VERSION_OFFSET: usize = 0x04;
/// The offset of the size word, read first at attach to probe for a valid area.
pub const SW_CONFIG_SIZE_OFFSET: usize = 0x08;
const MIXER_IN_MUX_OFFSET: usize = 0x8c;
const MIXER_IN_MAP_OFFSET: usize = 0xaa;
const STEREO_SW_OFFSET: usize = 0xc8;
const MUTE_SW_OFFSET: usize = 0xcc;
const VOLUMES_OFFSET: usize = 0xd0;
const OUT_MUX_OFFSET: usize = 0xf8;
const MIXER_OFFSET: usize = 0xf04;
const MIXER_PAN_OFFSET: usize = 0x1598;
const MIXER_MUTE_OFFSET: usize = 0x1864;
const MIXER_SOLO_OFFSET: usize = 0x1894;
const MIXER_BIND_OFFSET: usize = 0x190e;
const CHECKSUM_OFFSET: usize = 0x1980;

const MAGIC: u16 = 0x3006;
const VERSION: u32 = 0x5;
/// The area is framed by 12 further bytes counted in its leading size word.
const FRAME_SIZE: usize = 0x0c;

/// Mirror of the software configuration area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scarlett2SoftwareConfig {
    raw: Vec<u8>,
}

impl Scarlett2SoftwareConfig {
    /// A fresh area with valid header and checksum and zeroed body, uploaded to units which
    /// report no area at all.
    pub fn new_default() -> Self {
        let mut cfg = Self {
            raw: vec![0; SW_CONFIG_SIZE],
        };
        cfg.put_u16(ALL_SIZE_OFFSET, (SW_CONFIG_SIZE + FRAME_SIZE) as u16);
        cfg.put_u16(MAGIC_OFFSET, MAGIC);
        cfg.put_u32(VERSION_OFFSET, VERSION);
        cfg.put_u16(SW_CONFIG_SIZE_OFFSET, SW_CONFIG_SIZE as u16);
        cfg.update_checksum();
        cfg
    }

    /// Wrap the image read from the unit, validating its header.
    pub fn from_raw(raw: Vec<u8>) -> Result<Self, Error> {
        if raw.len() != SW_CONFIG_SIZE {
            let msg = format!("unexpected length of configuration area: {}", raw.len());
            Err(Error::new(Scarlett2ControlError::ProtocolMismatch, &msg))?;
        }
        let cfg = Self { raw };
        if cfg.u16_at(ALL_SIZE_OFFSET) as usize != SW_CONFIG_SIZE + FRAME_SIZE
            || cfg.u16_at(MAGIC_OFFSET) != MAGIC
            || cfg.u32_at(VERSION_OFFSET) != VERSION
            || cfg.u16_at(SW_CONFIG_SIZE_OFFSET) as usize != SW_CONFIG_SIZE
        {
            let msg = "unexpected header of configuration area";
            Err(Error::new(Scarlett2ControlError::ProtocolMismatch, msg))?;
        }
        Ok(cfg)
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn u16_at(&self, offset: usize) -> u16 {
        let mut doublet = [0; 2];
        doublet.copy_from_slice(&self.raw[offset..(offset + 2)]);
        u16::from_le_bytes(doublet)
    }

    fn put_u16(&mut self, offset: usize, value: u16) {
        self.raw[offset..(offset + 2)].copy_from_slice(&value.to_le_bytes());
    }

    fn u32_at(&self, offset: usize) -> u32 {
        let mut quadlet = [0; 4];
        quadlet.copy_from_slice(&self.raw[offset..(offset + 4)]);
        u32::from_le_bytes(quadlet)
    }

    fn put_u32(&mut self, offset: usize, value: u32) {
        self.raw[offset..(offset + 4)].copy_from_slice(&value.to_le_bytes());
    }

    /// The one-based source number of the output, zero when disconnected.
    pub fn out_mux(&self, index: usize) -> u8 {
        self.raw[OUT_MUX_OFFSET + index]
    }

    pub fn set_out_mux(&mut self, index: usize, value: u8) {
        self.raw[OUT_MUX_OFFSET + index] = value;
    }

    /// The dirty range of one output routing entry.
    pub fn out_mux_range(index: usize) -> (usize, usize) {
        (OUT_MUX_OFFSET + index, 1)
    }

    /// The one-based source number of the mixer input, zero when disconnected.
    pub fn mixer_in_mux(&self, index: usize) -> u8 {
        self.raw[MIXER_IN_MUX_OFFSET + index]
    }

    pub fn set_mixer_in_mux(&mut self, index: usize, value: u8) {
        self.raw[MIXER_IN_MUX_OFFSET + index] = value;
    }

    pub fn mixer_in_mux_range(index: usize) -> (usize, usize) {
        (MIXER_IN_MUX_OFFSET + index, 1)
    }

    /// The pairing entry of the mixer input; bit 7 flags a stereo pair, the rest points at the
    /// partner channel.
    pub fn mixer_in_map(&self, index: usize) -> u8 {
        self.raw[MIXER_IN_MAP_OFFSET + index]
    }

    pub fn set_mixer_in_map(&mut self, index: usize, value: u8) {
        self.raw[MIXER_IN_MAP_OFFSET + index] = value;
    }

    pub fn mixer_in_map_range() -> (usize, usize) {
        (MIXER_IN_MAP_OFFSET, SW_CONFIG_MIXER_INPUTS)
    }

    /// The stereo pairing mask of outputs.
    pub fn stereo_mask(&self) -> u32 {
        self.u32_at(STEREO_SW_OFFSET)
    }

    pub fn set_stereo_mask(&mut self, mask: u32) {
        self.put_u32(STEREO_SW_OFFSET, mask);
    }

    pub fn stereo_mask_range() -> (usize, usize) {
        (STEREO_SW_OFFSET, 4)
    }

    /// The mute mask of outputs.
    pub fn mute_mask(&self) -> u32 {
        self.u32_at(MUTE_SW_OFFSET)
    }

    pub fn set_mute_mask(&mut self, mask: u32) {
        self.put_u32(MUTE_SW_OFFSET, mask);
    }

    pub fn mute_mask_range() -> (usize, usize) {
        (MUTE_SW_OFFSET, 4)
    }

    /// The software volume of the analogue output, as the signed decibel value on the wire.
    pub fn volume(&self, index: usize) -> i16 {
        self.u16_at(VOLUMES_OFFSET + index * 4) as i16
    }

    /// Store the software volume of the analogue output and flag it changed.
    pub fn set_volume(&mut self, index: usize, volume: i16) {
        let pos = VOLUMES_OFFSET + index * 4;
        self.raw[pos..(pos + 2)].copy_from_slice(&volume.to_le_bytes());
        self.raw[pos + 2] = 1;
    }

    pub fn volume_range(index: usize) -> (usize, usize) {
        (VOLUMES_OFFSET + index * 4, 4)
    }

    /// The gain of a mixer cell as the raw 32 bit floating point image.
    pub fn mixer_gain(&self, mix: usize, input: usize) -> Option<u32> {
        Self::mixer_cell_offset(mix, input).map(|pos| self.u32_at(pos))
    }

    /// Store the gain of a mixer cell from the half dB index.
    pub fn set_mixer_gain(&mut self, mix: usize, input: usize, level: usize) -> bool {
        match Self::mixer_cell_offset(mix, input) {
            Some(pos) => {
                let value = (mixer::SW_CONFIG_MIXER_VALUES[level] as u32) << 16;
                self.put_u32(pos, value);
                true
            }
            None => false,
        }
    }

    pub fn mixer_gain_range(mix: usize, input: usize) -> Option<(usize, usize)> {
        Self::mixer_cell_offset(mix, input).map(|pos| (pos, 4))
    }

    fn mixer_cell_offset(mix: usize, input: usize) -> Option<usize> {
        if mix < SW_CONFIG_MIXER_OUTPUTS && input < SW_CONFIG_MIXER_INPUTS {
            Some(MIXER_OFFSET + (mix * SW_CONFIG_MIXER_INPUTS + input) * 4)
        } else {
            None
        }
    }

    /// The pan of a mixer cell.
    pub fn mixer_pan(&self, mix: usize, input: usize) -> Option<i8> {
        if mix < SW_CONFIG_MIXER_OUTPUTS && input < SW_CONFIG_MIXER_INPUTS {
            Some(self.raw[MIXER_PAN_OFFSET + mix * SW_CONFIG_MIXER_INPUTS + input] as i8)
        } else {
            None
        }
    }

    /// The mute mask of inputs of the mix.
    pub fn mixer_mute_mask(&self, mix: usize) -> u32 {
        self.u32_at(MIXER_MUTE_OFFSET + mix * 4)
    }

    pub fn set_mixer_mute_mask(&mut self, mix: usize, mask: u32) {
        self.put_u32(MIXER_MUTE_OFFSET + mix * 4, mask);
    }

    pub fn mixer_mute_mask_range(mix: usize) -> (usize, usize) {
        (MIXER_MUTE_OFFSET + mix * 4, 4)
    }

    /// The solo mask of inputs of the mix.
    pub fn mixer_solo_mask(&self, mix: usize) -> u32 {
        self.u32_at(MIXER_SOLO_OFFSET + mix * 4)
    }

    /// The mask distinguishing outputs routed directly (bit set) from outputs fed by the mixer.
    pub fn mixer_bind_mask(&self) -> u32 {
        self.u32_at(MIXER_BIND_OFFSET)
    }

    pub fn set_mixer_bind_mask(&mut self, mask: u32) {
        self.put_u32(MIXER_BIND_OFFSET, mask);
    }

    pub fn mixer_bind_mask_range() -> (usize, usize) {
        (MIXER_BIND_OFFSET, 4)
    }

    pub fn checksum(&self) -> u32 {
        self.u32_at(CHECKSUM_OFFSET)
    }

    /// Recompute the trailing checksum so that the 32 bit words of the area sum to zero.
    pub fn update_checksum(&mut self) {
        self.put_u32(CHECKSUM_OFFSET, 0);
        let sum = self.word_sum();
        self.put_u32(CHECKSUM_OFFSET, 0u32.wrapping_sub(sum));
    }

    fn word_sum(&self) -> u32 {
        let mut quadlet = [0; 4];
        (0..SW_CONFIG_SIZE)
            .step_by(4)
            .fold(0u32, |sum, pos| {
                quadlet.copy_from_slice(&self.raw[pos..(pos + 4)]);
                sum.wrapping_add(u32::from_le_bytes(quadlet))
            })
    }

    /// Whether the stored checksum balances the area.
    pub fn checksum_valid(&self) -> bool {
        self.word_sum() == 0
    }
}

/// Operation for the software configuration area.
pub trait Scarlett2SoftwareConfigOperation: Scarlett2HardwareSpecification {
    /// Probe for the area at attach. An absent area (size word zero) is created and uploaded; an
    /// area of unexpected size or header yields `None` and the unit is driven from its hardware
    /// state alone.
    fn cache_software_config<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        timeout_ms: u32,
    ) -> Result<Option<Scarlett2SoftwareConfig>, Error> {
        if !Self::HAS_SOFTWARE_CONFIG {
            return Ok(None);
        }

        let raw = proto.read_data(SW_CONFIG_BASE + SW_CONFIG_SIZE_OFFSET, 2, timeout_ms)?;
        let mut doublet = [0; 2];
        doublet.copy_from_slice(&raw[..2]);
        let size = u16::from_le_bytes(doublet) as usize;

        if size == 0 {
            let cfg = Scarlett2SoftwareConfig::new_default();
            proto.write_data(SW_CONFIG_BASE, cfg.raw(), timeout_ms)?;
            Ok(Some(cfg))
        } else if size != SW_CONFIG_SIZE {
            Ok(None)
        } else {
            let raw = proto.read_data(SW_CONFIG_BASE, SW_CONFIG_SIZE, timeout_ms)?;
            Ok(Scarlett2SoftwareConfig::from_raw(raw).ok())
        }
    }

    /// Write one changed range of the area followed by the recomputed checksum. Ranges outside
    /// the area are rejected.
    fn commit_software_config<P: Scarlett2ProtocolExtManual>(
        proto: &mut P,
        cfg: &mut Scarlett2SoftwareConfig,
        offset: usize,
        length: usize,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        if offset + length > SW_CONFIG_SIZE {
            let msg = format!("commit outside configuration area: {}+{}", offset, length);
            Err(Error::new(Scarlett2ControlError::BadArgument, &msg))?;
        }

        cfg.update_checksum();

        let raw = cfg.raw()[offset..(offset + length)].to_vec();
        proto.write_data(SW_CONFIG_BASE + offset, &raw, timeout_ms)?;

        let checksum = cfg.checksum().to_le_bytes();
        proto.write_data(SW_CONFIG_BASE + CHECKSUM_OFFSET, &checksum, timeout_ms)
    }

    /// Overlay the routing kept in the area onto the mirrored mux table; physical outputs from
    /// the output routing table with stereo pairing and mixer binding applied, then the sources
    /// of every mixer input.
    fn merge_software_routing(
        cfg: &Scarlett2SoftwareConfig,
        params: &mut Scarlett2MuxParameters,
    ) {
        let groups = Self::PORTS;
        let mapping = Self::SW_PORT_MAPPING;
        if mapping.is_empty() {
            return;
        }

        let stereo_mask = cfg.stereo_mask();
        let bind_mask = cfg.mixer_bind_mask();

        [PortType::Analogue, PortType::Spdif, PortType::Adat, PortType::Pcm]
            .iter()
            .for_each(|&port_type| {
                let count = groups
                    .iter()
                    .find(|group| group.port_type == port_type)
                    .map(|group| group.count(PortDirection::Output))
                    .unwrap_or_default();

                (0..count).for_each(|num| {
                    let sw_idx =
                        match sw_port_index(mapping, PortDirection::Output, port_type, num) {
                            Some(sw_idx) => sw_idx,
                            None => return,
                        };
                    let dst =
                        port_flat_index(groups, PortDirection::Output, port_type, num);
                    if dst >= params.routes.len() {
                        return;
                    }

                    // The even channel of a stereo pair holds the source for both.
                    let pair_idx = sw_idx & !1;
                    let (source_num, bind_bit) =
                        if stereo_mask & ((1 << sw_idx) | (1 << pair_idx)) > 0 {
                            let num = if sw_idx & 1 > 0 {
                                cfg.out_mux(pair_idx) as usize + 1
                            } else {
                                cfg.out_mux(pair_idx) as usize
                            };
                            (num, 1u32 << pair_idx)
                        } else {
                            (cfg.out_mux(sw_idx) as usize, 1u32 << sw_idx)
                        };

                    params.routes[dst] = if bind_mask & bind_bit > 0 {
                        // Routed directly; the stored number addresses a physical source.
                        sw_port_num_to_flat_index(
                            groups,
                            mapping,
                            PortDirection::Input,
                            source_num,
                        )
                    } else if source_num > 0 {
                        // Routed through the mixer.
                        Some(port_flat_index(
                            groups,
                            PortDirection::Input,
                            PortType::Mix,
                            source_num - 1,
                        ))
                    } else {
                        None
                    };
                });
            });

        if Self::HAS_MIXER {
            (0..Self::mixer_input_count()).for_each(|num| {
                let source_num = cfg.mixer_in_mux(num) as usize;
                let src =
                    sw_port_num_to_flat_index(groups, mapping, PortDirection::Input, source_num);
                let dst = port_flat_index(groups, PortDirection::Output, PortType::Mix, num);
                if dst < params.routes.len() {
                    params.routes[dst] = src;
                }
            });
        }
    }

    /// Record a route change in the area, normalising stereo pairing and the mixer bind mask
    /// first. The returned ranges are dirty and pending commit, in order.
    fn update_software_routing(
        cfg: &mut Scarlett2SoftwareConfig,
        src: Option<usize>,
        dst: usize,
    ) -> Vec<(usize, usize)> {
        let groups = Self::PORTS;
        let mapping = Self::SW_PORT_MAPPING;
        let mut dirty = Vec::new();

        if mapping.is_empty() {
            return dirty;
        }

        let src = match src {
            Some(src) => src,
            None => return dirty,
        };
        let (dst_type, dst_num) =
            match port_from_flat_index(groups, PortDirection::Output, dst) {
                Some(decoded) => decoded,
                None => return dirty,
            };

        if dst_type == PortType::Mix {
            let in_idx =
                match flat_index_to_sw_port_num(groups, mapping, PortDirection::Input, src) {
                    Some(in_idx) => in_idx,
                    None => return dirty,
                };

            // A mixer input taken out of a stereo pair unlinks the pair.
            if cfg.mixer_in_map(dst_num) & 0x80 > 0 {
                let count = Self::mixer_input_count();
                for i in 0..count {
                    let entry = cfg.mixer_in_map(i);
                    if entry & 0x80 == 0 {
                        continue;
                    }
                    let partner = (entry & 0x7f) as usize;
                    if partner == 0 || partner >= count {
                        continue;
                    }
                    if i == dst_num || partner == dst_num {
                        cfg.set_mixer_in_map(i, 0);
                        cfg.set_mixer_in_map(partner, 0);
                        let (offset, length) = Scarlett2SoftwareConfig::mixer_in_map_range();
                        dirty.push((offset, length));
                        break;
                    }
                }
            }

            cfg.set_mixer_in_mux(dst_num, in_idx as u8 + 1);
            dirty.push(Scarlett2SoftwareConfig::mixer_in_mux_range(dst_num));
        } else {
            let (src_type, src_num) =
                match port_from_flat_index(groups, PortDirection::Input, src) {
                    Some(decoded) => decoded,
                    None => return dirty,
                };
            let out_idx =
                match sw_port_index(mapping, PortDirection::Output, dst_type, dst_num) {
                    Some(out_idx) => out_idx,
                    None => return dirty,
                };
            let pair_idx = out_idx & !1;

            // A destination taken out of a stereo pair unlinks the pair and restores the
            // implicit routing of the odd channel.
            let stereo_mask = cfg.stereo_mask();
            if stereo_mask & (3 << pair_idx) > 0 {
                cfg.set_stereo_mask(stereo_mask & !(3 << pair_idx));
                dirty.push(Scarlett2SoftwareConfig::stereo_mask_range());

                if cfg.out_mux(pair_idx + 1) != cfg.out_mux(pair_idx).wrapping_add(1) {
                    let value = cfg.out_mux(pair_idx).wrapping_add(1);
                    cfg.set_out_mux(pair_idx + 1, value);
                    dirty.push((OUT_MUX_OFFSET + pair_idx, 2));
                }

                let bind_mask = cfg.mixer_bind_mask();
                if (bind_mask >> pair_idx) & 3 > 0 {
                    cfg.set_mixer_bind_mask(bind_mask & !(3 << pair_idx));
                    dirty.push(Scarlett2SoftwareConfig::mixer_bind_mask_range());
                }
            }

            let mut bind_mask = cfg.mixer_bind_mask();
            let source_num = if src_type == PortType::Mix {
                bind_mask &= !(1 << out_idx);
                src_num + 1
            } else {
                bind_mask |= 1 << out_idx;
                sw_port_index(mapping, PortDirection::Input, src_type, src_num)
                    .map(|in_idx| in_idx + 1)
                    .unwrap_or_default()
            };

            cfg.set_mixer_bind_mask(bind_mask);
            dirty.push(Scarlett2SoftwareConfig::mixer_bind_mask_range());

            cfg.set_out_mux(out_idx, source_num as u8);
            dirty.push(Scarlett2SoftwareConfig::out_mux_range(out_idx));
        }

        dirty
    }
}

impl<O: Scarlett2HardwareSpecification> Scarlett2SoftwareConfigOperation for O {}

#[cfg(test)]
mod test {
    use {
        super::{super::transaction::test::TestProtocol, *},
        crate::gen3::Scarlett18i20Gen3Protocol,
    };

    #[test]
    fn default_area_is_balanced() {
        let cfg = Scarlett2SoftwareConfig::new_default();
        assert_eq!(cfg.u16_at(ALL_SIZE_OFFSET), 0x1990);
        assert_eq!(cfg.u16_at(MAGIC_OFFSET), MAGIC);
        assert_eq!(cfg.u32_at(VERSION_OFFSET), VERSION);
        assert_eq!(cfg.u16_at(SW_CONFIG_SIZE_OFFSET), 0x1984);
        assert!(cfg.checksum_valid());
    }

    #[test]
    fn checksum_balances_after_any_change() {
        let mut cfg = Scarlett2SoftwareConfig::new_default();
        cfg.set_volume(3, -27);
        cfg.set_mute_mask(0x0000_0005);
        cfg.set_mixer_gain(2, 7, 160);
        cfg.update_checksum();
        assert!(cfg.checksum_valid());

        assert_eq!(cfg.volume(3), -27);
        // The changed flag of the entry rides next to the volume.
        assert_eq!(cfg.raw()[VOLUMES_OFFSET + 3 * 4 + 2], 1);
        assert_eq!(cfg.mixer_gain(2, 7), Some(0x0000_0000));
    }

    #[test]
    fn header_validation() {
        assert!(Scarlett2SoftwareConfig::from_raw(vec![0; SW_CONFIG_SIZE]).is_err());
        assert!(Scarlett2SoftwareConfig::from_raw(vec![0; 16]).is_err());

        let cfg = Scarlett2SoftwareConfig::new_default();
        assert!(Scarlett2SoftwareConfig::from_raw(cfg.raw().to_vec()).is_ok());
    }

    #[test]
    fn cell_bounds_are_checked() {
        let mut cfg = Scarlett2SoftwareConfig::new_default();
        assert!(!cfg.set_mixer_gain(SW_CONFIG_MIXER_OUTPUTS, 0, 160));
        assert!(!cfg.set_mixer_gain(0, SW_CONFIG_MIXER_INPUTS, 160));
        assert_eq!(cfg.mixer_gain(SW_CONFIG_MIXER_OUTPUTS, 0), None);
        assert_eq!(cfg.mixer_pan(0, SW_CONFIG_MIXER_INPUTS), None);
    }

    #[test]
    fn absent_area_is_created() {
        let mut proto = TestProtocol::default();
        // The probed size word reads zero.
        proto.queue_response(&[0, 0]);
        // Seven chunks upload the fresh area.
        (0..7).for_each(|_| proto.queue_response(&[]));

        let cfg = Scarlett18i20Gen3Protocol::cache_software_config(&mut proto, 10)
            .unwrap()
            .unwrap();
        assert!(cfg.checksum_valid());

        // One probe read plus ceil(0x1984 / 992) chunked writes.
        assert_eq!(proto.requests.len(), 1 + 7);
        let frame = &proto.requests[1];
        assert_eq!(&frame[..4], &CMD_SET_DATA.to_le_bytes());
        assert_eq!(&frame[16..20], &(SW_CONFIG_BASE as u32).to_le_bytes());
    }

    #[test]
    fn unexpected_size_degrades() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&0x1000u16.to_le_bytes());

        let cfg = Scarlett18i20Gen3Protocol::cache_software_config(&mut proto, 10).unwrap();
        assert!(cfg.is_none());
        assert_eq!(proto.requests.len(), 1);
    }

    #[test]
    fn commit_rejects_ranges_outside_the_area() {
        let mut proto = TestProtocol::default();
        let mut cfg = Scarlett2SoftwareConfig::new_default();
        let err = Scarlett18i20Gen3Protocol::commit_software_config(
            &mut proto,
            &mut cfg,
            SW_CONFIG_SIZE - 2,
            4,
            10,
        )
        .unwrap_err();
        assert_eq!(
            err.kind::<Scarlett2ControlError>(),
            Some(Scarlett2ControlError::BadArgument)
        );
        assert!(proto.requests.is_empty());
    }

    #[test]
    fn commit_writes_range_and_checksum() {
        let mut proto = TestProtocol::default();
        proto.queue_response(&[]);
        proto.queue_response(&[]);

        let mut cfg = Scarlett2SoftwareConfig::new_default();
        cfg.set_volume(0, -27);
        let (offset, length) = Scarlett2SoftwareConfig::volume_range(0);
        Scarlett18i20Gen3Protocol::commit_software_config(&mut proto, &mut cfg, offset, length, 10)
            .unwrap();

        assert!(cfg.checksum_valid());
        assert_eq!(proto.requests.len(), 2);

        let frame = &proto.requests[0];
        assert_eq!(
            &frame[16..20],
            &((SW_CONFIG_BASE + VOLUMES_OFFSET) as u32).to_le_bytes()
        );
        assert_eq!(&frame[24..26], &(-27i16).to_le_bytes());

        let frame = &proto.requests[1];
        assert_eq!(
            &frame[16..20],
            &((SW_CONFIG_BASE + CHECKSUM_OFFSET) as u32).to_le_bytes()
        );
        assert_eq!(&frame[24..28], &cfg.checksum().to_le_bytes());
    }

    #[test]
    fn routing_update_unlinks_stereo_pair() {
        let groups = Scarlett18i20Gen3Protocol::PORTS;
        let mut cfg = Scarlett2SoftwareConfig::new_default();

        // Analogue outputs 0/1 paired in stereo, fed by mixes A/B, bound to the mixer.
        cfg.set_stereo_mask(0x0000_0003);
        cfg.set_out_mux(0, 1);
        cfg.set_out_mux(1, 0);

        let src = port_flat_index(groups, PortDirection::Input, PortType::Analogue, 2);
        let dirty = Scarlett18i20Gen3Protocol::update_software_routing(&mut cfg, Some(src), 0);
        assert!(!dirty.is_empty());

        // The pair is unlinked and the odd channel inherits the next source of the old pair.
        assert_eq!(cfg.stereo_mask() & 0x3, 0);
        assert_eq!(cfg.out_mux(1), 2);
        // A physical source sets the bind bit of the output.
        assert_eq!(cfg.mixer_bind_mask() & 0x1, 0x1);
        // The stored source number is one-based.
        assert_eq!(cfg.out_mux(0), 3);
    }

    #[test]
    fn routing_update_through_mixer_clears_bind_bit() {
        let groups = Scarlett18i20Gen3Protocol::PORTS;
        let mut cfg = Scarlett2SoftwareConfig::new_default();
        cfg.set_mixer_bind_mask(0xffff_ffff);

        let src = port_flat_index(groups, PortDirection::Input, PortType::Mix, 1);
        Scarlett18i20Gen3Protocol::update_software_routing(&mut cfg, Some(src), 0);

        assert_eq!(cfg.mixer_bind_mask() & 0x1, 0);
        assert_eq!(cfg.out_mux(0), 2);
    }

    #[test]
    fn routing_round_trip_through_area() {
        let groups = Scarlett18i20Gen3Protocol::PORTS;
        let mut cfg = Scarlett2SoftwareConfig::new_default();

        let src = port_flat_index(groups, PortDirection::Input, PortType::Analogue, 4);
        let dst = port_flat_index(groups, PortDirection::Output, PortType::Spdif, 1);
        Scarlett18i20Gen3Protocol::update_software_routing(&mut cfg, Some(src), dst);

        let mut params = Scarlett18i20Gen3Protocol::create_mux_parameters();
        Scarlett18i20Gen3Protocol::merge_software_routing(&cfg, &mut params);
        assert_eq!(params.routes[dst], Some(src));

        // A mixer input route survives the round trip as well.
        let mix_dst = port_flat_index(groups, PortDirection::Output, PortType::Mix, 3);
        Scarlett18i20Gen3Protocol::update_software_routing(&mut cfg, Some(src), mix_dst);
        Scarlett18i20Gen3Protocol::merge_software_routing(&cfg, &mut params);
        assert_eq!(params.routes[mix_dst], Some(src));
    }

    #[test]
    fn disconnected_output_stays_disconnected() {
        let cfg = Scarlett2SoftwareConfig::new_default();
        let mut params = Scarlett18i20Gen3Protocol::create_mux_parameters();
        Scarlett18i20Gen3Protocol::merge_software_routing(&cfg, &mut params);
        assert!(params.routes.iter().all(|route| route.is_none()));
    }
}
