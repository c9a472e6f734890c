// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Port algebra for signal sources and destinations.
//!
//! Every signal end point of the unit is identified on the wire by a 12 bit value consisting of a
//! base specific to the group of ports and a channel number within the group. The host side
//! addresses ports by a flat, zero-based index over the groups in declaration order. The module
//! includes conversions between the two representations as well as formatting of port names.

/// Type of port.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PortType {
    /// Not connected. Used to express padding entries of mux assignment.
    None,
    /// Analogue input/output.
    Analogue,
    /// S/PDIF input/output.
    Spdif,
    /// ADAT input/output.
    Adat,
    /// The second half of ADAT channels. It appears in software configuration mapping only and
    /// shares the entry of mixer ports in the hardware tables.
    Adat2,
    /// Input to and output from the internal mixer.
    Mix,
    /// PCM stream input/output.
    Pcm,
    /// The internal talkback microphone.
    InternalMic,
    /// Destination for the talkback bus.
    Talkback,
}

impl Default for PortType {
    fn default() -> Self {
        Self::None
    }
}

/// Direction of port against the mux. A source is fed into the mux, a destination is driven by
/// it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Mode of sampling transfer frequency in which the set of available destinations differs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RateMode {
    /// 44.1/48.0 kHz.
    Low,
    /// 88.2/96.0 kHz.
    Middle,
    /// 176.4/192.0 kHz.
    High,
}

impl RateMode {
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::Middle => 1,
            Self::High => 2,
        }
    }
}

/// The mask for the group part of wire identifier.
pub const WIRE_ID_GROUP_MASK: u16 = 0x0f80;
/// The mask for the channel part of wire identifier.
pub const WIRE_ID_NUM_MASK: u16 = 0x007f;

/// Template to format the name of port.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PortLabel {
    /// Channels numbered from `first`, zero padded to two figures when `zero_padded`.
    Numbered {
        prefix: &'static str,
        zero_padded: bool,
        first: usize,
    },
    /// Channels lettered from 'A'.
    Lettered {
        prefix: &'static str,
        suffix: &'static str,
    },
    /// A single port with a fixed name.
    Fixed(&'static str),
}

impl PortLabel {
    fn format(&self, num: usize) -> String {
        match self {
            Self::Numbered {
                prefix,
                zero_padded,
                first,
            } => {
                if *zero_padded {
                    format!("{} {:02}", prefix, first + num)
                } else {
                    format!("{} {}", prefix, first + num)
                }
            }
            Self::Lettered { prefix, suffix } => {
                let ch = (b'A' + num as u8) as char;
                format!("{}{}{}", prefix, ch, suffix)
            }
            Self::Fixed(name) => name.to_string(),
        }
    }
}

/// One group of ports sharing type and wire identifier base.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PortGroup {
    pub port_type: PortType,
    /// The base of wire identifier for the group.
    pub wire_base: u16,
    /// The number of source ports.
    pub inputs: usize,
    /// The number of destination ports at each rate mode. The entry for `RateMode::Low` doubles
    /// as the flat count of destinations.
    pub outputs: [usize; RateMode::COUNT],
    pub source_label: Option<PortLabel>,
    pub destination_label: Option<PortLabel>,
    /// Reordering of destination channel numbers applied to formatted names.
    pub destination_remapping: Option<&'static [usize]>,
}

impl PortGroup {
    pub fn count(&self, direction: PortDirection) -> usize {
        match direction {
            PortDirection::Input => self.inputs,
            PortDirection::Output => self.outputs[0],
        }
    }
}

/// Name of port which deviates from the group template.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PortName {
    pub direction: PortDirection,
    pub port_type: PortType,
    pub index: usize,
    pub name: &'static str,
}

/// Entry of mapping between flat port index and position in the software configuration area.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SwPortMapping {
    pub direction: PortDirection,
    pub port_type: PortType,
    /// The channel number of the first mapped port within the group.
    pub start: usize,
    pub count: usize,
}

/// The total number of ports for the direction.
pub fn port_count(groups: &[PortGroup], direction: PortDirection) -> usize {
    groups.iter().map(|group| group.count(direction)).sum()
}

/// Compute flat index from type and channel number.
pub fn port_flat_index(
    groups: &[PortGroup],
    direction: PortDirection,
    port_type: PortType,
    num: usize,
) -> usize {
    groups
        .iter()
        .take_while(|group| group.port_type != port_type)
        .map(|group| group.count(direction))
        .sum::<usize>()
        + num
}

/// Decode flat index into type and channel number. None for indices past the declared ports.
pub fn port_from_flat_index(
    groups: &[PortGroup],
    direction: PortDirection,
    mut index: usize,
) -> Option<(PortType, usize)> {
    for group in groups {
        let count = group.count(direction);
        if index < count {
            return Some((group.port_type, index));
        }
        index -= count;
    }
    None
}

/// Encode flat index into wire identifier. Zero when the index addresses no declared port.
pub fn port_wire_id(groups: &[PortGroup], direction: PortDirection, index: usize) -> u16 {
    let mut num = index;
    for group in groups {
        let count = group.count(direction);
        if num < count {
            return group.wire_base + num as u16;
        }
        num -= count;
    }
    0
}

/// Decode wire identifier into flat index. The zero identifier expresses no connection and is
/// not decodable, same as identifiers out of the declared ranges.
pub fn port_index_from_wire_id(
    groups: &[PortGroup],
    direction: PortDirection,
    wire_id: u16,
) -> Option<usize> {
    let group_id = wire_id & WIRE_ID_GROUP_MASK;
    if group_id == 0 {
        return None;
    }
    let mut num = (wire_id & WIRE_ID_NUM_MASK) as usize;
    let mut base = 0;
    for group in groups {
        let count = group.count(direction);
        if group_id == group.wire_base & WIRE_ID_GROUP_MASK {
            if num < count {
                return Some(base + num);
            }
            num -= count;
        }
        base += count;
    }
    None
}

/// Format the name of port addressed by flat index, with the model specific override appended in
/// parentheses when present. Indices past the declared ports format as "Off".
pub fn format_port_name(
    groups: &[PortGroup],
    names: &[PortName],
    direction: PortDirection,
    mut index: usize,
) -> String {
    for group in groups {
        let count = group.count(direction);
        if index < count {
            let special = names
                .iter()
                .find(|entry| {
                    entry.direction == direction
                        && entry.port_type == group.port_type
                        && entry.index == index
                })
                .map(|entry| entry.name);

            let num = match (direction, group.destination_remapping) {
                (PortDirection::Output, Some(remapping)) => remapping[index],
                _ => index,
            };
            let label = match direction {
                PortDirection::Input => group.source_label.as_ref(),
                PortDirection::Output => group.destination_label.as_ref(),
            };
            let formatted = label
                .map(|l| l.format(num))
                .unwrap_or_else(|| "Off".to_string());

            return match special {
                Some(name) => format!("{} ({})", formatted, name),
                None => formatted,
            };
        }
        index -= count;
    }

    "Off".to_string()
}

fn driver_group_count(groups: &[PortGroup], direction: PortDirection, port_type: PortType) -> usize {
    // ADAT2 shares the entry of mixer ports in the hardware tables.
    let port_type = if port_type == PortType::Adat2 {
        PortType::Mix
    } else {
        port_type
    };
    groups
        .iter()
        .find(|group| group.port_type == port_type)
        .map(|group| group.count(direction))
        .unwrap_or_default()
}

/// Position of the port in the software configuration numbering, by type and channel number.
pub fn sw_port_index(
    mapping: &[SwPortMapping],
    direction: PortDirection,
    port_type: PortType,
    num: usize,
) -> Option<usize> {
    let mut base = 0;
    for entry in mapping {
        if entry.direction != direction {
            continue;
        }
        if entry.port_type == port_type {
            return num
                .checked_sub(entry.start)
                .filter(|&n| n < entry.count)
                .map(|n| base + n);
        }
        base += entry.count;
    }
    None
}

/// Decode the one-based source number stored in the software configuration area into flat port
/// index. Zero expresses no connection.
pub fn sw_port_num_to_flat_index(
    groups: &[PortGroup],
    mapping: &[SwPortMapping],
    direction: PortDirection,
    value: usize,
) -> Option<usize> {
    let mut num = value.checked_sub(1)?;
    let mut base = 0;
    for entry in mapping {
        if entry.direction != direction {
            continue;
        }
        if num < entry.count {
            return Some(base + num);
        }
        num -= entry.count;
        base += driver_group_count(groups, direction, entry.port_type);
    }
    None
}

/// Position of the port in the software configuration numbering, by flat port index.
pub fn flat_index_to_sw_port_num(
    groups: &[PortGroup],
    mapping: &[SwPortMapping],
    direction: PortDirection,
    index: usize,
) -> Option<usize> {
    port_from_flat_index(groups, direction, index)
        .and_then(|(port_type, num)| sw_port_index(mapping, direction, port_type, num))
}

/// Position of the port in the vector of mute switches. The switches cover analogue, S/PDIF, and
/// ADAT destinations in the order.
pub fn mute_switch_index(
    groups: &[PortGroup],
    port_type: PortType,
    num: usize,
) -> Option<usize> {
    const MUTE_ASSIGNMENT_ORDER: [PortType; 3] = [PortType::Analogue, PortType::Spdif, PortType::Adat];

    let mut base = 0;
    for &assigned in MUTE_ASSIGNMENT_ORDER.iter() {
        let count = driver_group_count(groups, PortDirection::Output, assigned);
        if port_type == assigned {
            return Some(base + num).filter(|_| num < count);
        }
        base += count;
    }
    None
}

/// The total number of destinations covered by mute switches.
pub fn mute_switch_count(groups: &[PortGroup]) -> usize {
    [PortType::Analogue, PortType::Spdif, PortType::Adat]
        .iter()
        .map(|&port_type| driver_group_count(groups, PortDirection::Output, port_type))
        .sum()
}

#[cfg(test)]
mod test {
    use super::*;

    const GROUPS: &[PortGroup] = &[
        PortGroup {
            port_type: PortType::Analogue,
            wire_base: 0x080,
            inputs: 8,
            outputs: [10, 10, 10],
            source_label: Some(PortLabel::Numbered {
                prefix: "Analogue In",
                zero_padded: true,
                first: 1,
            }),
            destination_label: Some(PortLabel::Numbered {
                prefix: "Analogue Out",
                zero_padded: true,
                first: 1,
            }),
            destination_remapping: None,
        },
        PortGroup {
            port_type: PortType::Spdif,
            wire_base: 0x180,
            inputs: 2,
            outputs: [2, 2, 2],
            source_label: Some(PortLabel::Numbered {
                prefix: "S/PDIF In",
                zero_padded: false,
                first: 1,
            }),
            destination_label: Some(PortLabel::Numbered {
                prefix: "S/PDIF Out",
                zero_padded: false,
                first: 1,
            }),
            destination_remapping: None,
        },
        PortGroup {
            port_type: PortType::Mix,
            wire_base: 0x300,
            inputs: 10,
            outputs: [18, 18, 18],
            source_label: Some(PortLabel::Lettered {
                prefix: "Mix ",
                suffix: " Out",
            }),
            destination_label: Some(PortLabel::Numbered {
                prefix: "Mix In",
                zero_padded: true,
                first: 1,
            }),
            destination_remapping: None,
        },
        PortGroup {
            port_type: PortType::Pcm,
            wire_base: 0x600,
            inputs: 20,
            outputs: [18, 14, 10],
            source_label: Some(PortLabel::Numbered {
                prefix: "PCM In",
                zero_padded: true,
                first: 1,
            }),
            destination_label: Some(PortLabel::Numbered {
                prefix: "PCM Out",
                zero_padded: true,
                first: 1,
            }),
            destination_remapping: None,
        },
    ];

    const NAMES: &[PortName] = &[PortName {
        direction: PortDirection::Output,
        port_type: PortType::Analogue,
        index: 0,
        name: "Monitor L",
    }];

    #[test]
    fn wire_id_round_trip() {
        [PortDirection::Input, PortDirection::Output]
            .iter()
            .for_each(|&direction| {
                let count = port_count(GROUPS, direction);
                (0..count).for_each(|index| {
                    let wire_id = port_wire_id(GROUPS, direction, index);
                    assert_ne!(wire_id, 0);
                    assert_eq!(
                        port_index_from_wire_id(GROUPS, direction, wire_id),
                        Some(index)
                    );
                });
            });
    }

    #[test]
    fn flat_index_round_trip() {
        [PortDirection::Input, PortDirection::Output]
            .iter()
            .for_each(|&direction| {
                let count = port_count(GROUPS, direction);
                (0..count).for_each(|index| {
                    let (port_type, num) =
                        port_from_flat_index(GROUPS, direction, index).unwrap();
                    assert_eq!(port_flat_index(GROUPS, direction, port_type, num), index);
                });
            });
    }

    #[test]
    fn wire_id_bases() {
        assert_eq!(port_wire_id(GROUPS, PortDirection::Input, 0), 0x080);
        assert_eq!(port_wire_id(GROUPS, PortDirection::Input, 8), 0x180);
        assert_eq!(port_wire_id(GROUPS, PortDirection::Input, 10), 0x300);
        assert_eq!(port_wire_id(GROUPS, PortDirection::Input, 20), 0x600);
        assert_eq!(port_wire_id(GROUPS, PortDirection::Output, 0), 0x080);
        assert_eq!(port_wire_id(GROUPS, PortDirection::Output, 30), 0x600);
    }

    #[test]
    fn zero_wire_id_is_off() {
        assert_eq!(port_index_from_wire_id(GROUPS, PortDirection::Input, 0), None);
        assert_eq!(
            port_index_from_wire_id(GROUPS, PortDirection::Output, 0x0f80),
            None
        );
    }

    #[test]
    fn unknown_index_is_not_encodable() {
        let count = port_count(GROUPS, PortDirection::Input);
        assert_eq!(port_wire_id(GROUPS, PortDirection::Input, count), 0);
    }

    #[test]
    fn port_name_formats() {
        assert_eq!(
            format_port_name(GROUPS, NAMES, PortDirection::Output, 0),
            "Analogue Out 01 (Monitor L)"
        );
        assert_eq!(
            format_port_name(GROUPS, NAMES, PortDirection::Output, 10),
            "S/PDIF Out 1"
        );
        assert_eq!(
            format_port_name(GROUPS, NAMES, PortDirection::Input, 10),
            "Mix A Out"
        );
        assert_eq!(
            format_port_name(GROUPS, NAMES, PortDirection::Input, 100),
            "Off"
        );
    }

    const SW_MAPPING: &[SwPortMapping] = &[
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            start: 0,
            count: 10,
        },
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Spdif,
            start: 0,
            count: 2,
        },
        SwPortMapping {
            direction: PortDirection::Input,
            port_type: PortType::Analogue,
            start: 0,
            count: 8,
        },
        SwPortMapping {
            direction: PortDirection::Input,
            port_type: PortType::Spdif,
            start: 0,
            count: 2,
        },
        SwPortMapping {
            direction: PortDirection::Input,
            port_type: PortType::Pcm,
            start: 0,
            count: 20,
        },
    ];

    #[test]
    fn sw_port_numbering() {
        assert_eq!(
            sw_port_index(SW_MAPPING, PortDirection::Output, PortType::Spdif, 1),
            Some(11)
        );
        assert_eq!(
            sw_port_index(SW_MAPPING, PortDirection::Output, PortType::Pcm, 0),
            None
        );

        // Value zero expresses no connection.
        assert_eq!(
            sw_port_num_to_flat_index(GROUPS, SW_MAPPING, PortDirection::Input, 0),
            None
        );
        // The first software source is the first analogue input.
        assert_eq!(
            sw_port_num_to_flat_index(GROUPS, SW_MAPPING, PortDirection::Input, 1),
            Some(0)
        );
        // The base advances by the hardware count of each mapped group.
        assert_eq!(
            sw_port_num_to_flat_index(GROUPS, SW_MAPPING, PortDirection::Input, 11),
            Some(10)
        );

        assert_eq!(
            flat_index_to_sw_port_num(GROUPS, SW_MAPPING, PortDirection::Input, 0),
            Some(0)
        );
        // Mixer returns have no software numbering.
        assert_eq!(
            flat_index_to_sw_port_num(GROUPS, SW_MAPPING, PortDirection::Input, 12),
            None
        );
    }

    #[test]
    fn mute_switch_positions() {
        assert_eq!(mute_switch_count(GROUPS), 12);
        assert_eq!(
            mute_switch_index(GROUPS, PortType::Analogue, 3),
            Some(3)
        );
        assert_eq!(mute_switch_index(GROUPS, PortType::Spdif, 0), Some(10));
        assert_eq!(mute_switch_index(GROUPS, PortType::Pcm, 0), None);
    }
}
