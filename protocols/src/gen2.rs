// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Model specifications for Scarlett Gen 2 series.

use super::*;

/// The specification of Scarlett 6i6 Gen 2.
#[derive(Default, Debug)]
pub struct Scarlett6i6Gen2Protocol;

impl Scarlett2HardwareSpecification for Scarlett6i6Gen2Protocol {
    const PRODUCT_ID: u16 = 0x8203;

    // The first two analogue inputs can be switched between line and instrument levels, and
    // have an optional pad.
    const LEVEL_INPUT_COUNT: usize = 2;
    const PAD_INPUT_COUNT: usize = 2;

    const HAS_MUX: bool = true;
    const HAS_MIXER: bool = true;
    const HAS_SOFTWARE_CONFIG: bool = true;
    const HAS_METERS: bool = true;
    const HAS_HW_VOLUME: bool = true;

    const PORTS: &'static [PortGroup] = &[
        PortGroup {
            port_type: PortType::Analogue,
            wire_base: 0x080,
            inputs: 4,
            outputs: [4, 4, 4],
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
            inputs: 6,
            outputs: [6, 6, 6],
            source_label: Some(PortLabel::Numbered {
                prefix: "PCM In",
                zero_padded: false,
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

    const PORT_NAMES: &'static [PortName] = &[
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 0,
            name: "Headphones 1 L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 1,
            name: "Headphones 1 R",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 2,
            name: "Headphones 2 L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 3,
            name: "Headphones 2 R",
        },
    ];

    const SW_PORT_MAPPING: &'static [SwPortMapping] = &[
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            start: 0,
            count: 6,
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
            count: 4,
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
            count: 6,
        },
    ];

    const MUX_ASSIGNMENTS: [&'static [MuxAssignment]; 3] = [
        S6I6_GEN2_MUX_ASSIGNMENT,
        S6I6_GEN2_MUX_ASSIGNMENT,
        S6I6_GEN2_MUX_ASSIGNMENT,
    ];

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = PRO_CONFIG_ITEMS;
}

const S6I6_GEN2_MUX_ASSIGNMENT: &[MuxAssignment] = &[
    MuxAssignment {
        port_type: PortType::Pcm,
        start: 0,
        count: 6,
    },
    MuxAssignment {
        port_type: PortType::Analogue,
        start: 0,
        count: 4,
    },
    MuxAssignment {
        port_type: PortType::Spdif,
        start: 0,
        count: 2,
    },
    MuxAssignment {
        port_type: PortType::Mix,
        start: 0,
        count: 18,
    },
    MuxAssignment {
        port_type: PortType::None,
        start: 0,
        count: 12,
    },
];

/// The specification of Scarlett 18i8 Gen 2.
#[derive(Default, Debug)]
pub struct Scarlett18i8Gen2Protocol;

impl Scarlett2HardwareSpecification for Scarlett18i8Gen2Protocol {
    const PRODUCT_ID: u16 = 0x8204;

    const LEVEL_INPUT_COUNT: usize = 2;
    // The first four analogue inputs have an optional pad.
    const PAD_INPUT_COUNT: usize = 4;

    const HAS_MUX: bool = true;
    const HAS_MIXER: bool = true;
    const HAS_SOFTWARE_CONFIG: bool = true;
    const HAS_METERS: bool = true;
    const HAS_HW_VOLUME: bool = true;

    const PORTS: &'static [PortGroup] = &[
        PortGroup {
            port_type: PortType::Analogue,
            wire_base: 0x080,
            inputs: 8,
            outputs: [6, 6, 6],
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
        // S/PDIF outputs are not available at 192 kHz but stay in the mux assignment anyway.
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
            port_type: PortType::Adat,
            wire_base: 0x200,
            inputs: 8,
            outputs: [0, 0, 0],
            source_label: Some(PortLabel::Numbered {
                prefix: "ADAT In",
                zero_padded: false,
                first: 1,
            }),
            destination_label: Some(PortLabel::Numbered {
                prefix: "ADAT Out",
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
            inputs: 8,
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

    const PORT_NAMES: &'static [PortName] = &[
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 0,
            name: "Monitor L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 1,
            name: "Monitor R",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 2,
            name: "Headphones 1 L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 3,
            name: "Headphones 1 R",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 4,
            name: "Headphones 2 L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 5,
            name: "Headphones 2 R",
        },
    ];

    const SW_PORT_MAPPING: &'static [SwPortMapping] = &[
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            start: 0,
            count: 8,
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
            port_type: PortType::Adat,
            start: 0,
            count: 8,
        },
        SwPortMapping {
            direction: PortDirection::Input,
            port_type: PortType::Pcm,
            start: 0,
            count: 20,
        },
    ];

    const MUX_ASSIGNMENTS: [&'static [MuxAssignment]; 3] = [
        &[
            MuxAssignment {
                port_type: PortType::Pcm,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 6,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 16,
            },
        ],
        &[
            MuxAssignment {
                port_type: PortType::Pcm,
                start: 0,
                count: 14,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 6,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 16,
            },
        ],
        &[
            MuxAssignment {
                port_type: PortType::Pcm,
                start: 0,
                count: 10,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 6,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 14,
            },
        ],
    ];

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = PRO_CONFIG_ITEMS;
}

/// The specification of Scarlett 18i20 Gen 2.
#[derive(Default, Debug)]
pub struct Scarlett18i20Gen2Protocol;

impl Scarlett2HardwareSpecification for Scarlett18i20Gen2Protocol {
    const PRODUCT_ID: u16 = 0x8201;

    // The analogue line outputs can be switched between software and hardware volume control.
    const LINE_OUT_HW_VOL: bool = true;
    // Mute and dim buttons.
    const BUTTON_COUNT: usize = 2;

    const HAS_MUX: bool = true;
    const HAS_MIXER: bool = true;
    const HAS_SOFTWARE_CONFIG: bool = true;
    const HAS_METERS: bool = true;
    const HAS_HW_VOLUME: bool = true;

    const PORTS: &'static [PortGroup] = &[
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
            port_type: PortType::Adat,
            wire_base: 0x200,
            inputs: 8,
            outputs: [8, 4, 0],
            source_label: Some(PortLabel::Numbered {
                prefix: "ADAT In",
                zero_padded: false,
                first: 1,
            }),
            destination_label: Some(PortLabel::Numbered {
                prefix: "ADAT Out",
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

    const PORT_NAMES: &'static [PortName] = &[
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 0,
            name: "Monitor L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 1,
            name: "Monitor R",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 6,
            name: "Headphones 1 L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 7,
            name: "Headphones 1 R",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 8,
            name: "Headphones 2 L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 9,
            name: "Headphones 2 R",
        },
    ];

    const SW_PORT_MAPPING: &'static [SwPortMapping] = &[
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
            direction: PortDirection::Output,
            port_type: PortType::Adat,
            start: 0,
            count: 8,
        },
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Adat2,
            start: 0,
            count: 4,
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
            port_type: PortType::Adat,
            start: 0,
            count: 8,
        },
        SwPortMapping {
            direction: PortDirection::Input,
            port_type: PortType::Adat2,
            start: 0,
            count: 4,
        },
        SwPortMapping {
            direction: PortDirection::Input,
            port_type: PortType::Pcm,
            start: 0,
            count: 20,
        },
    ];

    const MUX_ASSIGNMENTS: [&'static [MuxAssignment]; 3] = [
        &[
            MuxAssignment {
                port_type: PortType::Pcm,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 10,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Adat,
                start: 0,
                count: 8,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 21,
            },
        ],
        &[
            MuxAssignment {
                port_type: PortType::Pcm,
                start: 0,
                count: 14,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 10,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Adat,
                start: 0,
                count: 4,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 25,
            },
        ],
        &[
            MuxAssignment {
                port_type: PortType::Pcm,
                start: 0,
                count: 10,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 10,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 18,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 6,
            },
        ],
    ];

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = PRO_CONFIG_ITEMS;
}

#[cfg(test)]
mod test {
    use super::*;

    fn port_algebra_round_trip<T: Scarlett2HardwareSpecification>() {
        [PortDirection::Input, PortDirection::Output]
            .iter()
            .for_each(|&direction| {
                let count = port_count(T::PORTS, direction);
                (0..count).for_each(|index| {
                    let wire_id = port_wire_id(T::PORTS, direction, index);
                    assert_eq!(
                        port_index_from_wire_id(T::PORTS, direction, wire_id),
                        Some(index)
                    );
                    let (port_type, num) =
                        port_from_flat_index(T::PORTS, direction, index).unwrap();
                    assert_eq!(port_flat_index(T::PORTS, direction, port_type, num), index);
                });
            });
    }

    #[test]
    fn port_algebra() {
        port_algebra_round_trip::<Scarlett6i6Gen2Protocol>();
        port_algebra_round_trip::<Scarlett18i8Gen2Protocol>();
        port_algebra_round_trip::<Scarlett18i20Gen2Protocol>();
    }

    #[test]
    fn mux_slot_counts() {
        assert_eq!(Scarlett6i6Gen2Protocol::mux_slot_count(RateMode::Low), 42);
        assert_eq!(Scarlett6i6Gen2Protocol::mux_slot_count(RateMode::High), 42);
        assert_eq!(Scarlett18i8Gen2Protocol::mux_slot_count(RateMode::Low), 60);
        assert_eq!(Scarlett18i8Gen2Protocol::mux_slot_count(RateMode::Middle), 56);
        assert_eq!(Scarlett18i8Gen2Protocol::mux_slot_count(RateMode::High), 50);
        assert_eq!(Scarlett18i20Gen2Protocol::mux_slot_count(RateMode::Low), 77);
        assert_eq!(Scarlett18i20Gen2Protocol::mux_slot_count(RateMode::Middle), 73);
        assert_eq!(Scarlett18i20Gen2Protocol::mux_slot_count(RateMode::High), 46);
    }

    #[test]
    fn counts() {
        assert_eq!(Scarlett18i20Gen2Protocol::input_count(), 48);
        assert_eq!(Scarlett18i20Gen2Protocol::output_count(), 56);
        assert_eq!(Scarlett18i20Gen2Protocol::analogue_output_count(), 10);
        assert_eq!(Scarlett18i20Gen2Protocol::mixer_input_count(), 18);
        assert_eq!(Scarlett18i20Gen2Protocol::mixer_output_count(), 10);
        assert_eq!(Scarlett18i20Gen2Protocol::mute_switch_count(), 20);
    }

    #[test]
    fn port_names() {
        assert_eq!(
            Scarlett18i20Gen2Protocol::port_name(PortDirection::Output, 0),
            "Analogue Out 01 (Monitor L)"
        );
        assert_eq!(
            Scarlett18i20Gen2Protocol::port_name(PortDirection::Output, 6),
            "Analogue Out 07 (Headphones 1 L)"
        );
        assert_eq!(
            Scarlett18i20Gen2Protocol::port_name(PortDirection::Input, 10),
            "ADAT In 1"
        );
        assert_eq!(
            Scarlett6i6Gen2Protocol::port_name(PortDirection::Input, 6),
            "Mix A Out"
        );
    }
}
