// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! Model specifications for Scarlett Gen 3 series.

use super::*;

/// The specification of Scarlett Solo Gen 3.
#[derive(Default, Debug)]
pub struct ScarlettSoloGen3Protocol;

impl Scarlett2HardwareSpecification for ScarlettSoloGen3Protocol {
    const PRODUCT_ID: u16 = 0x8211;

    // The second analogue input can be switched between line and instrument levels, and has the
    // air feature. Both are kept as bitmasks in a single byte.
    const LEVEL_INPUT_COUNT: usize = 1;
    const LEVEL_INPUT_OFFSET: usize = 1;
    const LEVEL_INPUT_BITMASK: bool = true;
    const AIR_INPUT_COUNT: usize = 1;
    const AIR_INPUT_BITMASK: bool = true;

    const PHANTOM_SWITCH_COUNT: usize = 1;
    const HAS_RETAIN_48V: bool = true;
    const DIRECT_MONITOR: Option<DirectMonitorVariant> = Some(DirectMonitorVariant::Mono);
    const GAIN_HALO_COUNT: usize = 2;

    const PORTS: &'static [PortGroup] = HOME_SEGMENT_PORTS;

    const PORT_NAMES: &'static [PortName] = HOME_SEGMENT_PORT_NAMES;

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = HOME_CONFIG_ITEMS;
}

/// The specification of Scarlett 2i2 Gen 3.
#[derive(Default, Debug)]
pub struct Scarlett2i2Gen3Protocol;

impl Scarlett2HardwareSpecification for Scarlett2i2Gen3Protocol {
    const PRODUCT_ID: u16 = 0x8210;

    const LEVEL_INPUT_COUNT: usize = 2;
    const LEVEL_INPUT_BITMASK: bool = true;
    const AIR_INPUT_COUNT: usize = 2;
    const AIR_INPUT_BITMASK: bool = true;

    const PHANTOM_SWITCH_COUNT: usize = 1;
    const HAS_RETAIN_48V: bool = true;
    const DIRECT_MONITOR: Option<DirectMonitorVariant> = Some(DirectMonitorVariant::Stereo);
    const GAIN_HALO_COUNT: usize = 2;

    const PORTS: &'static [PortGroup] = HOME_SEGMENT_PORTS;

    const PORT_NAMES: &'static [PortName] = HOME_SEGMENT_PORT_NAMES;

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = HOME_CONFIG_ITEMS;
}

const HOME_SEGMENT_PORTS: &[PortGroup] = &[
    PortGroup {
        port_type: PortType::Analogue,
        wire_base: 0x080,
        inputs: 2,
        outputs: [2, 2, 2],
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
        port_type: PortType::Pcm,
        wire_base: 0x600,
        inputs: 2,
        outputs: [2, 2, 2],
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

const HOME_SEGMENT_PORT_NAMES: &[PortName] = &[
    PortName {
        direction: PortDirection::Output,
        port_type: PortType::Analogue,
        index: 0,
        name: "Headphones L",
    },
    PortName {
        direction: PortDirection::Output,
        port_type: PortType::Analogue,
        index: 1,
        name: "Headphones R",
    },
];

/// The specification of Scarlett 4i4 Gen 3.
#[derive(Default, Debug)]
pub struct Scarlett4i4Gen3Protocol;

impl Scarlett2HardwareSpecification for Scarlett4i4Gen3Protocol {
    const PRODUCT_ID: u16 = 0x8212;

    const LEVEL_INPUT_COUNT: usize = 2;
    const PAD_INPUT_COUNT: usize = 2;
    const AIR_INPUT_COUNT: usize = 2;
    const PHANTOM_SWITCH_COUNT: usize = 1;
    const HAS_MSD_MODE: bool = true;

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
            port_type: PortType::Mix,
            wire_base: 0x300,
            inputs: 6,
            outputs: [8, 8, 8],
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
            inputs: 4,
            outputs: [6, 6, 6],
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
            name: "Headphones L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 3,
            name: "Headphones R",
        },
    ];

    const SW_PORT_MAPPING: &'static [SwPortMapping] = &[
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            start: 0,
            count: 4,
        },
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            start: 4,
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
            port_type: PortType::Pcm,
            start: 0,
            count: 4,
        },
    ];

    const MUX_ASSIGNMENTS: [&'static [MuxAssignment]; 3] = [
        &[
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
                port_type: PortType::Mix,
                start: 0,
                count: 8,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 59,
            },
        ],
        &[
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
                port_type: PortType::Mix,
                start: 0,
                count: 8,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 55,
            },
        ],
        &[
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
                port_type: PortType::Mix,
                start: 0,
                count: 8,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 28,
            },
        ],
    ];

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = PRO_CONFIG_ITEMS;
}

/// The specification of Scarlett 8i6 Gen 3.
#[derive(Default, Debug)]
pub struct Scarlett8i6Gen3Protocol;

impl Scarlett2HardwareSpecification for Scarlett8i6Gen3Protocol {
    const PRODUCT_ID: u16 = 0x8213;

    const LEVEL_INPUT_COUNT: usize = 2;
    const PAD_INPUT_COUNT: usize = 2;
    const AIR_INPUT_COUNT: usize = 2;
    const PHANTOM_SWITCH_COUNT: usize = 1;
    const HAS_MSD_MODE: bool = true;
    const HAS_RETAIN_48V: bool = true;

    const HAS_MUX: bool = true;
    const HAS_MIXER: bool = true;
    const HAS_SOFTWARE_CONFIG: bool = true;
    const HAS_METERS: bool = true;
    const HAS_HW_VOLUME: bool = true;

    const PORTS: &'static [PortGroup] = &[
        PortGroup {
            port_type: PortType::Analogue,
            wire_base: 0x080,
            inputs: 6,
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
            inputs: 8,
            outputs: [8, 8, 8],
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
            outputs: [10, 10, 10],
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
            name: "Headphones 3 R",
        },
    ];

    const SW_PORT_MAPPING: &'static [SwPortMapping] = &[
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            start: 0,
            count: 4,
        },
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Spdif,
            start: 0,
            count: 2,
        },
        SwPortMapping {
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            start: 4,
            count: 2,
        },
        SwPortMapping {
            direction: PortDirection::Input,
            port_type: PortType::Analogue,
            start: 0,
            count: 6,
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
            count: 10,
        },
    ];

    const MUX_ASSIGNMENTS: [&'static [MuxAssignment]; 3] = [
        S8I6_GEN3_MUX_ASSIGNMENT,
        S8I6_GEN3_MUX_ASSIGNMENT,
        S8I6_GEN3_MUX_ASSIGNMENT,
    ];

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = PRO_CONFIG_ITEMS;
}

const S8I6_GEN3_MUX_ASSIGNMENT: &[MuxAssignment] = &[
    MuxAssignment {
        port_type: PortType::Pcm,
        start: 0,
        count: 10,
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
        count: 8,
    },
    MuxAssignment {
        port_type: PortType::None,
        start: 0,
        count: 18,
    },
];

/// The specification of Scarlett 18i8 Gen 3.
#[derive(Default, Debug)]
pub struct Scarlett18i8Gen3Protocol;

impl Scarlett2HardwareSpecification for Scarlett18i8Gen3Protocol {
    const PRODUCT_ID: u16 = 0x8214;

    const LINE_OUT_HW_VOL: bool = true;
    // Virtual mute and dim buttons.
    const BUTTON_COUNT: usize = 2;

    const LEVEL_INPUT_COUNT: usize = 2;
    const PAD_INPUT_COUNT: usize = 4;
    const AIR_INPUT_COUNT: usize = 4;
    const PHANTOM_SWITCH_COUNT: usize = 2;
    const HAS_MSD_MODE: bool = true;
    const HAS_SPEAKER_SWITCHING: bool = true;
    const HAS_RETAIN_48V: bool = true;
    const GAIN_HALO_COUNT: usize = 4;

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
            outputs: [8, 8, 8],
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
            // The physical jacks run monitor, headphones, then alt monitor.
            destination_remapping: Some(&[0, 1, 6, 7, 2, 3, 4, 5]),
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
            outputs: [20, 20, 20],
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
            outputs: [20, 16, 10],
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
            name: "Main Monitor L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 1,
            name: "Main Monitor R",
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
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 6,
            name: "Alt Monitor L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 7,
            name: "Alt Monitor R",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            index: 10,
            name: "Loopback L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            index: 11,
            name: "Loopback R",
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
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            start: 10,
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
                count: 20,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 8,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 20,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 10,
            },
        ],
        &[
            MuxAssignment {
                port_type: PortType::Pcm,
                start: 0,
                count: 16,
            },
            MuxAssignment {
                port_type: PortType::Analogue,
                start: 0,
                count: 8,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 20,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 10,
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
                count: 8,
            },
            MuxAssignment {
                port_type: PortType::Spdif,
                start: 0,
                count: 2,
            },
            MuxAssignment {
                port_type: PortType::Mix,
                start: 0,
                count: 20,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 10,
            },
        ],
    ];

    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)] = PRO_CONFIG_ITEMS;
}

/// The specification of Scarlett 18i20 Gen 3.
#[derive(Default, Debug)]
pub struct Scarlett18i20Gen3Protocol;

impl Scarlett2HardwareSpecification for Scarlett18i20Gen3Protocol {
    const PRODUCT_ID: u16 = 0x8215;

    const LINE_OUT_HW_VOL: bool = true;
    const BUTTON_COUNT: usize = 2;

    const LEVEL_INPUT_COUNT: usize = 2;
    const PAD_INPUT_COUNT: usize = 8;
    const AIR_INPUT_COUNT: usize = 8;
    const PHANTOM_SWITCH_COUNT: usize = 2;
    const HAS_MSD_MODE: bool = true;
    const HAS_SPEAKER_SWITCHING: bool = true;
    const HAS_TALKBACK: bool = true;
    const HAS_RETAIN_48V: bool = true;

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
            outputs: [8, 8, 0],
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
            inputs: 12,
            outputs: [24, 24, 24],
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
            outputs: [20, 18, 10],
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
        PortGroup {
            port_type: PortType::InternalMic,
            wire_base: 0x088,
            inputs: 1,
            outputs: [0, 0, 0],
            source_label: Some(PortLabel::Fixed("Internal Mic")),
            destination_label: None,
            destination_remapping: None,
        },
        PortGroup {
            port_type: PortType::Talkback,
            wire_base: 0x318,
            inputs: 0,
            outputs: [1, 1, 1],
            source_label: None,
            destination_label: Some(PortLabel::Fixed("Talkback")),
            destination_remapping: None,
        },
    ];

    const PORT_NAMES: &'static [PortName] = &[
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 0,
            name: "Main Monitor L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 1,
            name: "Main Monitor R",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 2,
            name: "Alt Monitor L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Analogue,
            index: 3,
            name: "Alt Monitor R",
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
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            index: 8,
            name: "Loopback L",
        },
        PortName {
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            index: 9,
            name: "Loopback R",
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
            direction: PortDirection::Output,
            port_type: PortType::Pcm,
            start: 8,
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
                count: 20,
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
                count: 24,
            },
            MuxAssignment {
                port_type: PortType::Talkback,
                start: 0,
                count: 1,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 12,
            },
        ],
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
                count: 24,
            },
            MuxAssignment {
                port_type: PortType::Talkback,
                start: 0,
                count: 1,
            },
            MuxAssignment {
                port_type: PortType::None,
                start: 0,
                count: 10,
            },
        ],
        // All talkback and mixer destinations stay addressable at the high rates, leaving no
        // room for padding.
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
                count: 24,
            },
            MuxAssignment {
                port_type: PortType::Talkback,
                start: 0,
                count: 1,
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
                        Some(index),
                        "direction {:?} index {}",
                        direction,
                        index,
                    );
                    let (port_type, num) =
                        port_from_flat_index(T::PORTS, direction, index).unwrap();
                    assert_eq!(port_flat_index(T::PORTS, direction, port_type, num), index);
                });
            });
    }

    #[test]
    fn port_algebra() {
        port_algebra_round_trip::<ScarlettSoloGen3Protocol>();
        port_algebra_round_trip::<Scarlett2i2Gen3Protocol>();
        port_algebra_round_trip::<Scarlett4i4Gen3Protocol>();
        port_algebra_round_trip::<Scarlett8i6Gen3Protocol>();
        port_algebra_round_trip::<Scarlett18i8Gen3Protocol>();
        port_algebra_round_trip::<Scarlett18i20Gen3Protocol>();
    }

    #[test]
    fn mux_slot_counts() {
        assert_eq!(Scarlett4i4Gen3Protocol::mux_slot_count(RateMode::Low), 77);
        assert_eq!(Scarlett4i4Gen3Protocol::mux_slot_count(RateMode::Middle), 73);
        assert_eq!(Scarlett4i4Gen3Protocol::mux_slot_count(RateMode::High), 46);
        assert_eq!(Scarlett8i6Gen3Protocol::mux_slot_count(RateMode::Low), 42);
        assert_eq!(Scarlett18i8Gen3Protocol::mux_slot_count(RateMode::Low), 60);
        assert_eq!(Scarlett18i8Gen3Protocol::mux_slot_count(RateMode::Middle), 56);
        assert_eq!(Scarlett18i8Gen3Protocol::mux_slot_count(RateMode::High), 50);
        assert_eq!(Scarlett18i20Gen3Protocol::mux_slot_count(RateMode::Low), 77);
        assert_eq!(Scarlett18i20Gen3Protocol::mux_slot_count(RateMode::Middle), 73);
        assert_eq!(Scarlett18i20Gen3Protocol::mux_slot_count(RateMode::High), 47);
    }

    #[test]
    fn talkback_ports_have_wire_ids_past_their_groups() {
        let groups = Scarlett18i20Gen3Protocol::PORTS;

        let index = port_flat_index(groups, PortDirection::Input, PortType::InternalMic, 0);
        assert_eq!(port_wire_id(groups, PortDirection::Input, index), 0x088);

        let index = port_flat_index(groups, PortDirection::Output, PortType::Talkback, 0);
        assert_eq!(port_wire_id(groups, PortDirection::Output, index), 0x318);
    }

    #[test]
    fn remapped_destination_names() {
        assert_eq!(
            Scarlett18i8Gen3Protocol::port_name(PortDirection::Output, 2),
            "Analogue Out 07 (Headphones 1 L)"
        );
        assert_eq!(
            Scarlett18i8Gen3Protocol::port_name(PortDirection::Output, 6),
            "Analogue Out 03 (Alt Monitor L)"
        );
        assert_eq!(
            Scarlett18i20Gen3Protocol::port_name(PortDirection::Output, 64),
            "Talkback"
        );
        assert_eq!(
            Scarlett18i20Gen3Protocol::port_name(PortDirection::Input, 50),
            "Internal Mic"
        );
    }

    #[test]
    fn counts() {
        assert_eq!(Scarlett18i20Gen3Protocol::input_count(), 51);
        assert_eq!(Scarlett18i20Gen3Protocol::output_count(), 65);
        assert_eq!(Scarlett18i20Gen3Protocol::mixer_input_count(), 24);
        assert_eq!(Scarlett18i20Gen3Protocol::mixer_output_count(), 12);
        assert_eq!(ScarlettSoloGen3Protocol::output_count(), 4);
        assert_eq!(Scarlett2i2Gen3Protocol::mixer_output_count(), 0);
    }
}
