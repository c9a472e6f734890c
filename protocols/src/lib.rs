// SPDX-License-Identifier: LGPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

#![doc = include_str!("../README.md")]

pub mod config;
pub mod input;
pub mod led;
pub mod meter;
pub mod mixer;
pub mod monitor;
pub mod mux;
pub mod port;
pub mod sw_cfg;
pub mod transaction;
pub mod volume;

pub mod gen2;
pub mod gen3;

use {
    config::*,
    glib::Error,
    input::*,
    led::*,
    mixer::*,
    monitor::*,
    mux::*,
    port::*,
    transaction::*,
    volume::*,
};

/// The vendor identifier of Focusrite in USB.
pub const VENDOR_ID: u16 = 0x1235;

/// The kinds of failure in operations of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, glib::ErrorDomain)]
#[error_domain(name = "scarlett2-control-error")]
pub enum Scarlett2ControlError {
    /// Short transfer or rejected submission on an endpoint.
    IoTransport,
    /// The response frame fails validation.
    ProtocolMismatch,
    /// Unknown parameter, out of range index, or commit outside bounds.
    BadArgument,
    /// No space for a transfer buffer.
    ResourceExhausted,
    /// The model lacks the requested feature.
    NotSupported,
}

/// The static specification of one model.
pub trait Scarlett2HardwareSpecification {
    /// The product identifier in USB.
    const PRODUCT_ID: u16;

    /// Whether the analogue line outputs can be put under hardware volume control.
    const LINE_OUT_HW_VOL: bool = false;
    /// The number of hardware or virtual mute/dim buttons.
    const BUTTON_COUNT: usize = 0;
    /// The number of inputs with selectable line/instrument level.
    const LEVEL_INPUT_COUNT: usize = 0;
    /// Offset added to channel numbering of level switches.
    const LEVEL_INPUT_OFFSET: usize = 0;
    /// Whether level switches are kept as a bitmask instead of per channel bytes.
    const LEVEL_INPUT_BITMASK: bool = false;
    /// The number of inputs with an optional pad.
    const PAD_INPUT_COUNT: usize = 0;
    /// The number of inputs with the air feature.
    const AIR_INPUT_COUNT: usize = 0;
    /// Whether air switches are kept as a bitmask instead of per channel bytes.
    const AIR_INPUT_BITMASK: bool = false;
    /// The number of phantom power switches.
    const PHANTOM_SWITCH_COUNT: usize = 0;
    /// Whether phantom power state can persist across power cycles.
    const HAS_RETAIN_48V: bool = false;
    /// Whether the model has a mass storage device mode.
    const HAS_MSD_MODE: bool = false;
    /// Whether the model has main/alt speaker switching.
    const HAS_SPEAKER_SWITCHING: bool = false;
    /// The flavour of direct monitor, if any.
    const DIRECT_MONITOR: Option<DirectMonitorVariant> = None;
    /// Whether the model has the talkback bus.
    const HAS_TALKBACK: bool = false;
    /// Whether the model has the routing mux.
    const HAS_MUX: bool = false;
    /// Whether the model has the internal mixer.
    const HAS_MIXER: bool = false;
    /// Whether the model persists a software configuration area.
    const HAS_SOFTWARE_CONFIG: bool = false;
    /// Whether the model has level meters.
    const HAS_METERS: bool = false;
    /// Whether the model has the hardware volume path.
    const HAS_HW_VOLUME: bool = false;
    /// The number of gain halos.
    const GAIN_HALO_COUNT: usize = 0;
    /// The number of level meters.
    const METER_COUNT: usize = 56;

    /// The groups of ports of the model.
    const PORTS: &'static [PortGroup];
    /// Names of ports deviating from the group templates.
    const PORT_NAMES: &'static [PortName] = &[];
    /// Mapping between flat port indices and software configuration numbering.
    const SW_PORT_MAPPING: &'static [SwPortMapping] = &[];
    /// The layout of mux entries at each rate mode.
    const MUX_ASSIGNMENTS: [&'static [MuxAssignment]; 3] = [&[], &[], &[]];
    /// The layout of the configuration parameter space.
    const CONFIG_ITEMS: &'static [(ConfigParameter, ConfigItem)];

    fn config_item(param: ConfigParameter) -> Option<ConfigItem> {
        Self::CONFIG_ITEMS
            .iter()
            .find(|(p, _)| param.eq(p))
            .map(|(_, item)| *item)
    }

    /// The total number of sources.
    fn input_count() -> usize {
        port_count(Self::PORTS, PortDirection::Input)
    }

    /// The total number of destinations.
    fn output_count() -> usize {
        port_count(Self::PORTS, PortDirection::Output)
    }

    fn analogue_output_count() -> usize {
        Self::PORTS
            .iter()
            .find(|group| group.port_type == PortType::Analogue)
            .map(|group| group.count(PortDirection::Output))
            .unwrap_or_default()
    }

    /// The number of inputs to each mix; these are destinations of the mux.
    fn mixer_input_count() -> usize {
        Self::PORTS
            .iter()
            .find(|group| group.port_type == PortType::Mix)
            .map(|group| group.count(PortDirection::Output))
            .unwrap_or_default()
    }

    /// The number of mixes; these are sources of the mux.
    fn mixer_output_count() -> usize {
        Self::PORTS
            .iter()
            .find(|group| group.port_type == PortType::Mix)
            .map(|group| group.count(PortDirection::Input))
            .unwrap_or_default()
    }

    /// The number of mux entries transmitted at the rate mode.
    fn mux_slot_count(mode: RateMode) -> usize {
        Self::MUX_ASSIGNMENTS[mode.index()]
            .iter()
            .map(|assignment| assignment.count)
            .sum()
    }

    /// The number of destinations covered by mute switches.
    fn mute_switch_count() -> usize {
        port::mute_switch_count(Self::PORTS)
    }

    /// Format the name of the port addressed by flat index.
    fn port_name(direction: PortDirection, index: usize) -> String {
        format_port_name(Self::PORTS, Self::PORT_NAMES, direction, index)
    }

    fn create_output_parameters() -> Scarlett2OutputParameters {
        Scarlett2OutputParameters {
            master_vol: Default::default(),
            vols: vec![Default::default(); Self::analogue_output_count()],
            mutes: vec![Default::default(); Self::mute_switch_count()],
            vol_sw_hw_switches: vec![Default::default(); Self::analogue_output_count()],
            buttons: vec![Default::default(); Self::BUTTON_COUNT],
        }
    }

    fn create_input_switch_parameters() -> Scarlett2InputSwitchParameters {
        Scarlett2InputSwitchParameters {
            level_switches: vec![Default::default(); Self::LEVEL_INPUT_COUNT],
            pad_switches: vec![Default::default(); Self::PAD_INPUT_COUNT],
            air_switches: vec![Default::default(); Self::AIR_INPUT_COUNT],
            phantom_switches: vec![Default::default(); Self::PHANTOM_SWITCH_COUNT],
            retain_48v: Default::default(),
        }
    }

    fn create_mixer_parameters() -> Scarlett2MixerParameters {
        Scarlett2MixerParameters {
            gains: vec![
                vec![Default::default(); Self::mixer_input_count()];
                Self::mixer_output_count()
            ],
            mutes: vec![
                vec![Default::default(); Self::mixer_input_count()];
                Self::mixer_output_count()
            ],
        }
    }

    fn create_mux_parameters() -> Scarlett2MuxParameters {
        Scarlett2MuxParameters {
            routes: vec![Default::default(); Self::output_count()],
        }
    }

    fn create_monitor_parameters() -> Scarlett2MonitorParameters {
        Scarlett2MonitorParameters {
            mix_talkbacks: vec![Default::default(); Self::mixer_output_count()],
            ..Default::default()
        }
    }

    fn create_led_parameters() -> Scarlett2LedParameters {
        Scarlett2LedParameters {
            halo_colors: vec![Default::default(); Self::GAIN_HALO_COUNT],
            ..Default::default()
        }
    }
}
