// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use {
    clap::Parser,
    snd_scarlett2_ctl_service::{cmdline::ServiceCmd, LogLevel, ScarlettRuntime},
};

struct ScarlettServiceCmd;

#[derive(Parser, Default)]
#[clap(name = "snd-scarlett2-ctl-service")]
struct Arguments {
    /// The device_setup mask; bit 0 enables the service, bit 1 exposes the MSD mode switch.
    #[clap(long, short, default_value_t = 1)]
    device_setup: u32,

    /// The level to debug runtime, disabled as a default.
    #[clap(long, short, value_enum)]
    log_level: Option<LogLevel>,
}

impl ServiceCmd<Arguments, u32, ScarlettRuntime> for ScarlettServiceCmd {
    fn params(args: &Arguments) -> (u32, Option<LogLevel>) {
        (args.device_setup, args.log_level)
    }
}

fn main() {
    ScarlettServiceCmd::run()
}
