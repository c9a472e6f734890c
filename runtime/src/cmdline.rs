// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

use {
    super::{LogLevel, RuntimeOperation},
    clap::Parser,
    glib::Error,
    usb_scarlett2_protocols::Scarlett2ControlError,
};

pub trait ServiceCmd<A, T, R>: Sized
where
    A: Parser,
    R: RuntimeOperation<T>,
{
    fn params(args: &A) -> (T, Option<LogLevel>);

    fn run() {
        let code = A::try_parse()
            .map_err(|err| err.to_string())
            .map(|args| Self::params(&args))
            .and_then(|(params, log_level)| {
                R::new(params, log_level)
                    .and_then(|mut runtime| {
                        runtime.listen()?;
                        runtime.run()?;
                        Ok(libc::EXIT_SUCCESS)
                    })
                    .map_err(|err| specific_err_to_string(&err))
            })
            .unwrap_or_else(|msg| {
                eprintln!("{}", msg);
                libc::EXIT_FAILURE
            });

        std::process::exit(code)
    }
}

fn specific_err_to_string(e: &Error) -> String {
    let (domain, cause) = if let Some(error) = e.kind::<Scarlett2ControlError>() {
        (
            "Scarlett control operation error",
            match error {
                Scarlett2ControlError::IoTransport => "USB transfer failed",
                Scarlett2ControlError::ProtocolMismatch => "Response validation failed",
                Scarlett2ControlError::BadArgument => "Invalid argument",
                Scarlett2ControlError::ResourceExhausted => "No memory for transfer",
                Scarlett2ControlError::NotSupported => "The unit lacks the feature",
            },
        )
    } else {
        ("Unknown domain error", "")
    };
    format!("{}: {}, {}", domain, cause, e)
}
