mod capture;
mod cli;
mod config;
mod core;
mod error;
mod packet;
mod ui;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use crate::capture::{libpcap, PcapEngine};
use crate::cli::CliArgs;
use crate::config::CaptureConfig;
use crate::core::exit::{codes, error_code, outcome_code};
use crate::core::runner::Session;
use crate::core::signal::CtrlcHook;
use crate::core::summary::write_summary;
use crate::ui::device::print_device_list;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    if args.list_interfaces {
        return list_interfaces();
    }

    let config = CaptureConfig::from_args(&args);
    let session = Session::new(PcapEngine, CtrlcHook, config);

    let mut out = io::stdout().lock();
    let result = session.run(&mut out).and_then(|outcome| {
        out.flush()?;
        Ok(outcome)
    });

    match result {
        Ok(outcome) => {
            if outcome.live {
                info!("capture ended: {}", outcome.reason);
                if let Err(e) = write_summary(&mut io::stderr(), &outcome) {
                    error!("couldn't print summary: {}", e);
                }
            }
            exit_code(outcome_code(&outcome))
        }
        Err(e) => {
            error!("{}", e);
            exit_code(error_code(&e))
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();
}

fn list_interfaces() -> ExitCode {
    let devices = match libpcap::list_devices() {
        Ok(devices) => devices,
        Err(e) => {
            error!("{}", e);
            return exit_code(error_code(&e));
        }
    };

    match print_device_list(&mut io::stdout().lock(), &devices) {
        Ok(()) => exit_code(codes::SUCCESS),
        Err(e) => {
            error!("couldn't print devices: {}", e);
            exit_code(codes::OUTPUT_ERROR)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}
