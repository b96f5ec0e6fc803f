//! lcdtext - status text on small SPI LCD panels
//!
//! Drives an ST7565 or ILI9488 panel from a Linux board (spidev + GPIO
//! character device), plus two wiring helpers for the backlight/heater lines.
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod args;
mod demo;
mod lines;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use lcdtext_core::config::AppConfig;
use log::debug;

use crate::args::{Args, ArgsError, Command};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(ArgsError::Help) => {
            println!("{}", args::USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(1);
        }
    };

    match args.command {
        Command::Demo => match demo::run(&cfg, args.frames) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e:#}");
                demo::print_hints(&cfg);
                ExitCode::from(1)
            }
        },
        Command::Backlight => match lines::backlight(&cfg) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e:#}");
                ExitCode::from(1)
            }
        },
        Command::Probe => match lines::probe(&cfg) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Probe failed: {e:#}");
                ExitCode::from(2)
            }
        },
    }
}

/// Defaults, then the config file, then command-line overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut cfg = match &args.config {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut cfg).context("applying command-line options")?;
    cfg.panel.validate().context("checking panel configuration")?;

    debug!("configuration: {:?}", cfg);
    Ok(cfg)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
