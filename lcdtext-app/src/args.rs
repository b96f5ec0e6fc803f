//! Command-line parsing
//!
//! `lcdtext <demo|backlight|probe> [--config FILE] [--frames N] [--key value]...`
//!
//! Every other `--key value` pair is handed to [`AppConfig::set`] after the
//! config file has been loaded, so the command line always wins.

use std::fmt;
use std::path::PathBuf;

use lcdtext_core::config::{AppConfig, ConfigError};

pub const USAGE: &str = "\
usage: lcdtext <command> [--config FILE] [--key value]...

commands:
  demo        drive the four-line status demo on a panel
  backlight   soft-PWM the backlight line and set the heater line
  probe       toggle one GPIO line to check wiring

panel:     --model st7565|ili9488|msp3520  --spidev PATH  --spi-hz HZ  --spi-mode N
           --chip PATH  --dc N  --rst N  --width N  --height N  --rotation N
           --pixel-format rgb565|rgb666  --fg COLOR  --bg COLOR  --max-transfer BYTES
font:      --font PATH  --small-px N  --large-px N
demo:      --frames N (0 runs forever)
backlight: --bl-pin N  --bl-duty PCT  --bl-freq HZ  --heater-pin N  --heater-on 0|1
probe:     --line N";

/// Subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Demo,
    Backlight,
    Probe,
}

impl Command {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "demo" => Some(Command::Demo),
            "backlight" | "gpio" => Some(Command::Backlight),
            "probe" => Some(Command::Probe),
            _ => None,
        }
    }
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub config: Option<PathBuf>,
    /// Demo frames to draw, `None` for no limit
    pub frames: Option<u64>,
    pub overrides: Vec<(String, String)>,
}

/// Command line errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    Help,
    MissingCommand,
    UnknownCommand(String),
    MissingValue(String),
    Unexpected(String),
    BadFrames(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::Help => f.write_str(USAGE),
            ArgsError::MissingCommand => write!(f, "missing command\n\n{USAGE}"),
            ArgsError::UnknownCommand(c) => write!(f, "unknown command {c:?}\n\n{USAGE}"),
            ArgsError::MissingValue(k) => write!(f, "--{k} needs a value"),
            ArgsError::Unexpected(a) => write!(f, "unexpected argument {a:?}"),
            ArgsError::BadFrames(v) => write!(f, "invalid frame count {v:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl Args {
    /// Parse arguments, program name excluded
    pub fn parse<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);

        let first = args.next().ok_or(ArgsError::MissingCommand)?;
        if first == "-h" || first == "--help" {
            return Err(ArgsError::Help);
        }
        let command = Command::parse(&first).ok_or(ArgsError::UnknownCommand(first))?;

        let mut parsed = Args {
            command,
            config: None,
            frames: None,
            overrides: Vec::new(),
        };

        while let Some(arg) = args.next() {
            if arg == "-h" || arg == "--help" {
                return Err(ArgsError::Help);
            }
            let Some(key) = arg.strip_prefix("--") else {
                return Err(ArgsError::Unexpected(arg));
            };
            let key = key.to_string();
            let value = args
                .next()
                .ok_or_else(|| ArgsError::MissingValue(key.clone()))?;

            match key.as_str() {
                "config" => parsed.config = Some(PathBuf::from(value)),
                "frames" => {
                    let n: u64 = value.parse().map_err(|_| ArgsError::BadFrames(value))?;
                    parsed.frames = (n > 0).then_some(n);
                }
                _ => parsed.overrides.push((key, value)),
            }
        }

        Ok(parsed)
    }

    /// Apply the `--key value` overrides in order
    pub fn apply(&self, cfg: &mut AppConfig) -> Result<(), ConfigError> {
        for (key, value) in &self.overrides {
            cfg.set(key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcdtext_core::config::PanelModel;

    #[test]
    fn test_parse_demo_with_overrides() {
        let args = Args::parse(["demo", "--model", "ili9488", "--dc", "25", "--frames", "3"]).unwrap();
        assert_eq!(args.command, Command::Demo);
        assert_eq!(args.frames, Some(3));
        assert_eq!(
            args.overrides,
            vec![
                ("model".to_string(), "ili9488".to_string()),
                ("dc".to_string(), "25".to_string()),
            ]
        );

        let mut cfg = AppConfig::default();
        args.apply(&mut cfg).unwrap();
        assert_eq!(cfg.panel.model, PanelModel::Ili9488);
        assert_eq!(cfg.panel.dc_line, 25);
    }

    #[test]
    fn test_config_path_and_forever() {
        let args = Args::parse(["probe", "--config", "/etc/lcdtext.toml", "--frames", "0"]).unwrap();
        assert_eq!(args.command, Command::Probe);
        assert_eq!(args.config, Some(PathBuf::from("/etc/lcdtext.toml")));
        assert_eq!(args.frames, None);
    }

    #[test]
    fn test_errors() {
        assert_eq!(Args::parse(Vec::<String>::new()), Err(ArgsError::MissingCommand));
        assert_eq!(Args::parse(["--help"]), Err(ArgsError::Help));
        assert_eq!(
            Args::parse(["flash"]),
            Err(ArgsError::UnknownCommand("flash".into()))
        );
        assert_eq!(
            Args::parse(["demo", "--dc"]),
            Err(ArgsError::MissingValue("dc".into()))
        );
        assert_eq!(
            Args::parse(["demo", "dc", "5"]),
            Err(ArgsError::Unexpected("dc".into()))
        );
        assert!(matches!(
            Args::parse(["demo", "--frames", "many"]),
            Err(ArgsError::BadFrames(_))
        ));
    }

    #[test]
    fn test_unknown_key_fails_on_apply() {
        let args = Args::parse(["backlight", "--volume", "11"]).unwrap();
        let mut cfg = AppConfig::default();
        assert!(args.apply(&mut cfg).is_err());
    }
}
