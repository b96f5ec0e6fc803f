//! Configuration types
//!
//! Everything the `lcdtext` tool needs to open a panel and draw on it.
//! Values come from defaults, an optional TOML file (with the `serde`
//! feature) and finally `--key value` overrides applied through
//! [`AppConfig::set`].

mod panel;

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use panel::*;

/// Default TrueType font
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/ubuntu/UbuntuMono-B.ttf";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Model name not recognized
    UnknownModel(String),
    /// Pixel format name not recognized
    UnknownPixelFormat(String),
    /// Override key not recognized
    UnknownKey(String),
    /// Value could not be parsed or is out of range
    InvalidValue { key: String, value: String },
    /// Panel size unusable for a page-packed frame
    Geometry { width: usize, height: usize },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: impl fmt::Display) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownModel(m) => {
                write!(f, "unknown model {m:?} (supported: st7565, ili9488, msp3520)")
            }
            ConfigError::UnknownPixelFormat(p) => {
                write!(f, "unknown pixel format {p:?} (supported: rgb565, rgb666)")
            }
            ConfigError::UnknownKey(k) => write!(f, "unknown option --{k}"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value {value:?} for --{key}")
            }
            ConfigError::Geometry { width, height } => {
                write!(f, "invalid panel size {width}x{height} (height must be a multiple of 8)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Font file and line sizes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontConfig {
    /// TrueType/OpenType file
    pub path: String,
    /// Small line size override
    pub small_px: Option<u32>,
    /// Large line size override
    pub large_px: Option<u32>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_FONT_PATH.into(),
            small_px: None,
            large_px: None,
        }
    }
}

impl FontConfig {
    /// Effective `(small, large)` pixel sizes for `model`
    pub fn sizes(&self, model: PanelModel) -> (u32, u32) {
        let (small, large) = model.default_font_sizes();
        (self.small_px.unwrap_or(small), self.large_px.unwrap_or(large))
    }
}

/// Backlight PWM and heater lines
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BacklightConfig {
    /// Backlight line offset
    pub line: u32,
    /// Duty cycle in percent
    pub duty: u8,
    /// PWM frequency in Hz
    pub freq_hz: u32,
    /// Heater line offset
    pub heater_line: Option<u32>,
    /// Drive the heater line high
    pub heater_on: bool,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            line: 18,
            duty: 40,
            freq_hz: 1000,
            heater_line: Some(23),
            heater_on: false,
        }
    }
}

/// Complete tool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AppConfig {
    pub panel: PanelConfig,
    pub font: FontConfig,
    pub backlight: BacklightConfig,
    /// Line toggled by `probe`
    pub probe_line: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            font: FontConfig::default(),
            backlight: BacklightConfig::default(),
            probe_line: 25,
        }
    }
}

impl AppConfig {
    /// Default configuration for `model`
    pub fn for_model(model: PanelModel) -> Self {
        Self {
            panel: PanelConfig::for_model(model),
            ..Self::default()
        }
    }

    /// Apply one `--key value` override
    ///
    /// Keys use the command-line spelling (`spi-hz`, `bl-duty`, ...).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let p = &mut self.panel;
        match key {
            "model" => p.model = value.parse()?,
            "spidev" => p.spi_device = value.to_string(),
            "spi-hz" => p.spi_hz = Some(number(key, value)?),
            "spi-mode" => p.spi_mode = number(key, value)?,
            "chip" => p.gpio_chip = value.to_string(),
            "dc" => p.dc_line = number(key, value)?,
            "rst" => p.rst_line = number(key, value)?,
            "width" => p.width = Some(number(key, value)?),
            "height" => p.height = Some(number(key, value)?),
            "fg" => p.fg = color(key, value)?,
            "bg" => p.bg = color(key, value)?,
            "rotation" => p.rotation = number(key, value)?,
            "pixel-format" => p.pixel_format = value.parse()?,
            "max-transfer" => p.max_transfer = number(key, value)?,
            "font" => self.font.path = value.to_string(),
            "small-px" => self.font.small_px = Some(number(key, value)?),
            "large-px" => self.font.large_px = Some(number(key, value)?),
            "bl-pin" | "bl-line" => self.backlight.line = number(key, value)?,
            "bl-duty" => {
                let duty: i64 = number(key, value)?;
                self.backlight.duty = duty.clamp(0, 100) as u8;
            }
            "bl-freq" => {
                // 0 selects the PWM fallback frequency
                let hz: i64 = number(key, value)?;
                self.backlight.freq_hz = hz.clamp(0, i64::from(u32::MAX)) as u32;
            }
            "heater-pin" | "heater-line" => self.backlight.heater_line = Some(number(key, value)?),
            "heater-on" => self.backlight.heater_on = flag(key, value)?,
            "line" => self.probe_line = number(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, value))
}

/// RGB565 color, decimal or `0x` hex
fn color(key: &str, value: &str) -> Result<u16, ConfigError> {
    let v = value.trim();
    let parsed = match v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => v.parse(),
    };
    parsed.map_err(|_| ConfigError::invalid(key, value))
}

fn flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}
