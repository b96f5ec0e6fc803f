//! Panel selection and wiring

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default spidev node
pub const DEFAULT_SPI_DEVICE: &str = "/dev/spidev1.0";

/// Default GPIO character device
pub const DEFAULT_GPIO_CHIP: &str = "/dev/gpiochip0";

/// Default data/command line offset
pub const DEFAULT_DC_LINE: u32 = 271;

/// Default reset line offset
pub const DEFAULT_RST_LINE: u32 = 256;

/// Largest single bus transfer for frame data (spidev `bufsiz` default)
pub const DEFAULT_MAX_TRANSFER: usize = 4096;

/// Supported controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PanelModel {
    /// 128x64 monochrome page-mode controller
    #[default]
    St7565,
    /// 480x320 RGB controller (MSP3520 modules)
    #[cfg_attr(feature = "serde", serde(alias = "msp3520"))]
    Ili9488,
}

impl PanelModel {
    /// Canonical lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            PanelModel::St7565 => "st7565",
            PanelModel::Ili9488 => "ili9488",
        }
    }

    /// Native resolution as `(width, height)`
    pub const fn default_size(self) -> (usize, usize) {
        match self {
            PanelModel::St7565 => (128, 64),
            PanelModel::Ili9488 => (480, 320),
        }
    }

    /// SPI clock the controller is known to run at
    pub const fn default_spi_hz(self) -> u32 {
        match self {
            PanelModel::St7565 => 8_000_000,
            PanelModel::Ili9488 => 32_000_000,
        }
    }

    /// Small and large font pixel sizes that fill the panel
    pub const fn default_font_sizes(self) -> (u32, u32) {
        match self {
            PanelModel::St7565 => (12, 28),
            PanelModel::Ili9488 => (32, 76),
        }
    }

    /// Whether frames must be converted to RGB before pushing
    pub const fn is_color(self) -> bool {
        matches!(self, PanelModel::Ili9488)
    }
}

impl fmt::Display for PanelModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanelModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "st7565" => Ok(PanelModel::St7565),
            "ili9488" | "msp3520" => Ok(PanelModel::Ili9488),
            _ => Err(ConfigError::UnknownModel(s.to_string())),
        }
    }
}

/// RGB wire format of the color controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PixelFormat {
    /// 16 bits per pixel, 2 bytes big-endian
    #[default]
    Rgb565,
    /// 18 bits per pixel in 3 bytes, low 2 bits of each unused
    Rgb666,
}

impl PixelFormat {
    /// Bytes sent per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb666 => 3,
        }
    }

    /// Payload of the interface pixel format command (0x3A)
    pub const fn colmod(self) -> u8 {
        match self {
            PixelFormat::Rgb565 => 0x55,
            PixelFormat::Rgb666 => 0x66,
        }
    }
}

impl FromStr for PixelFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb565" | "565" => Ok(PixelFormat::Rgb565),
            "rgb666" | "666" => Ok(PixelFormat::Rgb666),
            _ => Err(ConfigError::UnknownPixelFormat(s.to_string())),
        }
    }
}

/// Panel wiring and controller options
///
/// Size and SPI clock left unset fall back to the model's defaults, so a
/// config file only has to name the model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// Controller
    pub model: PanelModel,
    /// Width override
    pub width: Option<usize>,
    /// Height override
    pub height: Option<usize>,
    /// spidev node
    pub spi_device: String,
    /// SPI clock override
    pub spi_hz: Option<u32>,
    /// SPI mode number (0-3)
    pub spi_mode: u8,
    /// GPIO character device
    pub gpio_chip: String,
    /// Data/command line offset
    pub dc_line: u32,
    /// Reset line offset
    pub rst_line: u32,
    /// Foreground color (RGB565) for color panels
    pub fg: u16,
    /// Background color (RGB565) for color panels
    pub bg: u16,
    /// Rotation, quarter turns (only the low 2 bits are used)
    pub rotation: u8,
    /// Color wire format
    pub pixel_format: PixelFormat,
    /// Largest frame data transfer in bytes
    pub max_transfer: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::for_model(PanelModel::default())
    }
}

impl PanelConfig {
    /// Defaults for `model`
    pub fn for_model(model: PanelModel) -> Self {
        Self {
            model,
            width: None,
            height: None,
            spi_device: DEFAULT_SPI_DEVICE.into(),
            spi_hz: None,
            spi_mode: 0,
            gpio_chip: DEFAULT_GPIO_CHIP.into(),
            dc_line: DEFAULT_DC_LINE,
            rst_line: DEFAULT_RST_LINE,
            fg: 0xFFFF,
            bg: 0x0000,
            rotation: 1,
            pixel_format: PixelFormat::Rgb565,
            max_transfer: DEFAULT_MAX_TRANSFER,
        }
    }

    /// Effective `(width, height)`
    pub fn size(&self) -> (usize, usize) {
        let (w, h) = self.model.default_size();
        (self.width.unwrap_or(w), self.height.unwrap_or(h))
    }

    /// Effective SPI clock
    pub fn spi_hz(&self) -> u32 {
        self.spi_hz.unwrap_or_else(|| self.model.default_spi_hz())
    }

    /// Reject values no panel can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.size();
        if width == 0 || height == 0 || height % 8 != 0 {
            return Err(ConfigError::Geometry { width, height });
        }
        if self.spi_mode > 3 {
            return Err(ConfigError::invalid("spi-mode", self.spi_mode));
        }
        if self.spi_hz() == 0 {
            return Err(ConfigError::invalid("spi-hz", 0));
        }
        if self.max_transfer == 0 {
            return Err(ConfigError::invalid("max-transfer", 0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names() {
        assert_eq!("st7565".parse::<PanelModel>().unwrap(), PanelModel::St7565);
        assert_eq!("ILI9488".parse::<PanelModel>().unwrap(), PanelModel::Ili9488);
        assert_eq!("msp3520".parse::<PanelModel>().unwrap(), PanelModel::Ili9488);
        assert_eq!(
            "ssd1306".parse::<PanelModel>(),
            Err(ConfigError::UnknownModel("ssd1306".into()))
        );
        assert_eq!(PanelModel::Ili9488.to_string(), "ili9488");
    }

    #[test]
    fn test_model_defaults() {
        let mono = PanelConfig::for_model(PanelModel::St7565);
        assert_eq!(mono.size(), (128, 64));
        assert_eq!(mono.spi_hz(), 8_000_000);

        let color = PanelConfig::for_model(PanelModel::Ili9488);
        assert_eq!(color.size(), (480, 320));
        assert_eq!(color.spi_hz(), 32_000_000);
        assert_eq!((color.dc_line, color.rst_line), (271, 256));
    }

    #[test]
    fn test_changing_model_moves_defaults() {
        let mut cfg = PanelConfig::default();
        cfg.model = PanelModel::Ili9488;
        assert_eq!(cfg.size(), (480, 320));

        cfg.height = Some(160);
        assert_eq!(cfg.size(), (480, 160));
    }

    #[test]
    fn test_pixel_format() {
        assert_eq!("rgb666".parse::<PixelFormat>().unwrap(), PixelFormat::Rgb666);
        assert_eq!("565".parse::<PixelFormat>().unwrap(), PixelFormat::Rgb565);
        assert!("rgb888".parse::<PixelFormat>().is_err());
        assert_eq!(PixelFormat::Rgb565.colmod(), 0x55);
        assert_eq!(PixelFormat::Rgb666.colmod(), 0x66);
        assert_eq!(PixelFormat::Rgb666.bytes_per_pixel(), 3);
    }

    #[test]
    fn test_validate() {
        assert!(PanelConfig::default().validate().is_ok());

        let mut cfg = PanelConfig::default();
        cfg.height = Some(60);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Geometry {
                width: 128,
                height: 60
            })
        );

        let mut cfg = PanelConfig::default();
        cfg.spi_mode = 4;
        assert!(cfg.validate().is_err());

        let mut cfg = PanelConfig::default();
        cfg.max_transfer = 0;
        assert!(cfg.validate().is_err());
    }
}
