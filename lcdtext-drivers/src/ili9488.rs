//! ILI9488 TFT driver
//!
//! Driver for 480x320 ILI9488 RGB panels (MSP3520 modules) in 4-wire SPI
//! write-only mode. The controller has no 1bpp mode, so every page-packed
//! frame is expanded to RGB565 or RGB666 and streamed into a full-screen
//! address window.
//!
//! Over SPI the ILI9488 officially supports only 18-bit color. Many modules
//! accept RGB565 anyway, which halves the transfer; if colors come out
//! garbled use [`PixelFormat::Rgb666`].

use embedded_hal::delay::DelayNs;
use lcdtext_core::config::{PixelFormat, DEFAULT_MAX_TRANSFER};
use lcdtext_hal::{OutputPin, SpiBus};
use log::debug;

use crate::convert;
use crate::interface::{InterfaceError, SpiInterface};
use crate::panel::{DriverError, PanelDriver, PanelState};

/// ILI9488 commands
#[allow(dead_code)]
mod cmd {
    pub const SOFT_RESET: u8 = 0x01;
    pub const SLEEP_OUT: u8 = 0x11;
    pub const INVERSION_OFF: u8 = 0x20;
    pub const INVERSION_ON: u8 = 0x21;
    pub const DISPLAY_OFF: u8 = 0x28;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const COLUMN_ADDR: u8 = 0x2A;
    pub const PAGE_ADDR: u8 = 0x2B;
    pub const MEMORY_WRITE: u8 = 0x2C;
    pub const MEMORY_ACCESS: u8 = 0x36;
    pub const PIXEL_FORMAT: u8 = 0x3A;
}

/// MADCTL per quarter turn, BGR order; 1 is landscape
const MADCTL: [u8; 4] = [0x48, 0x28, 0x88, 0xE8];

/// Reset pulse low time
const RESET_LOW_MS: u32 = 20;

/// Wait after reset, software reset and sleep out
const SETTLE_MS: u32 = 120;

/// ILI9488 driver
pub struct Ili9488<SPI, DC, RST, D> {
    iface: SpiInterface<SPI, DC>,
    rst: RST,
    delay: D,
    width: usize,
    height: usize,
    rotation: u8,
    format: PixelFormat,
    fg: u16,
    bg: u16,
    max_transfer: usize,
    state: PanelState,
}

impl<SPI, DC, RST, D> Ili9488<SPI, DC, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    D: DelayNs,
{
    /// Create a driver: landscape, RGB565, white on black
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D, width: usize, height: usize) -> Self {
        Self {
            iface: SpiInterface::new(spi, dc),
            rst,
            delay,
            width,
            height,
            rotation: 1,
            format: PixelFormat::Rgb565,
            fg: 0xFFFF,
            bg: 0x0000,
            max_transfer: DEFAULT_MAX_TRANSFER,
            state: PanelState::Uninitialized,
        }
    }

    /// Wire pixel format, applied by [`init`](Self::init)
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Rotation in quarter turns, applied by [`init`](Self::init)
    pub fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = rotation & 0x03;
        self
    }

    /// Colors used by [`PanelDriver::push_frame`] and [`PanelDriver::clear`]
    pub fn with_colors(mut self, fg: u16, bg: u16) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// Largest single data transfer in bytes (at least 1)
    pub fn with_max_transfer(mut self, bytes: usize) -> Self {
        self.max_transfer = bytes.max(1);
        self
    }

    /// Pulse the reset line: low 20 ms, high, then wait 120 ms
    pub fn reset(&mut self) -> Result<(), InterfaceError<SPI, DC>> {
        debug!("ili9488: reset");
        self.rst.set_low().map_err(DriverError::Pin)?;
        self.delay.delay_ms(RESET_LOW_MS);
        self.rst.set_high().map_err(DriverError::Pin)?;
        self.delay.delay_ms(SETTLE_MS);
        self.state = PanelState::Reset;
        Ok(())
    }

    /// Bring the controller up and turn the display on
    pub fn init(&mut self) -> Result<(), InterfaceError<SPI, DC>> {
        self.iface.command(cmd::SOFT_RESET)?;
        self.delay.delay_ms(SETTLE_MS);

        self.iface.command(cmd::SLEEP_OUT)?;
        self.delay.delay_ms(SETTLE_MS);

        let (colmod, madctl) = (self.format.colmod(), self.madctl());
        self.iface.command_with(cmd::PIXEL_FORMAT, &[colmod])?;
        self.iface.command_with(cmd::MEMORY_ACCESS, &[madctl])?;
        self.iface.command(cmd::INVERSION_ON)?;
        self.iface.command(cmd::DISPLAY_ON)?;

        self.state = PanelState::Ready;
        debug!(
            "ili9488: ready ({}x{}, {:?}, rotation {})",
            self.width, self.height, self.format, self.rotation
        );
        Ok(())
    }

    /// Set and send the rotation (low 2 bits of `value`)
    pub fn set_rotation(&mut self, value: u8) -> Result<(), InterfaceError<SPI, DC>> {
        self.rotation = value & 0x03;
        let madctl = self.madctl();
        self.iface.command_with(cmd::MEMORY_ACCESS, &[madctl])
    }

    /// Restrict memory writes to the inclusive window and start a write
    pub fn set_addr_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), InterfaceError<SPI, DC>> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();

        self.iface
            .command_with(cmd::COLUMN_ADDR, &[x0h, x0l, x1h, x1l])?;
        self.iface
            .command_with(cmd::PAGE_ADDR, &[y0h, y0l, y1h, y1l])?;
        self.iface.command(cmd::MEMORY_WRITE)
    }

    /// Paint the whole panel one color (RGB565)
    pub fn fill(&mut self, color: u16) -> Result<(), InterfaceError<SPI, DC>> {
        let mut row = Vec::with_capacity(self.width * self.format.bytes_per_pixel());
        for _ in 0..self.width {
            convert::encode(color, self.format, &mut row);
        }

        self.full_window()?;
        for _ in 0..self.height {
            self.stream(&row)?;
        }
        Ok(())
    }

    /// Show a page-packed frame with `fg` for set pixels and `bg` for the rest
    ///
    /// Nothing is sent if the frame does not match the panel.
    pub fn set_mono_framebuffer(
        &mut self,
        fb: &[u8],
        fg: u16,
        bg: u16,
    ) -> Result<(), InterfaceError<SPI, DC>> {
        let pixels = convert::mono_to_native(fb, self.width, self.height, fg, bg, self.format)?;

        self.full_window()?;
        self.stream(&pixels)
    }

    /// Active MADCTL payload
    pub fn madctl(&self) -> u8 {
        MADCTL[usize::from(self.rotation & 0x03)]
    }

    /// Active pixel format
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Active rotation in quarter turns
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Session state
    pub fn state(&self) -> PanelState {
        self.state
    }

    fn full_window(&mut self) -> Result<(), InterfaceError<SPI, DC>> {
        let x1 = self.width.saturating_sub(1).min(u16::MAX as usize) as u16;
        let y1 = self.height.saturating_sub(1).min(u16::MAX as usize) as u16;
        self.set_addr_window(0, 0, x1, y1)
    }

    /// Send pixel data in transfers of at most `max_transfer` bytes
    fn stream(&mut self, bytes: &[u8]) -> Result<(), InterfaceError<SPI, DC>> {
        for chunk in bytes.chunks(self.max_transfer) {
            self.iface.data(chunk)?;
        }
        Ok(())
    }
}

impl<SPI, DC, RST, D> PanelDriver for Ili9488<SPI, DC, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    D: DelayNs,
{
    type Error = InterfaceError<SPI, DC>;

    fn reset(&mut self) -> Result<(), Self::Error> {
        Ili9488::reset(self)
    }

    fn init(&mut self) -> Result<(), Self::Error> {
        Ili9488::init(self)
    }

    fn push_frame(&mut self, fb: &[u8]) -> Result<(), Self::Error> {
        let (fg, bg) = (self.fg, self.bg);
        self.set_mono_framebuffer(fb, fg, bg)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.fill(self.bg)
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn state(&self) -> PanelState {
        self.state
    }
}
