//! ST7565 LCD driver
//!
//! Driver for 128x64 ST7565-based monochrome LCDs (Newhaven NHD-C12864 and
//! similar) over 4-wire SPI. The controller's display RAM is page-packed,
//! so frames from `lcdtext-core` are sent without conversion.

use embedded_hal::delay::DelayNs;
use lcdtext_core::framebuffer;
use lcdtext_hal::{OutputPin, SpiBus};
use log::debug;

use crate::interface::{InterfaceError, SpiInterface};
use crate::panel::{DriverError, PanelDriver, PanelState};

/// ST7565 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_COLUMN_HIGH: u8 = 0x10;
    pub const SET_COLUMN_LOW: u8 = 0x00;
    pub const ADC_NORMAL: u8 = 0xA0;
    pub const ADC_REVERSE: u8 = 0xA1;
    pub const DISPLAY_NORMAL: u8 = 0xA6;
    pub const DISPLAY_REVERSE: u8 = 0xA7;
    pub const BIAS_1_9: u8 = 0xA2;
    pub const BIAS_1_7: u8 = 0xA3;
    pub const COM_NORMAL: u8 = 0xC0;
    pub const COM_REVERSE: u8 = 0xC8;
    pub const POWER_CONTROL: u8 = 0x28;
    pub const REGULATOR_RATIO: u8 = 0x20;
    pub const SET_VOLUME: u8 = 0x81;
}

/// Reset pulse low time
const RESET_LOW_MS: u32 = 50;

/// Settle time after releasing reset
const RESET_SETTLE_MS: u32 = 50;

/// Power-on contrast (electronic volume)
const DEFAULT_CONTRAST: u8 = 0x16;

/// ST7565 driver
pub struct St7565<SPI, DC, RST, D> {
    iface: SpiInterface<SPI, DC>,
    rst: RST,
    delay: D,
    width: usize,
    height: usize,
    state: PanelState,
}

impl<SPI, DC, RST, D> St7565<SPI, DC, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    D: DelayNs,
{
    /// Create a 128x64 driver
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D) -> Self {
        Self::with_size(spi, dc, rst, delay, 128, 64)
    }

    /// Create a driver for a non-standard glass size
    pub fn with_size(spi: SPI, dc: DC, rst: RST, delay: D, width: usize, height: usize) -> Self {
        Self {
            iface: SpiInterface::new(spi, dc),
            rst,
            delay,
            width,
            height,
            state: PanelState::Uninitialized,
        }
    }

    /// Pulse the reset line: low 50 ms, high, then wait 50 ms
    pub fn reset(&mut self) -> Result<(), InterfaceError<SPI, DC>> {
        debug!("st7565: reset");
        self.rst.set_low().map_err(DriverError::Pin)?;
        self.delay.delay_ms(RESET_LOW_MS);
        self.rst.set_high().map_err(DriverError::Pin)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.state = PanelState::Reset;
        Ok(())
    }

    /// Send the init sequence and turn the display on
    pub fn init(&mut self) -> Result<(), InterfaceError<SPI, DC>> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::BIAS_1_9,
            cmd::ADC_NORMAL,
            cmd::COM_REVERSE,
            cmd::POWER_CONTROL | 0x07, // Booster, regulator, follower on
            cmd::REGULATOR_RATIO | 0x06,
            cmd::SET_VOLUME,
            DEFAULT_CONTRAST,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.iface.command(c)?;
        }

        self.state = PanelState::Ready;
        debug!("st7565: ready ({}x{})", self.width, self.height);
        Ok(())
    }

    /// Write a full page-packed frame
    ///
    /// `fb` must be exactly `width * height / 8` bytes.
    pub fn set_framebuffer(&mut self, fb: &[u8]) -> Result<(), InterfaceError<SPI, DC>> {
        framebuffer::check_frame(fb, self.width, self.height)?;

        for (page, bytes) in fb.chunks(self.width).enumerate() {
            self.iface.command(cmd::SET_PAGE_ADDR | (page as u8 & 0x0F))?;
            self.iface.command(cmd::SET_COLUMN_HIGH)?;
            self.iface.command(cmd::SET_COLUMN_LOW)?;
            self.iface.data(bytes)?;
        }
        Ok(())
    }

    /// Blank the display RAM
    pub fn clear(&mut self) -> Result<(), InterfaceError<SPI, DC>> {
        let blank = vec![0u8; self.width * (self.height / 8)];
        self.set_framebuffer(&blank)
    }

    /// Set the electronic volume (contrast), 6 bits
    pub fn set_contrast(&mut self, value: u8) -> Result<(), InterfaceError<SPI, DC>> {
        self.iface.command(cmd::SET_VOLUME)?;
        self.iface.command(value & 0x3F)
    }

    /// Turn the display on/off without touching its RAM
    pub fn display_on(&mut self, on: bool) -> Result<(), InterfaceError<SPI, DC>> {
        self.iface
            .command(if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF })
    }

    /// Session state
    pub fn state(&self) -> PanelState {
        self.state
    }
}

impl<SPI, DC, RST, D> PanelDriver for St7565<SPI, DC, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    D: DelayNs,
{
    type Error = InterfaceError<SPI, DC>;

    fn reset(&mut self) -> Result<(), Self::Error> {
        St7565::reset(self)
    }

    fn init(&mut self) -> Result<(), Self::Error> {
        St7565::init(self)
    }

    fn push_frame(&mut self, fb: &[u8]) -> Result<(), Self::Error> {
        self.set_framebuffer(fb)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        St7565::clear(self)
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn state(&self) -> PanelState {
        self.state
    }
}
