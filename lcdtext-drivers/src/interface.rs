//! 4-wire SPI command/data interface
//!
//! The data/command (D/C) line selects how the controller interprets the
//! bytes on the bus: low for a command opcode, high for its parameters or
//! pixel data. Every command byte and every payload is one bus transfer.

use lcdtext_hal::{OutputPin, SpiBus};

use crate::panel::DriverError;

/// SPI bus plus data/command line
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

/// Error type of an interface over `SPI` and pin `P`
pub type InterfaceError<SPI, P> = DriverError<<SPI as SpiBus>::Error, <P as OutputPin>::Error>;

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiBus,
    DC: OutputPin,
{
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Send one command byte
    pub fn command(&mut self, cmd: u8) -> Result<(), InterfaceError<SPI, DC>> {
        self.dc.set_low().map_err(DriverError::Pin)?;
        self.spi.write(&[cmd]).map_err(DriverError::Bus)
    }

    /// Send a parameter / pixel payload
    ///
    /// An empty payload sends nothing.
    pub fn data(&mut self, data: &[u8]) -> Result<(), InterfaceError<SPI, DC>> {
        if data.is_empty() {
            return Ok(());
        }
        self.dc.set_high().map_err(DriverError::Pin)?;
        self.spi.write(data).map_err(DriverError::Bus)
    }

    /// Send a command followed by its parameters
    pub fn command_with(&mut self, cmd: u8, params: &[u8]) -> Result<(), InterfaceError<SPI, DC>> {
        self.command(cmd)?;
        self.data(params)
    }
}
