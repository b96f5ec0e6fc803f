//! SPI bus abstractions
//!
//! Panel controllers on these boards are write-only: MISO is not wired, so
//! the bus only needs to push bytes out.

/// SPI bus master (write-only)
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write all of `data` as a single transfer
    ///
    /// Implementations must either transfer exactly `data.len()` bytes or
    /// return an error; a short transfer is never reported as success.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: SpiBus + ?Sized> SpiBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock mode
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 8_000_000, // 8 MHz
            mode: Mode::Mode0,
        }
    }
}

impl SpiConfig {
    /// Configuration at the given frequency, mode 0
    pub const fn new(frequency: u32) -> Self {
        Self {
            frequency,
            mode: Mode::Mode0,
        }
    }

    /// Builder-style mode override
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    /// Mode from its numeric form (0-3)
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(Mode::Mode0),
            1 => Some(Mode::Mode1),
            2 => Some(Mode::Mode2),
            3 => Some(Mode::Mode3),
            _ => None,
        }
    }

    /// Numeric form as used by spidev (`SPI_MODE_n`)
    pub const fn number(self) -> u8 {
        match self {
            Mode::Mode0 => 0,
            Mode::Mode1 => 1,
            Mode::Mode2 => 2,
            Mode::Mode3 => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_numbers_round_trip() {
        for n in 0..4 {
            let mode = Mode::from_number(n).unwrap();
            assert_eq!(mode.number(), n);
        }
        assert_eq!(Mode::from_number(4), None);
    }

    #[test]
    fn test_default_config() {
        let cfg = SpiConfig::default();
        assert_eq!(cfg.frequency, 8_000_000);
        assert_eq!(cfg.mode, Mode::Mode0);
        assert_eq!(SpiConfig::new(32_000_000).with_mode(Mode::Mode2).mode, Mode::Mode2);
    }
}
