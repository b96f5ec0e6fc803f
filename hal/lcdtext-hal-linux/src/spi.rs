//! spidev-backed SPI bus
//!
//! One `write(2)` on a spidev node is one SPI transaction with chip select
//! held for its whole length, which is what the command/data protocol of the
//! panel controllers needs. The kernel limits a single transfer to
//! `spidev.bufsiz` (4096 bytes by default), so large payloads must be split
//! by the caller.

use std::io::Write;

use lcdtext_hal::{SpiBus, SpiConfig};
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use log::debug;

use crate::error::HalError;

/// An open, configured spidev node
pub struct SpidevBus {
    dev: Spidev,
    path: String,
    config: SpiConfig,
}

impl SpidevBus {
    /// Open `path` and configure mode, clock and 8-bit words
    pub fn open(path: &str, config: SpiConfig) -> Result<Self, HalError> {
        let open_err = |source| HalError::SpiOpen {
            path: path.to_string(),
            source,
        };

        let mut dev = Spidev::open(path).map_err(open_err)?;

        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.frequency)
            .mode(mode_flags(config))
            .build();
        dev.configure(&options).map_err(open_err)?;

        debug!(
            "spidev {} open: {} Hz, mode {}",
            path,
            config.frequency,
            config.mode.number()
        );

        Ok(Self {
            dev,
            path: path.to_string(),
            config,
        })
    }

    /// Device node path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Active configuration
    pub fn config(&self) -> SpiConfig {
        self.config
    }
}

impl SpiBus for SpidevBus {
    type Error = HalError;

    fn write(&mut self, data: &[u8]) -> Result<(), HalError> {
        let written = self.dev.write(data).map_err(HalError::SpiWrite)?;
        check_written(data.len(), written)
    }
}

fn mode_flags(config: SpiConfig) -> SpiModeFlags {
    match config.mode.number() {
        0 => SpiModeFlags::SPI_MODE_0,
        1 => SpiModeFlags::SPI_MODE_1,
        2 => SpiModeFlags::SPI_MODE_2,
        _ => SpiModeFlags::SPI_MODE_3,
    }
}

/// A transfer is only successful if the kernel took every byte
fn check_written(expected: usize, written: usize) -> Result<(), HalError> {
    if written == expected {
        Ok(())
    } else {
        Err(HalError::ShortWrite { expected, written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcdtext_hal::Mode;

    #[test]
    fn test_check_written() {
        assert!(check_written(8, 8).is_ok());
        assert!(matches!(
            check_written(8, 3),
            Err(HalError::ShortWrite {
                expected: 8,
                written: 3
            })
        ));
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(
            mode_flags(SpiConfig::new(1_000_000)).bits(),
            SpiModeFlags::SPI_MODE_0.bits()
        );
        assert_eq!(
            mode_flags(SpiConfig::new(1_000_000).with_mode(Mode::Mode3)).bits(),
            SpiModeFlags::SPI_MODE_3.bits()
        );
    }

    #[test]
    fn test_open_missing_node_fails() {
        let result = SpidevBus::open("/dev/spidev-does-not-exist", SpiConfig::default());
        assert!(matches!(result, Err(HalError::SpiOpen { .. })));
    }
}
