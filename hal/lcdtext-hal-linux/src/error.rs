//! Errors from the Linux device interfaces

use core::fmt;

use linux_embedded_hal::gpio_cdev;

/// Linux HAL errors
#[derive(Debug)]
pub enum HalError {
    /// Opening or configuring a spidev node failed
    SpiOpen {
        path: String,
        source: std::io::Error,
    },
    /// A write to the spidev node failed
    SpiWrite(std::io::Error),
    /// The kernel accepted fewer bytes than requested
    ShortWrite { expected: usize, written: usize },
    /// Opening the chip or requesting a line failed
    GpioRequest {
        chip: String,
        offset: u32,
        source: gpio_cdev::Error,
    },
    /// Reading or driving a requested line failed
    GpioAccess(gpio_cdev::Error),
    /// Attempt to drive a line requested as input
    NotOutput,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::SpiOpen { path, source } => {
                write!(f, "failed to open spidev {path}: {source}")
            }
            HalError::SpiWrite(e) => write!(f, "SPI write failed: {e}"),
            HalError::ShortWrite { expected, written } => {
                write!(f, "SPI short write: {written} of {expected} bytes")
            }
            HalError::GpioRequest {
                chip,
                offset,
                source,
            } => write!(f, "failed to request line {offset} on {chip}: {source}"),
            HalError::GpioAccess(e) => write!(f, "GPIO access failed: {e}"),
            HalError::NotOutput => write!(f, "line is not an output"),
        }
    }
}

impl std::error::Error for HalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HalError::SpiOpen { source, .. } => Some(source),
            HalError::SpiWrite(e) => Some(e),
            HalError::GpioRequest { source, .. } => Some(source),
            HalError::GpioAccess(e) => Some(e),
            HalError::ShortWrite { .. } | HalError::NotOutput => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_write_message() {
        let e = HalError::ShortWrite {
            expected: 4096,
            written: 100,
        };
        assert_eq!(e.to_string(), "SPI short write: 100 of 4096 bytes");
    }
}
