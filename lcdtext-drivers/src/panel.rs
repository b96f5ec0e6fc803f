//! Common panel interface

use core::fmt;

use lcdtext_core::FramebufferError;

/// Controller session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// Nothing sent yet
    #[default]
    Uninitialized,
    /// Hardware reset pulsed
    Reset,
    /// Init sequence sent, accepting frames
    Ready,
}

/// Driver errors
///
/// `B` is the bus error and `P` the GPIO error of the wiring the driver was
/// built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverError<B, P> {
    /// SPI transfer failed
    Bus(B),
    /// Data/command or reset line failed
    Pin(P),
    /// Frame length does not match the panel
    SizeMismatch { expected: usize, actual: usize },
    /// Panel size cannot hold a page-packed frame
    Geometry { width: usize, height: usize },
}

impl<B, P> From<FramebufferError> for DriverError<B, P> {
    fn from(e: FramebufferError) -> Self {
        match e {
            FramebufferError::InvalidGeometry { width, height } => {
                DriverError::Geometry { width, height }
            }
            FramebufferError::SizeMismatch { expected, actual } => {
                DriverError::SizeMismatch { expected, actual }
            }
        }
    }
}

impl<B: fmt::Debug, P: fmt::Debug> fmt::Display for DriverError<B, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Bus(e) => write!(f, "SPI transfer failed: {e:?}"),
            DriverError::Pin(e) => write!(f, "GPIO line failed: {e:?}"),
            DriverError::SizeMismatch { expected, actual } => {
                write!(f, "framebuffer size mismatch: expected {expected} bytes, got {actual}")
            }
            DriverError::Geometry { width, height } => {
                write!(f, "invalid panel geometry {width}x{height}")
            }
        }
    }
}

impl<B: fmt::Debug, P: fmt::Debug> std::error::Error for DriverError<B, P> {}

/// A display controller that accepts page-packed 1bpp frames
pub trait PanelDriver {
    /// Error type
    type Error;

    /// Pulse the reset line
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Send the init sequence
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Show a `width * height / 8` byte page-packed frame
    fn push_frame(&mut self, fb: &[u8]) -> Result<(), Self::Error>;

    /// Blank the panel
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// `(width, height)` in pixels
    fn size(&self) -> (usize, usize);

    /// Session state
    fn state(&self) -> PanelState;
}

impl<T: PanelDriver + ?Sized> PanelDriver for Box<T> {
    type Error = T::Error;

    fn reset(&mut self) -> Result<(), Self::Error> {
        (**self).reset()
    }

    fn init(&mut self) -> Result<(), Self::Error> {
        (**self).init()
    }

    fn push_frame(&mut self, fb: &[u8]) -> Result<(), Self::Error> {
        (**self).push_frame(fb)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        (**self).clear()
    }

    fn size(&self) -> (usize, usize) {
        (**self).size()
    }

    fn state(&self) -> PanelState {
        (**self).state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_errors_convert() {
        let e: DriverError<(), ()> = FramebufferError::SizeMismatch {
            expected: 1024,
            actual: 10,
        }
        .into();
        assert_eq!(
            e,
            DriverError::SizeMismatch {
                expected: 1024,
                actual: 10
            }
        );
        assert_eq!(
            e.to_string(),
            "framebuffer size mismatch: expected 1024 bytes, got 10"
        );
    }

    #[test]
    fn test_default_state() {
        assert_eq!(PanelState::default(), PanelState::Uninitialized);
    }
}
