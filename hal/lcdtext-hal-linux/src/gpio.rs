//! GPIO lines through the character device
//!
//! A requested line stays exclusively owned by this process until the
//! [`GpioLine`] is dropped, at which point the kernel releases it.

use lcdtext_hal::{InputPin, OutputPin};
use linux_embedded_hal::gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use log::debug;

use crate::error::HalError;

/// Direction a line was requested with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A single requested GPIO line
pub struct GpioLine {
    handle: LineHandle,
    offset: u32,
    direction: Direction,
}

impl GpioLine {
    /// Request `offset` on `chip` as an output driven to `initial`
    pub fn output(chip: &str, offset: u32, initial: bool, consumer: &str) -> Result<Self, HalError> {
        Self::request(
            chip,
            offset,
            LineRequestFlags::OUTPUT,
            initial as u8,
            consumer,
            Direction::Output,
        )
    }

    /// Request `offset` on `chip` as an input
    pub fn input(chip: &str, offset: u32, consumer: &str) -> Result<Self, HalError> {
        Self::request(
            chip,
            offset,
            LineRequestFlags::INPUT,
            0,
            consumer,
            Direction::Input,
        )
    }

    fn request(
        chip_path: &str,
        offset: u32,
        flags: LineRequestFlags,
        default: u8,
        consumer: &str,
        direction: Direction,
    ) -> Result<Self, HalError> {
        let request_err = |source| HalError::GpioRequest {
            chip: chip_path.to_string(),
            offset,
            source,
        };

        // The chip handle is only needed for the request; the line handle
        // carries its own descriptor.
        let mut chip = Chip::new(chip_path).map_err(request_err)?;
        let handle = chip
            .get_line(offset)
            .and_then(|line| line.request(flags, default, consumer))
            .map_err(request_err)?;

        debug!(
            "{}: line {} requested as {:?} ({})",
            chip_path, offset, direction, consumer
        );

        Ok(Self {
            handle,
            offset,
            direction,
        })
    }

    /// Line offset on its chip
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Direction the line was requested with
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl OutputPin for GpioLine {
    type Error = HalError;

    fn set(&mut self, high: bool) -> Result<(), HalError> {
        if self.direction != Direction::Output {
            return Err(HalError::NotOutput);
        }
        self.handle
            .set_value(high as u8)
            .map_err(HalError::GpioAccess)
    }
}

impl InputPin for GpioLine {
    type Error = HalError;

    fn get(&self) -> Result<bool, HalError> {
        self.handle
            .get_value()
            .map(|v| v != 0)
            .map_err(HalError::GpioAccess)
    }
}
