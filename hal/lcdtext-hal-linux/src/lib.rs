//! Linux HAL for lcdtext
//!
//! Implements the shared `lcdtext-hal` traits on top of the kernel's
//! userspace interfaces:
//!
//! - SPI through `/dev/spidevB.C` ([`SpidevBus`])
//! - GPIO through the character device `/dev/gpiochipN` ([`GpioLine`])
//! - A software PWM thread for backlight dimming ([`SoftPwm`])
//!
//! Every handle owns its file descriptor and releases it on drop.
//! [`Delay`] is `linux-embedded-hal`'s sleeping delay.

pub mod error;
pub mod gpio;
pub mod pwm;
pub mod spi;

pub use error::HalError;
pub use gpio::GpioLine;
pub use pwm::SoftPwm;
pub use spi::SpidevBus;

// Re-export shared traits from lcdtext-hal for convenience
pub use lcdtext_hal::{InputPin, Mode, OutputPin, SpiBus, SpiConfig};
pub use linux_embedded_hal::Delay;
