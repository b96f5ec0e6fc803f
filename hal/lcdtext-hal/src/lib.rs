//! lcdtext Hardware Abstraction Layer
//!
//! This crate defines the bus and GPIO traits the panel drivers are written
//! against. Platform crates implement them on real hardware; tests implement
//! them with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lcdtext-drivers (ST7565, ILI9488)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lcdtext-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lcdtext-hal-linux (spidev, gpio-cdev)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`spi::SpiBus`] - Write-only SPI transfers
//!
//! Delays are not abstracted here: drivers take any
//! `embedded_hal::delay::DelayNs`.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use spi::{Mode, SpiBus, SpiConfig};
