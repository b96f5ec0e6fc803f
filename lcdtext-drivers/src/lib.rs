//! Panel drivers
//!
//! Controller drivers that push page-packed 1bpp frames from
//! `lcdtext-core` to real glass:
//!
//! - [`St7565`] - 128x64 monochrome, frames are sent verbatim page by page
//! - [`Ili9488`] - 480x320 RGB, frames are expanded to RGB565/RGB666
//!
//! Both speak 4-wire SPI (bus + data/command line + reset line) through
//! [`interface::SpiInterface`] and implement [`PanelDriver`], so the caller
//! can pick one from configuration and treat them alike.

#![deny(unsafe_code)]

pub mod convert;
pub mod ili9488;
pub mod interface;
pub mod panel;
pub mod st7565;

#[cfg(test)]
pub(crate) mod mock;

pub use convert::{mono_to_native, mono_to_rgb565, mono_to_rgb666, rgb565_to_666};
pub use ili9488::Ili9488;
pub use lcdtext_core::config::PixelFormat;
pub use panel::{DriverError, PanelDriver, PanelState};
pub use st7565::St7565;
