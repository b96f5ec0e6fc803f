//! Board-agnostic core of the lcdtext status display
//!
//! This crate contains everything between a text string and a page-packed
//! 1bpp frame, without touching hardware:
//!
//! - [`framebuffer`] - 1bpp page-packed buffer with clipped drawing primitives
//! - [`text`] - UTF-8 glyph compositing driven by a [`text::FontFace`]
//! - [`layout`] - four-line status layout (one large line, three small)
//! - [`config`] - panel and font configuration types
//!
//! # Frame format
//!
//! Every frame produced here is `width * (height / 8)` bytes. Pixel `(x, y)`
//! is bit `y % 8` (LSB first) of byte `(y / 8) * width + x`. This is the
//! native layout of ST7565-class controllers; color controllers convert it
//! (see `lcdtext-drivers`).

#![deny(unsafe_code)]

pub mod config;
pub mod framebuffer;
pub mod layout;
pub mod text;

pub use framebuffer::{Framebuffer, FramebufferError};
pub use layout::{LineDisplay, LineRole, LINE_COUNT};
pub use text::{FontError, FontFace, Glyph, TextRenderer};

#[cfg(feature = "truetype")]
pub use text::truetype::TrueTypeFace;
