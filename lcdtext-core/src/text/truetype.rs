//! TrueType / OpenType faces
//!
//! Outlines are rasterized with `fontdue` into 8-bit coverage and then
//! thresholded at 50% to get a monochrome bitmap. Hinting is not applied, so
//! a monospace font designed for small sizes (DejaVu Sans Mono, Ubuntu Mono)
//! gives the most legible result.

use std::path::Path;

use fontdue::{Font, FontSettings};
use log::debug;

use super::{FontError, FontFace, Glyph};

/// Coverage at or above which a pixel is considered set
pub const MONO_THRESHOLD: u8 = 128;

/// A font file parsed into memory
pub struct TrueTypeFace {
    font: Font,
}

impl TrueTypeFace {
    /// Parse a face from font file bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        Font::from_bytes(bytes, FontSettings::default()).map(|font| Self { font })
    }
}

impl FontFace for TrueTypeFace {
    fn load(path: &Path) -> Result<Self, FontError> {
        let load_err = |reason: String| FontError::Load {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| load_err(e.to_string()))?;
        let face = Self::from_bytes(&bytes).map_err(|e| load_err(e.to_string()))?;

        debug!("loaded font {}", path.display());
        Ok(face)
    }

    fn ascender(&self, px: u32) -> i32 {
        self.font
            .horizontal_line_metrics(px as f32)
            .map_or(px as i32, |m| m.ascent.ceil() as i32)
    }

    fn glyph(&self, ch: char, px: u32) -> Option<Glyph> {
        if self.font.lookup_glyph_index(ch) == 0 {
            return None;
        }

        let (metrics, coverage) = self.font.rasterize(ch, px as f32);
        Some(Glyph::from_coverage(
            metrics.width,
            metrics.height,
            &coverage,
            MONO_THRESHOLD,
            metrics.xmin,
            metrics.ymin + metrics.height as i32,
            metrics.advance_width.round() as i32,
        ))
    }
}
