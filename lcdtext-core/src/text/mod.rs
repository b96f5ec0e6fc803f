//! UTF-8 text compositing into page-packed frames
//!
//! A [`TextRenderer`] holds one loaded [`FontFace`] at one pixel size and
//! blits glyphs into a borrowed frame. Placement is by per-glyph advance
//! only; there is no kerning or shaping.

mod glyph;
#[cfg(feature = "truetype")]
pub mod truetype;
pub mod utf8;

use core::fmt;
use std::path::{Path, PathBuf};

use crate::framebuffer::{self, FramebufferError};

pub use glyph::Glyph;

/// Pixel size a renderer starts with
pub const DEFAULT_PIXEL_SIZE: u32 = 16;

/// Font loading and drawing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    /// Font file missing, unreadable or not a font
    Load { path: PathBuf, reason: String },
    /// Drawing was attempted before a font was loaded
    NotLoaded,
    /// Target frame does not match its stated geometry
    Geometry(FramebufferError),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Load { path, reason } => {
                write!(f, "failed to load font {}: {}", path.display(), reason)
            }
            FontError::NotLoaded => write!(f, "font not loaded"),
            FontError::Geometry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FontError {}

impl From<FramebufferError> for FontError {
    fn from(e: FramebufferError) -> Self {
        FontError::Geometry(e)
    }
}

/// A loaded font that can produce monochrome glyphs
pub trait FontFace: Sized {
    /// Load a face from a font file
    fn load(path: &Path) -> Result<Self, FontError>;

    /// Ascender in whole pixels at `px`
    fn ascender(&self, px: u32) -> i32;

    /// Rasterize `ch` at `px`, or `None` if the face has no glyph for it
    fn glyph(&self, ch: char, px: u32) -> Option<Glyph>;
}

/// Draws UTF-8 strings with one face at one pixel size
pub struct TextRenderer<F> {
    face: Option<F>,
    px: u32,
}

impl<F: FontFace> Default for TextRenderer<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FontFace> TextRenderer<F> {
    /// Renderer with no font loaded
    pub fn new() -> Self {
        Self {
            face: None,
            px: DEFAULT_PIXEL_SIZE,
        }
    }

    /// Load a font file, replacing any previously loaded face
    ///
    /// On failure the previous face is dropped as well.
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> Result<(), FontError> {
        self.face = None;
        self.face = Some(F::load(path.as_ref())?);
        Ok(())
    }

    /// Set the pixel size (line height) used for subsequent drawing
    pub fn set_pixel_size(&mut self, px: u32) {
        self.px = px;
    }

    /// Current pixel size
    pub fn pixel_size(&self) -> u32 {
        self.px
    }

    /// Whether a face is loaded
    pub fn is_loaded(&self) -> bool {
        self.face.is_some()
    }

    /// Composite `text` into a page-packed frame
    ///
    /// The pen starts at `(x, y)`, the top of the first line. `\n` returns
    /// the pen to `x` and moves it down one pixel size. Each glyph is placed
    /// at `pen_x + bearing_x`, `pen_y + ascender - bearing_y`; its set pixels
    /// are turned on (`on == true`) or off (`on == false`), and its unset
    /// pixels leave the frame alone. Codepoints the face cannot render are
    /// skipped. Drawing stops once the pen reaches `width`.
    pub fn draw_utf8<T>(
        &self,
        fb: &mut [u8],
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        text: &T,
        on: bool,
    ) -> Result<(), FontError>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        let face = self.face.as_ref().ok_or(FontError::NotLoaded)?;
        framebuffer::check_frame(fb, width, height)?;

        let line_step = self.px as i32;
        let ascender = face.ascender(self.px);

        let mut pen_x = x;
        let mut pen_y = y;

        for ch in utf8::codepoints(text.as_ref()) {
            if ch == '\n' {
                pen_x = x;
                pen_y = pen_y.saturating_add(line_step);
                continue;
            }

            let Some(glyph) = face.glyph(ch, self.px) else {
                continue;
            };

            // Saturated coordinates land off the frame and are clipped
            let gx = pen_x.saturating_add(glyph.bearing_x);
            let gy = pen_y
                .saturating_add(ascender)
                .saturating_sub(glyph.bearing_y);
            for (col, row) in glyph.set_pixels() {
                framebuffer::set_pixel_in(
                    fb,
                    width,
                    height,
                    gx.saturating_add(col as i32),
                    gy.saturating_add(row as i32),
                    on,
                );
            }

            pen_x = pen_x.saturating_add(glyph.advance);
            if pen_x >= width as i32 {
                break;
            }
        }

        Ok(())
    }
}

/// Deterministic face for tests: solid blocks sized from the pixel size
#[cfg(test)]
pub(crate) mod test_face {
    use super::*;

    /// Codepoint the block face has no glyph for
    pub const MISSING: char = '\u{F8FF}';

    pub struct BlockFace;

    impl BlockFace {
        /// Advance at `px`: 60% of the pixel size, at least 1
        pub fn advance(px: u32) -> i32 {
            ((px * 6 / 10) as i32).max(1)
        }

        /// Block height at `px`
        pub fn rows(px: u32) -> usize {
            (px * 3 / 4) as usize
        }
    }

    impl FontFace for BlockFace {
        fn load(path: &Path) -> Result<Self, FontError> {
            if path.to_string_lossy().contains("missing") {
                return Err(FontError::Load {
                    path: path.to_path_buf(),
                    reason: "no such file".into(),
                });
            }
            Ok(BlockFace)
        }

        fn ascender(&self, px: u32) -> i32 {
            Self::rows(px) as i32
        }

        fn glyph(&self, ch: char, px: u32) -> Option<Glyph> {
            if ch == MISSING {
                return None;
            }
            let advance = Self::advance(px);
            let rows = Self::rows(px);
            let width = (advance - 1).max(1) as usize;
            let solid = ch != ' ';
            Some(Glyph::from_fn(width, rows, 0, rows as i32, advance, |_, _| {
                solid
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_face::{BlockFace, MISSING};
    use super::*;
    use proptest::prelude::*;

    const W: usize = 32;
    const H: usize = 16;

    /// At 8 px a block is 3 wide, 6 tall, advance 4, top at pen_y
    fn renderer() -> TextRenderer<BlockFace> {
        let mut r = TextRenderer::new();
        r.load_font("/fonts/block.ttf").unwrap();
        r.set_pixel_size(8);
        r
    }

    fn blank() -> Vec<u8> {
        vec![0u8; W * H / 8]
    }

    #[test]
    fn test_draw_without_font_fails() {
        let r: TextRenderer<BlockFace> = TextRenderer::new();
        let mut fb = blank();
        assert_eq!(
            r.draw_utf8(&mut fb, W, H, 0, 0, "Test", true),
            Err(FontError::NotLoaded)
        );
        assert!(fb.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_failed_load_leaves_renderer_unloaded() {
        let mut r = renderer();
        assert!(r.load_font("/fonts/missing.ttf").is_err());
        assert!(!r.is_loaded());
    }

    #[test]
    fn test_glyph_placement_and_advance() {
        let r = renderer();
        let mut fb = blank();
        r.draw_utf8(&mut fb, W, H, 0, 0, "AB", true).unwrap();
        assert_eq!(&fb[0..8], &[0x3F, 0x3F, 0x3F, 0x00, 0x3F, 0x3F, 0x3F, 0x00]);
    }

    #[test]
    fn test_newline_moves_down_one_pixel_size() {
        let r = renderer();
        let mut fb = blank();
        r.draw_utf8(&mut fb, W, H, 0, 0, "A\nA", true).unwrap();
        assert_eq!(&fb[0..4], &[0x3F, 0x3F, 0x3F, 0x00]);
        assert_eq!(&fb[W..W + 4], &[0x3F, 0x3F, 0x3F, 0x00]);
    }

    #[test]
    fn test_stops_at_right_edge() {
        let r = renderer();
        let mut fb = vec![0u8; 8 * H / 8];
        // Pen reaches 8 after two glyphs; the rest, newline included, is dropped
        r.draw_utf8(&mut fb, 8, H, 0, 0, "AAAAA\nA", true).unwrap();
        assert_eq!(&fb[0..8], &[0x3F, 0x3F, 0x3F, 0x00, 0x3F, 0x3F, 0x3F, 0x00]);
        assert!(fb[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clipped_at_negative_origin() {
        let r = renderer();
        let mut fb = blank();
        r.draw_utf8(&mut fb, W, H, -2, -2, "A", true).unwrap();
        assert_eq!(fb[0], 0x0F);
        assert!(fb[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_entirely_off_screen_is_noop() {
        let r = renderer();
        let mut fb = blank();
        r.draw_utf8(&mut fb, W, H, 200, 100, "Test", true).unwrap();
        assert!(fb.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_extreme_origins_are_clipped() {
        let r = renderer();
        let mut fb = blank();
        r.draw_utf8(&mut fb, W, H, i32::MAX, 0, "A", true).unwrap();
        r.draw_utf8(&mut fb, W, H, 0, i32::MAX - 1, "A\nA", true)
            .unwrap();
        r.draw_utf8(&mut fb, W, H, i32::MIN, i32::MIN, "AB\nC", true)
            .unwrap();
        r.draw_utf8(&mut fb, W, H, i32::MAX, i32::MAX, "\n\nA", true)
            .unwrap();
        assert!(fb.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_erase_clears_exactly_glyph_bits() {
        let r = renderer();
        let mut drawn = blank();
        r.draw_utf8(&mut drawn, W, H, 1, 3, "Hi\nyo", true).unwrap();

        let mut erased = vec![0xFFu8; W * H / 8];
        r.draw_utf8(&mut erased, W, H, 1, 3, "Hi\nyo", false).unwrap();

        for (d, e) in drawn.iter().zip(&erased) {
            assert_eq!(*e, !*d);
        }
    }

    #[test]
    fn test_unsupported_codepoint_is_skipped_without_advance() {
        let r = renderer();
        let mut with_missing = blank();
        let mut plain = blank();
        let text = format!("{MISSING}A");
        r.draw_utf8(&mut with_missing, W, H, 0, 0, &text, true)
            .unwrap();
        r.draw_utf8(&mut plain, W, H, 0, 0, "A", true).unwrap();
        assert_eq!(with_missing, plain);
    }

    #[test]
    fn test_malformed_bytes_draw_replacement() {
        let r = renderer();
        let mut fb = blank();
        r.draw_utf8(&mut fb, W, H, 0, 0, b"\xC3".as_slice(), true)
            .unwrap();
        assert_eq!(fb[0], 0x3F);
    }

    #[test]
    fn test_wrong_frame_size_is_rejected() {
        let r = renderer();
        let mut fb = vec![0u8; 10];
        assert!(matches!(
            r.draw_utf8(&mut fb, W, H, 0, 0, "A", true),
            Err(FontError::Geometry(FramebufferError::SizeMismatch { .. }))
        ));
    }

    proptest! {
        #[test]
        fn prop_any_origin_draws_without_panic(x in any::<i32>(), y in any::<i32>()) {
            let r = renderer();
            let mut fb = blank();
            prop_assert!(r.draw_utf8(&mut fb, W, H, x, y, "Ay\nB", true).is_ok());
            prop_assert!(r.draw_utf8(&mut fb, W, H, x, y, "Ay\nB", false).is_ok());
            prop_assert!(fb.iter().all(|&b| b == 0));
        }
    }
}
