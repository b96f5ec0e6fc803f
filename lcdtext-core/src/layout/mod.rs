//! Four-line status layout
//!
//! The display is split into four stacked text lines:
//!
//! ```text
//! line 0  small   y = 0
//! line 1  LARGE   y = small
//! line 2  small   y = small + large
//! line 3  small   y = 2 * small + large
//! ```
//!
//! With the default 128x64 panel and 12/28 px fonts that is y = 0, 12, 40
//! and 52. Lines are not truncated; whatever does not fit is clipped by the
//! compositor.

use std::path::Path;

use log::{info, warn};

use crate::framebuffer::{frame_len, Framebuffer, FramebufferError};
use crate::text::{FontError, FontFace, TextRenderer};

/// Number of text lines
pub const LINE_COUNT: usize = 4;

/// Index of the large line
pub const LARGE_LINE: usize = 1;

/// Font role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Small,
    Large,
}

impl LineRole {
    /// Role of `line_id`, or `None` for an invalid id
    pub fn of(line_id: usize) -> Option<Self> {
        match line_id {
            LARGE_LINE => Some(LineRole::Large),
            id if id < LINE_COUNT => Some(LineRole::Small),
            _ => None,
        }
    }
}

/// Approximate advance of a monospace glyph at `font_size` px
pub fn estimate_char_width(font_size: u32) -> u32 {
    font_size * 6 / 10
}

/// Renderers and canvas, present only while initialized
struct Renderers<F> {
    small: TextRenderer<F>,
    large: TextRenderer<F>,
    canvas: Framebuffer,
}

/// Four independently addressable text lines rendered into one frame
pub struct LineDisplay<F> {
    width: usize,
    height: usize,
    small_font_size: u32,
    large_font_size: u32,
    renderers: Option<Renderers<F>>,
    lines: [String; LINE_COUNT],
    framebuffer: Vec<u8>,
}

impl<F: FontFace> LineDisplay<F> {
    /// Create an uninitialized display
    ///
    /// Fails if `height` is not a multiple of 8. A layout taller than the
    /// panel is accepted; the bottom lines are clipped.
    pub fn new(
        width: usize,
        height: usize,
        small_font_size: u32,
        large_font_size: u32,
    ) -> Result<Self, FramebufferError> {
        let len = frame_len(width, height)?;

        let stack = 3 * small_font_size as usize + large_font_size as usize;
        if stack > height {
            warn!(
                "line layout is {} px tall but the panel has {} px; bottom lines will clip",
                stack, height
            );
        }

        Ok(Self {
            width,
            height,
            small_font_size,
            large_font_size,
            renderers: None,
            lines: Default::default(),
            framebuffer: vec![0; len],
        })
    }

    /// Default 128x64 layout with 12 px and 28 px fonts
    pub fn with_defaults() -> Self {
        Self {
            width: 128,
            height: 64,
            small_font_size: 12,
            large_font_size: 28,
            renderers: None,
            lines: Default::default(),
            framebuffer: vec![0; 128 * 64 / 8],
        }
    }

    /// Load `font_path` at both sizes
    ///
    /// Any previous state is discarded first and all lines are cleared. If
    /// loading fails the display is left uninitialized.
    pub fn initialize(&mut self, font_path: impl AsRef<Path>) -> Result<(), FontError> {
        self.uninitialize();

        let path = font_path.as_ref();
        let renderers = self.build_renderers(path)?;

        self.renderers = Some(renderers);
        self.clear_all();
        info!(
            "line display {}x{} ready ({} / {} px, {})",
            self.width,
            self.height,
            self.small_font_size,
            self.large_font_size,
            path.display()
        );
        Ok(())
    }

    fn build_renderers(&self, path: &Path) -> Result<Renderers<F>, FontError> {
        let canvas = Framebuffer::new(self.width, self.height)?;

        let mut small = TextRenderer::new();
        small.load_font(path)?;
        small.set_pixel_size(self.small_font_size);

        let mut large = TextRenderer::new();
        large.load_font(path)?;
        large.set_pixel_size(self.large_font_size);

        Ok(Renderers {
            small,
            large,
            canvas,
        })
    }

    /// Drop the loaded fonts
    pub fn uninitialize(&mut self) {
        self.renderers = None;
    }

    /// Whether fonts are loaded
    pub fn is_initialized(&self) -> bool {
        self.renderers.is_some()
    }

    /// Pixel size used by a role
    pub fn font_size(&self, role: LineRole) -> u32 {
        match role {
            LineRole::Small => self.small_font_size,
            LineRole::Large => self.large_font_size,
        }
    }

    /// Role of a line, `None` for an invalid id
    pub fn line_role(&self, line_id: usize) -> Option<LineRole> {
        LineRole::of(line_id)
    }

    /// Top of a line: the summed heights of the lines above it
    pub fn line_offset(&self, line_id: usize) -> Option<i32> {
        LineRole::of(line_id)?;
        let offset = (0..line_id)
            .filter_map(LineRole::of)
            .map(|role| self.font_size(role) as i32)
            .sum();
        Some(offset)
    }

    /// Estimated number of characters that fit on a line
    ///
    /// 0 for an invalid line id.
    pub fn capacity(&self, line_id: usize) -> usize {
        let Some(role) = LineRole::of(line_id) else {
            return 0;
        };
        match estimate_char_width(self.font_size(role)) {
            0 => 0,
            char_width => self.width / char_width as usize,
        }
    }

    /// Replace the text of a line (ignored for an invalid id)
    pub fn set_text(&mut self, line_id: usize, text: impl Into<String>) {
        if let Some(line) = self.lines.get_mut(line_id) {
            *line = text.into();
        }
    }

    /// Text of a line, empty for an invalid id
    pub fn text(&self, line_id: usize) -> &str {
        self.lines.get(line_id).map_or("", String::as_str)
    }

    /// Clear one line (ignored for an invalid id)
    pub fn clear_line(&mut self, line_id: usize) {
        if let Some(line) = self.lines.get_mut(line_id) {
            line.clear();
        }
    }

    /// Clear all lines
    pub fn clear_all(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Render every non-empty line and return the frame
    ///
    /// Before initialization this returns the previous frame untouched. A
    /// line that fails to draw is logged and skipped.
    pub fn render(&mut self) -> &[u8] {
        let offsets: [i32; LINE_COUNT] =
            core::array::from_fn(|id| self.line_offset(id).unwrap_or(0));

        let Some(r) = self.renderers.as_mut() else {
            return &self.framebuffer;
        };

        r.canvas.clear();
        let (width, height) = (r.canvas.width(), r.canvas.height());

        for (id, text) in self.lines.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let renderer = match LineRole::of(id) {
                Some(LineRole::Large) => &r.large,
                _ => &r.small,
            };
            if let Err(e) = renderer.draw_utf8(
                r.canvas.fb_mut(),
                width,
                height,
                0,
                offsets[id],
                text.as_str(),
                true,
            ) {
                warn!("line {}: {}", id, e);
            }
        }

        self.framebuffer.copy_from_slice(r.canvas.fb());
        &self.framebuffer
    }

    /// Last rendered frame, without re-rendering
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Small font pixel size
    pub fn small_font_size(&self) -> u32 {
        self.small_font_size
    }

    /// Large font pixel size
    pub fn large_font_size(&self) -> u32 {
        self.large_font_size
    }
}
