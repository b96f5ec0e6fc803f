//! Page-packed 1bpp framebuffer
//!
//! The vertical axis is split into 8-pixel pages; each byte holds one column
//! of one page, LSB at the top. Drawing outside the buffer is silently
//! clipped: a status display must keep running when a caller overflows it.

mod font5x7;

use core::fmt;

pub use font5x7::{CELL_HEIGHT, CELL_WIDTH};

/// Framebuffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferError {
    /// Height is not a multiple of 8 (or a dimension is zero)
    InvalidGeometry { width: usize, height: usize },
    /// Buffer length does not match `width * (height / 8)`
    SizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferError::InvalidGeometry { width, height } => write!(
                f,
                "invalid framebuffer geometry {width}x{height} (height must be a multiple of 8)"
            ),
            FramebufferError::SizeMismatch { expected, actual } => write!(
                f,
                "framebuffer size mismatch: expected {expected} bytes, got {actual}"
            ),
        }
    }
}

impl std::error::Error for FramebufferError {}

/// Check geometry and return the frame length in bytes
pub fn frame_len(width: usize, height: usize) -> Result<usize, FramebufferError> {
    if width == 0 || height == 0 || height % 8 != 0 {
        return Err(FramebufferError::InvalidGeometry { width, height });
    }
    Ok(width * (height / 8))
}

/// Check a borrowed frame against its geometry
pub fn check_frame(buf: &[u8], width: usize, height: usize) -> Result<(), FramebufferError> {
    let expected = frame_len(width, height)?;
    if buf.len() != expected {
        return Err(FramebufferError::SizeMismatch {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Set or clear one pixel of a borrowed page-packed buffer
///
/// Out-of-range coordinates, and bytes beyond the end of a short buffer,
/// are ignored.
#[inline]
pub fn set_pixel_in(buf: &mut [u8], width: usize, height: usize, x: i32, y: i32, on: bool) {
    if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    let idx = (y / 8) * width + x;
    let mask = 1u8 << (y % 8);
    if let Some(byte) = buf.get_mut(idx) {
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
}

/// Read one pixel of a borrowed page-packed buffer (false when out of range)
#[inline]
pub fn pixel_in(buf: &[u8], width: usize, height: usize, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
        return false;
    }
    let (x, y) = (x as usize, y as usize);
    buf.get((y / 8) * width + x)
        .map_or(false, |b| b & (1 << (y % 8)) != 0)
}

/// 1bpp page-packed framebuffer
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    buf: Vec<u8>,
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("lit", &self.buf.iter().map(|b| b.count_ones()).sum::<u32>())
            .finish()
    }
}

impl Framebuffer {
    /// Create a cleared framebuffer
    pub fn new(width: usize, height: usize) -> Result<Self, FramebufferError> {
        let len = frame_len(width, height)?;
        Ok(Self {
            width,
            height,
            buf: vec![0; len],
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of 8-pixel pages
    pub fn pages(&self) -> usize {
        self.height / 8
    }

    /// Live buffer
    pub fn fb(&self) -> &[u8] {
        &self.buf
    }

    /// Live buffer, for in-place compositing
    pub fn fb_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    /// Set or clear a pixel
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        set_pixel_in(&mut self.buf, self.width, self.height, x, y, on);
    }

    /// Read a pixel (false outside the buffer)
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        pixel_in(&self.buf, self.width, self.height, x, y)
    }

    /// Horizontal line from `x0` to `x1` inclusive
    pub fn horizontal_line(&mut self, x0: i32, x1: i32, y: i32, on: bool) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let (a, b) = order(x0, x1);
        let Some((a, b)) = clip_span(a, b, self.width) else {
            return;
        };
        for x in a..=b {
            self.set_pixel(x, y, on);
        }
    }

    /// Vertical line from `y0` to `y1` inclusive
    pub fn vertical_line(&mut self, x: i32, y0: i32, y1: i32, on: bool) {
        if x < 0 || x as usize >= self.width {
            return;
        }
        let (a, b) = order(y0, y1);
        let Some((a, b)) = clip_span(a, b, self.height) else {
            return;
        };
        for y in a..=b {
            self.set_pixel(x, y, on);
        }
    }

    /// Rectangle outline between two inclusive corners
    pub fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, on: bool) {
        let (xa, xb) = order(x0, x1);
        let (ya, yb) = order(y0, y1);
        self.horizontal_line(xa, xb, ya, on);
        self.horizontal_line(xa, xb, yb, on);
        self.vertical_line(xa, ya, yb, on);
        self.vertical_line(xb, ya, yb, on);
    }

    /// Filled rectangle between two inclusive corners
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, on: bool) {
        let (xa, xb) = order(x0, x1);
        let (ya, yb) = order(y0, y1);
        let Some((ya, yb)) = clip_span(ya, yb, self.height) else {
            return;
        };
        for y in ya..=yb {
            self.horizontal_line(xa, xb, y, on);
        }
    }

    /// Draw ASCII text with the built-in 5x7 font
    ///
    /// Each character occupies a 6x8 cell with its top-left corner at the
    /// pen. `\n` returns to `x` and moves down one cell. Characters outside
    /// printable ASCII draw as a blank cell. With `on == false` the glyph
    /// pixels are cleared instead of set; the rest of the cell is untouched.
    pub fn draw_text(&mut self, x: i32, y: i32, s: &str, on: bool) {
        let mut pen_x = x;
        let mut pen_y = y;
        for ch in s.chars() {
            if ch == '\n' {
                pen_x = x;
                pen_y = pen_y.saturating_add(CELL_HEIGHT as i32);
                continue;
            }
            self.draw_char(pen_x, pen_y, ch, on);
            pen_x = pen_x.saturating_add(CELL_WIDTH as i32);
        }
    }

    fn draw_char(&mut self, x: i32, y: i32, ch: char, on: bool) {
        let Some(columns) = font5x7::glyph(ch) else {
            return;
        };
        for (dx, &bits) in columns.iter().enumerate() {
            for dy in 0..7 {
                if bits & (1 << dy) != 0 {
                    self.set_pixel(x.saturating_add(dx as i32), y.saturating_add(dy), on);
                }
            }
        }
    }
}

fn order(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Intersect `[a, b]` with `[0, len)`
fn clip_span(a: i32, b: i32, len: usize) -> Option<(i32, i32)> {
    let max = len as i32 - 1;
    if b < 0 || a > max {
        return None;
    }
    Some((a.max(0), b.min(max)))
}
