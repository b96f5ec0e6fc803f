//! Monochrome glyph bitmaps

/// A rasterized glyph
///
/// The bitmap is stored row by row, MSB first, `pitch` bytes per row. The
/// bearings place the bitmap relative to the pen: its top-left corner is at
/// `(pen_x + bearing_x, baseline - bearing_y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Bitmap width in pixels
    pub width: usize,
    /// Bitmap height in pixels
    pub rows: usize,
    /// Bytes per bitmap row
    pub pitch: usize,
    /// Packed bitmap, `rows * pitch` bytes
    pub bitmap: Vec<u8>,
    /// Pen to left edge
    pub bearing_x: i32,
    /// Baseline to top edge (positive upwards)
    pub bearing_y: i32,
    /// Horizontal advance in whole pixels
    pub advance: i32,
}

impl Glyph {
    /// Build a glyph by sampling `f(col, row)` over the bitmap
    pub fn from_fn(
        width: usize,
        rows: usize,
        bearing_x: i32,
        bearing_y: i32,
        advance: i32,
        mut f: impl FnMut(usize, usize) -> bool,
    ) -> Self {
        let pitch = width.div_ceil(8);
        let mut bitmap = vec![0u8; pitch * rows];
        for row in 0..rows {
            for col in 0..width {
                if f(col, row) {
                    bitmap[row * pitch + col / 8] |= 0x80 >> (col % 8);
                }
            }
        }
        Self {
            width,
            rows,
            pitch,
            bitmap,
            bearing_x,
            bearing_y,
            advance,
        }
    }

    /// Threshold an 8-bit coverage map (row-major, `width * rows` bytes)
    pub fn from_coverage(
        width: usize,
        rows: usize,
        coverage: &[u8],
        threshold: u8,
        bearing_x: i32,
        bearing_y: i32,
        advance: i32,
    ) -> Self {
        Self::from_fn(width, rows, bearing_x, bearing_y, advance, |col, row| {
            coverage
                .get(row * width + col)
                .is_some_and(|&c| c >= threshold)
        })
    }

    /// Whether the bitmap pixel at `(col, row)` is set
    #[inline]
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        if col >= self.width || row >= self.rows {
            return false;
        }
        self.bitmap
            .get(row * self.pitch + col / 8)
            .is_some_and(|b| b & (0x80 >> (col % 8)) != 0)
    }

    /// Iterate over the set pixels as `(col, row)`
    pub fn set_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.width).map(move |col| (col, row)))
            .filter(|&(col, row)| self.is_set(col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing_is_msb_first() {
        let g = Glyph::from_fn(10, 2, 0, 2, 11, |col, row| row == 0 && (col == 0 || col == 9));
        assert_eq!(g.pitch, 2);
        assert_eq!(g.bitmap, vec![0x80, 0x40, 0x00, 0x00]);
        assert!(g.is_set(9, 0));
        assert!(!g.is_set(9, 1));
        assert!(!g.is_set(10, 0));
    }

    #[test]
    fn test_coverage_threshold() {
        let g = Glyph::from_coverage(2, 2, &[0, 127, 128, 255], 128, 0, 2, 3);
        let set: Vec<_> = g.set_pixels().collect();
        assert_eq!(set, vec![(0, 1), (1, 1)]);
    }
}
