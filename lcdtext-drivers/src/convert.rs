//! Page-packed mono to RGB conversion
//!
//! Output is row-major, left to right, top to bottom, matching a full-screen
//! address window. Each pixel takes `fg` if its bit is set, `bg` otherwise.

use lcdtext_core::config::PixelFormat;
use lcdtext_core::framebuffer::{self, FramebufferError};

/// Expand an RGB565 color to the three RGB666 bytes the controller expects
///
/// Each channel is left-aligned in its byte; the low bits are don't-care.
#[inline]
pub const fn rgb565_to_666(color: u16) -> [u8; 3] {
    [
        (((color >> 11) & 0x1F) as u8) << 3,
        (((color >> 5) & 0x3F) as u8) << 2,
        ((color & 0x1F) as u8) << 3,
    ]
}

/// Wire bytes of one pixel
#[inline]
pub(crate) fn encode(color: u16, format: PixelFormat, out: &mut Vec<u8>) {
    match format {
        PixelFormat::Rgb565 => out.extend_from_slice(&color.to_be_bytes()),
        PixelFormat::Rgb666 => out.extend_from_slice(&rgb565_to_666(color)),
    }
}

/// Convert a page-packed frame into `format` pixels
///
/// Fails if the geometry is unusable or `fb` has the wrong length.
pub fn mono_to_native(
    fb: &[u8],
    width: usize,
    height: usize,
    fg: u16,
    bg: u16,
    format: PixelFormat,
) -> Result<Vec<u8>, FramebufferError> {
    framebuffer::check_frame(fb, width, height)?;

    let mut out = Vec::with_capacity(width * height * format.bytes_per_pixel());
    for y in 0..height {
        let row = &fb[(y / 8) * width..][..width];
        let mask = 1u8 << (y % 8);
        for &byte in row {
            let color = if byte & mask != 0 { fg } else { bg };
            encode(color, format, &mut out);
        }
    }
    Ok(out)
}

/// Convert to big-endian RGB565, 2 bytes per pixel
pub fn mono_to_rgb565(
    fb: &[u8],
    width: usize,
    height: usize,
    fg: u16,
    bg: u16,
) -> Result<Vec<u8>, FramebufferError> {
    mono_to_native(fb, width, height, fg, bg, PixelFormat::Rgb565)
}

/// Convert to RGB666, 3 bytes per pixel
pub fn mono_to_rgb666(
    fb: &[u8],
    width: usize,
    height: usize,
    fg: u16,
    bg: u16,
) -> Result<Vec<u8>, FramebufferError> {
    mono_to_native(fb, width, height, fg, bg, PixelFormat::Rgb666)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcdtext_core::framebuffer::pixel_in;
    use proptest::prelude::*;

    const RED: u16 = 0xF800;
    const BLUE: u16 = 0x001F;

    #[test]
    fn test_rgb565_known_frame() {
        // Column 0: rows 0 and 2; column 1: rows 1 and 3
        let out = mono_to_rgb565(&[0x05, 0x0A], 2, 8, RED, BLUE).unwrap();
        assert_eq!(out.len(), 2 * 8 * 2);
        assert_eq!(&out[0..4], &[0xF8, 0x00, 0x00, 0x1F]);
        assert_eq!(&out[4..8], &[0x00, 0x1F, 0xF8, 0x00]);
        // Rows 4..8 are all background
        assert!(out[16..].chunks(2).all(|px| px == [0x00, 0x1F]));
    }

    #[test]
    fn test_rgb666_known_frame() {
        let out = mono_to_rgb666(&[0x05, 0x0A], 2, 8, RED, BLUE).unwrap();
        assert_eq!(out.len(), 2 * 8 * 3);
        assert_eq!(&out[0..6], &[0xF8, 0x00, 0x00, 0x00, 0x00, 0xF8]);
        assert_eq!(&out[6..12], &[0x00, 0x00, 0xF8, 0xF8, 0x00, 0x00]);
    }

    #[test]
    fn test_rgb565_to_666_channels() {
        assert_eq!(rgb565_to_666(0xFFFF), [0xF8, 0xFC, 0xF8]);
        assert_eq!(rgb565_to_666(0x07E0), [0x00, 0xFC, 0x00]);
        assert_eq!(rgb565_to_666(0x0000), [0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_size_mismatch() {
        assert_eq!(
            mono_to_rgb565(&[0u8; 3], 2, 8, RED, BLUE),
            Err(FramebufferError::SizeMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_bad_geometry() {
        assert!(matches!(
            mono_to_rgb666(&[0u8; 2], 2, 6, RED, BLUE),
            Err(FramebufferError::InvalidGeometry { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_every_pixel_picks_fg_or_bg(fb in proptest::collection::vec(any::<u8>(), 16 * 2)) {
            let out = mono_to_rgb565(&fb, 16, 16, RED, BLUE).unwrap();
            for y in 0..16usize {
                for x in 0..16usize {
                    let i = (y * 16 + x) * 2;
                    let px = u16::from_be_bytes([out[i], out[i + 1]]);
                    let expected = if pixel_in(&fb, 16, 16, x as i32, y as i32) { RED } else { BLUE };
                    prop_assert_eq!(px, expected);
                }
            }
        }
    }
}
