//! Lenient UTF-8 decoding
//!
//! Text for the display comes from sensors, config files and serial links,
//! so a bad byte must cost one replacement glyph, not the whole line.

/// Replacement codepoint for undecodable input
pub const REPLACEMENT: char = '\u{FFFD}';

/// Iterator over the codepoints of a byte string
///
/// Sequences are classified by their lead byte (1 to 4 bytes). A truncated
/// sequence, a continuation byte that is not `10xxxxxx`, a stray lead byte
/// or a value that is not a Unicode scalar yields [`REPLACEMENT`] and
/// consumes only the lead byte, so decoding resynchronizes on the next byte.
/// Overlong forms are accepted and decode to their value (`C0 8A` is `\n`).
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    pos: usize,
}

/// Decode `bytes` codepoint by codepoint
pub fn codepoints(bytes: &[u8]) -> Codepoints<'_> {
    Codepoints { bytes, pos: 0 }
}

impl Iterator for Codepoints<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let lead = *self.bytes.get(self.pos)?;
        self.pos += 1;

        let (extra, initial) = match lead {
            0x00..=0x7F => return Some(lead as char),
            _ if lead & 0xE0 == 0xC0 => (1, (lead & 0x1F) as u32),
            _ if lead & 0xF0 == 0xE0 => (2, (lead & 0x0F) as u32),
            _ if lead & 0xF8 == 0xF0 => (3, (lead & 0x07) as u32),
            _ => return Some(REPLACEMENT),
        };

        let Some(tail) = self.bytes.get(self.pos..self.pos + extra) else {
            return Some(REPLACEMENT);
        };
        if tail.iter().any(|&b| b & 0xC0 != 0x80) {
            return Some(REPLACEMENT);
        }

        let cp = tail
            .iter()
            .fold(initial, |acc, &b| (acc << 6) | (b & 0x3F) as u32);
        self.pos += extra;
        Some(char::from_u32(cp).unwrap_or(REPLACEMENT))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.bytes.len() - self.pos;
        (left.div_ceil(4), Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(bytes: &[u8]) -> Vec<char> {
        codepoints(bytes).collect()
    }

    #[test]
    fn test_sequence_lengths() {
        // 1-byte A, 2-byte ©, 3-byte €, 4-byte 😀
        assert_eq!(decode("A©€😀".as_bytes()), vec!['A', '©', '€', '😀']);
    }

    #[test]
    fn test_cyrillic() {
        assert_eq!(decode("Привет".as_bytes()).len(), 6);
    }

    #[test]
    fn test_truncated_sequence() {
        assert_eq!(decode(b"\xE2\x82"), vec![REPLACEMENT, REPLACEMENT]);
        assert_eq!(decode(b"A\xF0"), vec!['A', REPLACEMENT]);
    }

    #[test]
    fn test_bad_continuation_resyncs() {
        assert_eq!(decode(b"\xC3A"), vec![REPLACEMENT, 'A']);
    }

    #[test]
    fn test_stray_bytes() {
        assert_eq!(decode(b"\x80\xFF"), vec![REPLACEMENT, REPLACEMENT]);
    }

    #[test]
    fn test_overlong_forms_decode_to_their_value() {
        assert_eq!(decode(b"\xC0\x8A"), vec!['\n']);
        assert_eq!(decode(b"\xE0\x81\x81"), vec!['A']);
    }

    #[test]
    fn test_surrogate_is_replaced() {
        // ED A0 80 would be U+D800
        assert_eq!(decode(b"\xED\xA0\x80"), vec![REPLACEMENT]);
    }

    proptest! {
        #[test]
        fn prop_valid_utf8_matches_std(s in any::<String>()) {
            prop_assert_eq!(decode(s.as_bytes()), s.chars().collect::<Vec<_>>());
        }

        #[test]
        fn prop_arbitrary_bytes_never_overrun(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let n = codepoints(&bytes).count();
            prop_assert!(n <= bytes.len());
            prop_assert!(bytes.is_empty() || n > 0);
        }
    }
}
