//! Text Measurement
//!
//! Estimates how tall a block of text renders so the page layout can size
//! text-only blocks without a font engine. Width is counted in glyph
//! advances: most characters take one, wide CJK and emoji take two.

use serde::{Deserialize, Serialize};

/// Advance of one character in narrow-glyph units.
pub fn char_advance(c: char) -> u32 {
    if c.is_ascii() {
        return if c.is_ascii_control() { 0 } else { 1 };
    }
    let code = c as u32;
    if (0x1100..=0x115F).contains(&code)     // Hangul Jamo
        || (0x2E80..=0x9FFF).contains(&code)   // CJK
        || (0xAC00..=0xD7A3).contains(&code)   // Hangul Syllables
        || (0xF900..=0xFAFF).contains(&code)   // CJK Compatibility
        || (0xFF00..=0xFF60).contains(&code)   // Fullwidth Forms
        || (0x1F300..=0x1F9FF).contains(&code) // Emoji
        || (0x20000..=0x2FFFF).contains(&code) // CJK Extension B-F
    {
        2
    } else {
        1
    }
}

/// Total advance of a string.
pub fn text_advance(s: &str) -> u32 {
    s.chars().map(char_advance).sum()
}

/// Font metrics used for estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMetrics {
    /// Average advance of a narrow glyph, in pixels.
    pub glyph_width_px: f64,
    pub line_height_px: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            glyph_width_px: 8.5,
            line_height_px: 26.0,
        }
    }
}

impl TextMetrics {
    pub fn body() -> Self {
        Self::default()
    }

    pub fn heading() -> Self {
        Self {
            glyph_width_px: 18.0,
            line_height_px: 48.0,
        }
    }
}

/// Lines `text` occupies when word-wrapped to `columns` advances.
///
/// Words longer than a line are broken. Explicit newlines always break.
/// Empty text occupies no lines.
pub fn wrapped_line_count(text: &str, columns: u32) -> u32 {
    if text.is_empty() {
        return 0;
    }
    if columns == 0 {
        return 1;
    }

    let mut lines = 0u32;
    for paragraph in text.split('\n') {
        let mut line = 0u32;
        lines += 1;
        for word in paragraph.split_whitespace() {
            let advance = text_advance(word);
            let needed = if line == 0 { advance } else { line + 1 + advance };
            if needed <= columns {
                line = needed;
                continue;
            }
            if line > 0 {
                lines += 1;
            }
            // Overlong word: break it across full lines.
            lines += advance.saturating_sub(1) / columns;
            line = match advance % columns {
                0 if advance > 0 => columns,
                rest => rest,
            };
        }
    }
    lines
}

/// Estimated rendered height of `text` in a box `width_px` wide.
pub fn text_height_px(text: &str, width_px: f64, metrics: &TextMetrics) -> f64 {
    let columns = if metrics.glyph_width_px > 0.0 {
        (width_px / metrics.glyph_width_px).floor().max(0.0) as u32
    } else {
        0
    };
    wrapped_line_count(text, columns) as f64 * metrics.line_height_px
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_advance() {
        assert_eq!(char_advance('a'), 1);
        assert_eq!(char_advance('\t'), 0);
        assert_eq!(char_advance('中'), 2);
        assert_eq!(char_advance('🚀'), 2);
        assert_eq!(text_advance("ab中"), 4);
    }

    #[test]
    fn test_wrapped_line_count() {
        assert_eq!(wrapped_line_count("", 10), 0);
        assert_eq!(wrapped_line_count("hello", 10), 1);
        assert_eq!(wrapped_line_count("hello world", 11), 1);
        assert_eq!(wrapped_line_count("hello world", 10), 2);
        assert_eq!(wrapped_line_count("one\ntwo", 80), 2);
    }

    #[test]
    fn test_overlong_word_breaks() {
        // 25 advances in 10 columns: 3 lines.
        assert_eq!(wrapped_line_count("abcdefghijklmnopqrstuvwxy", 10), 3);
        assert_eq!(wrapped_line_count("ab abcdefghijklmnopqrst", 10), 3);
        assert_eq!(wrapped_line_count("abcdefghij", 10), 1);
    }

    #[test]
    fn test_text_height_px() {
        let metrics = TextMetrics {
            glyph_width_px: 10.0,
            line_height_px: 20.0,
        };
        assert_eq!(text_height_px("hello world", 100.0, &metrics), 40.0);
        assert_eq!(text_height_px("", 100.0, &metrics), 0.0);
    }
}
