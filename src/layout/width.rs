// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Display-column accounting.
//!
//! Wrapping decisions count East Asian wide characters as two columns so
//! CJK-heavy SQL wraps where a terminal actually shows it wrapping. The
//! ranges pinned below are forced to width 2; everything else defers to
//! `unicode-width`.

use unicode_width::UnicodeWidthChar;

fn is_east_asian_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x11FF        // Hangul Jamo
        | 0x3000..=0x303F      // CJK punctuation
        | 0x3130..=0x318F      // Hangul compatibility Jamo
        | 0x3400..=0x4DBF      // CJK extension A
        | 0x4E00..=0x9FFF      // CJK unified
        | 0xAC00..=0xD7A3      // Hangul syllables
        | 0xF900..=0xFAFF      // CJK compatibility ideographs
        | 0xFF00..=0xFF60      // fullwidth forms
        | 0xFFE0..=0xFFE6      // fullwidth signs
        | 0x1F300..=0x1FAFF    // wide emoji
        | 0x20000..=0x2FFFD    // CJK supplementary
    )
}

/// Display width of one character.
pub fn char_width(c: char) -> usize {
    if is_east_asian_wide(c) {
        2
    } else {
        UnicodeWidthChar::width(c).unwrap_or(0)
    }
}

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one_column_each() {
        assert_eq!(display_width("SELECT"), 6);
    }

    #[test]
    fn cjk_counts_double() {
        assert_eq!(display_width("주문"), 4);
        assert_eq!(display_width("名前"), 4);
        assert_eq!(display_width("a名"), 3);
    }

    #[test]
    fn emoji_counts_double() {
        assert_eq!(display_width("🚀"), 2);
    }
}
