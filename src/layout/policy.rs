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

//! Wrapping thresholds derived from the configured line length.

/// Width thresholds, all in display columns. Derived once per format call
/// from `max_line_length` (clamped to at least 40 columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPolicy {
    pub max_line_length: usize,
}

impl LayoutPolicy {
    pub fn new(max_line_length: usize) -> LayoutPolicy {
        LayoutPolicy {
            max_line_length: max_line_length.max(40),
        }
    }

    /// Budget for a top-level inline column list, measured on the content.
    pub fn top_inline_columns_max(&self, river: usize) -> usize {
        self.max_line_length.saturating_sub(river + 8)
    }

    /// Budget for an inline column list inside a subquery.
    pub fn nested_inline_columns_max(&self) -> usize {
        self.max_line_length
    }

    /// A top-level column list with two or more aliases breaks once its
    /// one-line form passes this point.
    pub fn alias_break_min(&self) -> usize {
        self.max_line_length * 5 / 8
    }

    /// General expression lines wrap past this column.
    pub fn expr_wrap_max(&self) -> usize {
        self.max_line_length
    }

    /// Widest column the CREATE TABLE type column is padded to.
    pub fn type_align_cap(&self) -> usize {
        13
    }
}

impl Default for LayoutPolicy {
    fn default() -> LayoutPolicy {
        LayoutPolicy::new(80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_minimum() {
        assert_eq!(LayoutPolicy::new(10).max_line_length, 40);
        assert_eq!(LayoutPolicy::new(100).max_line_length, 100);
    }

    #[test]
    fn alias_break_is_five_eighths() {
        assert_eq!(LayoutPolicy::new(80).alias_break_min(), 50);
    }
}
