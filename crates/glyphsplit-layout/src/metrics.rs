//! Font metrics for the reference layout.
//!
//! A deliberately small model of a shaped font: one advance per grapheme and
//! a pair table of kerning adjustments. Pair kerning only applies between
//! graphemes shaped together in the same text run.

use std::collections::HashMap;

/// Advance widths and pair kerning for a single font at a single size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    font_size: f32,
    line_height: f32,
    default_advance: f32,
    space_advance: f32,
    advances: HashMap<String, f32>,
    kerning: HashMap<(String, String), f32>,
}

impl FontMetrics {
    /// Metrics for a font of `font_size` with uniform advances.
    ///
    /// Defaults: advance `0.5em`, space `0.25em`, line height `1.2em`.
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            line_height: font_size * 1.2,
            default_advance: font_size * 0.5,
            space_advance: font_size * 0.25,
            advances: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    /// Set the line height.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the advance used for graphemes without an explicit entry.
    pub fn with_default_advance(mut self, advance: f32) -> Self {
        self.default_advance = advance;
        self
    }

    /// Set the advance of a collapsed space.
    pub fn with_space_advance(mut self, advance: f32) -> Self {
        self.space_advance = advance;
        self
    }

    /// Set the advance of one grapheme.
    pub fn with_advance(mut self, grapheme: &str, advance: f32) -> Self {
        self.advances.insert(grapheme.to_string(), advance);
        self
    }

    /// Add a kerning adjustment applied between `left` and `right`.
    pub fn with_kerning(mut self, left: &str, right: &str, adjust: f32) -> Self {
        self.kerning
            .insert((left.to_string(), right.to_string()), adjust);
        self
    }

    /// Font size in device-independent units.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Line box height.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Advance of a collapsed space.
    pub fn space_advance(&self) -> f32 {
        self.space_advance
    }

    /// Advance of a grapheme.
    pub fn advance(&self, grapheme: &str) -> f32 {
        if let Some(&advance) = self.advances.get(grapheme) {
            return advance;
        }
        if grapheme == "\u{00A0}" {
            return self.space_advance;
        }
        self.default_advance
    }

    /// Kerning adjustment between two adjacent graphemes, zero if none.
    pub fn kerning(&self, left: &str, right: &str) -> f32 {
        self.kerning
            .get(&(left.to_string(), right.to_string()))
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new(16.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_scale_with_size() {
        let m = FontMetrics::new(20.0);
        assert_eq!(m.advance("x"), 10.0);
        assert_eq!(m.space_advance(), 5.0);
        assert_eq!(m.line_height(), 24.0);
    }

    #[test]
    fn test_explicit_advances_and_kerning() {
        let m = FontMetrics::new(16.0)
            .with_advance("W", 12.0)
            .with_kerning("A", "V", -1.5);
        assert_eq!(m.advance("W"), 12.0);
        assert_eq!(m.kerning("A", "V"), -1.5);
        assert_eq!(m.kerning("V", "A"), 0.0);
        assert_eq!(m.advance("\u{00A0}"), m.space_advance());
    }
}
