//! Pre-split position capture.
//!
//! Runs while the original text nodes are still in the tree. Each grapheme's
//! left edge is read from the host by measuring its own sub-range, which
//! captures the shaped position including any kerning or ligature effects.

use glyphsplit_core::Document;
use glyphsplit_layout::LayoutHost;

use crate::dash;
use crate::segment::SourceGrapheme;

/// A grapheme and where it was drawn before splitting.
#[derive(Debug, Clone, PartialEq)]
pub struct Grapheme {
    pub text: String,
    /// Left edge before splitting. `NaN` when the host could not measure it.
    pub original_left: f32,
}

/// A word as measured before splitting.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub graphemes: Vec<Grapheme>,
    /// Left edge of the first grapheme.
    pub start_left: f32,
    /// Continuation after a forced break; no space is placed before it.
    pub no_space_before: bool,
}

impl Word {
    /// The word's text.
    pub fn text(&self) -> String {
        self.graphemes.iter().map(|g| g.text.as_str()).collect()
    }
}

/// Measure every grapheme and apply forced dash breaks.
pub fn measure_words<H: LayoutHost + ?Sized>(
    doc: &Document,
    host: &mut H,
    sources: &[Vec<SourceGrapheme>],
) -> Vec<Word> {
    let mut words = Vec::new();
    let mut unmeasured = 0usize;

    for source in sources {
        let measured: Vec<Grapheme> = source
            .iter()
            .map(|g| {
                let left = host.range_rect(doc, &g.range).map(|r| r.left());
                if left.is_none() {
                    unmeasured += 1;
                }
                Grapheme {
                    text: g.text.clone(),
                    original_left: left.unwrap_or(f32::NAN),
                }
            })
            .collect();

        let pieces = dash::split_forced_breaks(measured, |g| g.text.as_str());
        for (graphemes, no_space_before) in pieces {
            let start_left = graphemes.first().map_or(f32::NAN, |g| g.original_left);
            words.push(Word {
                graphemes,
                start_left,
                no_space_before,
            });
        }
    }

    if unmeasured > 0 {
        tracing::debug!(
            target: "glyphsplit::split",
            unmeasured,
            "host could not measure some graphemes; their gaps will not be corrected"
        );
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment_words;
    use glyphsplit_layout::{FlowLayout, FontMetrics};

    #[test]
    fn test_measures_kerned_positions() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_text(p, "AV to").unwrap();
        let metrics = FontMetrics::new(10.0)
            .with_default_advance(10.0)
            .with_space_advance(5.0)
            .with_kerning("A", "V", -2.0);
        let mut host = FlowLayout::new(p, 500.0, metrics);

        let sources = segment_words(&doc, p);
        let words = measure_words(&doc, &mut host, &sources);
        assert_eq!(words.len(), 2);
        let lefts: Vec<f32> = words[0].graphemes.iter().map(|g| g.original_left).collect();
        assert_eq!(lefts, vec![0.0, 8.0]);
        assert_eq!(words[1].start_left, 23.0);
        assert!(!words[1].no_space_before);
    }

    #[test]
    fn test_dash_produces_continuation() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_text(p, "well\u{2014}known fact").unwrap();
        let mut host = FlowLayout::new(p, 500.0, FontMetrics::default());

        let sources = segment_words(&doc, p);
        let words = measure_words(&doc, &mut host, &sources);
        let texts: Vec<String> = words.iter().map(Word::text).collect();
        assert_eq!(texts, vec!["well\u{2014}", "known", "fact"]);
        assert_eq!(
            words.iter().map(|w| w.no_space_before).collect::<Vec<_>>(),
            vec![false, true, false]
        );
        assert_eq!(words[1].start_left, words[0].graphemes[4].original_left + 8.0);
    }
}
