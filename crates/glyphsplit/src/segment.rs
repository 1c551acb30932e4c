//! Word and grapheme segmentation of a container's text.
//!
//! Text is walked node by node in document order. Whitespace separates
//! words and runs of it collapse; a word may continue across element
//! boundaries when no whitespace intervenes (`foo<em>bar</em>` is one word).
//! Every grapheme remembers the text node range it came from so it can be
//! measured in place before the tree is rebuilt.

use glyphsplit_core::{Document, NodeId};
use glyphsplit_layout::TextRange;

/// A grapheme together with its location in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGrapheme {
    /// The grapheme text.
    pub text: String,
    /// Where the grapheme lives in the unsplit tree.
    pub range: TextRange,
}

/// Whether `c` separates words.
///
/// Non-breaking space is deliberately absent: it belongs to the word.
pub fn is_word_boundary(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

/// User-perceived characters of `text` with their byte offsets.
#[cfg(feature = "grapheme-clusters")]
pub fn graphemes(text: &str) -> impl Iterator<Item = (usize, &str)> {
    use unicode_segmentation::UnicodeSegmentation;
    text.grapheme_indices(true)
}

/// User-perceived characters of `text` with their byte offsets.
///
/// Built without cluster support, every code point is its own unit.
#[cfg(not(feature = "grapheme-clusters"))]
pub fn graphemes(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.char_indices()
        .map(move |(i, c)| (i, &text[i..i + c.len_utf8()]))
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_word_boundary)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split the text under `container` into whitespace-delimited words.
///
/// Never yields an empty word.
pub fn segment_words(doc: &Document, container: NodeId) -> Vec<Vec<SourceGrapheme>> {
    let mut words = Vec::new();
    let mut current: Vec<SourceGrapheme> = Vec::new();

    for node in doc.text_nodes(container) {
        let Ok(text) = doc.text(node) else {
            continue;
        };
        // Split on boundaries before clustering: a combining mark after a
        // space starts the next word.
        let mut start = 0;
        for (index, piece) in text.split(is_word_boundary).enumerate() {
            if index > 0 && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            for (offset, grapheme) in graphemes(piece) {
                let offset = start + offset;
                current.push(SourceGrapheme {
                    text: grapheme.to_string(),
                    range: TextRange::new(node, offset, offset + grapheme.len()),
                });
            }
            // Every boundary character is a single byte.
            start += piece.len() + 1;
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    tracing::trace!(target: "glyphsplit::split", words = words.len(), "segmented text");
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(words: &[Vec<SourceGrapheme>]) -> Vec<Vec<&str>> {
        words
            .iter()
            .map(|w| w.iter().map(|g| g.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_collapses_whitespace() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_text(p, "  ab \n\t cd\r\n").unwrap();
        let words = segment_words(&doc, p);
        assert_eq!(texts(&words), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_word_spans_elements() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let first = doc.append_text(p, "fo").unwrap();
        let em = doc.append_element(p, "em").unwrap();
        let second = doc.append_text(em, "o bar").unwrap();
        let words = segment_words(&doc, p);
        assert_eq!(texts(&words), vec![vec!["f", "o", "o"], vec!["b", "a", "r"]]);
        assert_eq!(words[0][1].range, TextRange::new(first, 1, 2));
        assert_eq!(words[0][2].range, TextRange::new(second, 0, 1));
    }

    #[test]
    fn test_non_breaking_space_stays_in_word() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_text(p, "a\u{00A0}b").unwrap();
        assert_eq!(segment_words(&doc, p).len(), 1);
    }

    #[cfg(feature = "grapheme-clusters")]
    #[test]
    fn test_clusters_stay_whole() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.append_text(p, "e\u{0301}\u{1F1EB}\u{1F1F7}").unwrap();
        let words = segment_words(&doc, p);
        assert_eq!(words[0].len(), 2);
        assert_eq!(words[0][0].text, "e\u{0301}");
        assert_eq!(words[0][1].range, TextRange::new(t, 3, 11));
    }

    #[test]
    fn test_combining_mark_after_space_starts_a_word() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.append_text(p, "a \u{0301}b").unwrap();
        let words = segment_words(&doc, p);
        assert_eq!(texts(&words), vec![vec!["a"], vec!["\u{0301}", "b"]]);
        assert_eq!(words[1][0].range, TextRange::new(t, 2, 4));
        assert_eq!(words[1][1].range, TextRange::new(t, 4, 5));
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        assert!(segment_words(&doc, p).is_empty());
        doc.append_text(p, " \n\t ").unwrap();
        assert!(segment_words(&doc, p).is_empty());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n b\t"), "a b");
        assert_eq!(collapse_whitespace(" \n "), "");
    }
}
