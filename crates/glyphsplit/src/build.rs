//! Wrapper construction.
//!
//! Replaces the container's content with one wrapper per word holding one
//! wrapper per character. Each non-first character carries the gap it had to
//! its predecessor before splitting; the kerning pass consumes those gaps.

use glyphsplit_core::{Document, DocumentResult, Element, NodeId, NodeKind};

use crate::measure::Word;
use crate::options::SplitOptions;

/// The three wrapper levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WrapperKind {
    Char,
    Word,
    Line,
}

impl WrapperKind {
    fn index_attribute(self) -> &'static str {
        match self {
            WrapperKind::Char => "data-char-index",
            WrapperKind::Word => "data-word-index",
            WrapperKind::Line => "data-line-index",
        }
    }

    fn index_property(self) -> &'static str {
        match self {
            WrapperKind::Char => "--char-index",
            WrapperKind::Word => "--word-index",
            WrapperKind::Line => "--line-index",
        }
    }

    fn class(self, options: &SplitOptions) -> &str {
        match self {
            WrapperKind::Char => &options.classes.char,
            WrapperKind::Word => &options.classes.word,
            WrapperKind::Line => &options.classes.line,
        }
    }
}

/// Create a wrapper element for position `index` and append it to `parent`.
pub(crate) fn append_wrapper(
    doc: &mut Document,
    parent: NodeId,
    kind: WrapperKind,
    index: usize,
    options: &SplitOptions,
) -> DocumentResult<NodeId> {
    let mut el = Element::new("span");
    el.set_attribute("class", kind.class(options));
    el.set_attribute(kind.index_attribute(), index.to_string());
    if kind != WrapperKind::Line {
        el.set_attribute("aria-hidden", "true");
    }

    let display = match kind {
        WrapperKind::Line => "block",
        WrapperKind::Char | WrapperKind::Word => "inline-block",
    };
    el.set_style_property("display", display);
    if options.prop_index {
        el.set_style_property(kind.index_property(), index.to_string());
    }
    if options.will_change && kind == WrapperKind::Char {
        el.set_style_property("will-change", "transform, opacity");
    }

    let id = doc.create(NodeKind::Element(el));
    doc.append_child(parent, id)?;
    Ok(id)
}

/// Append the literal space placed between words.
pub(crate) fn append_space(doc: &mut Document, parent: NodeId) -> DocumentResult<NodeId> {
    doc.append_text(parent, " ")
}

/// A word wrapper in the live tree.
#[derive(Debug, Clone, PartialEq)]
pub struct WordNode {
    pub node: NodeId,
    pub chars: Vec<NodeId>,
    pub no_space_before: bool,
    /// Pre-split gap to the previous character, `None` for the first one.
    /// Cleared once the kerning pass has used it.
    pub expected_gaps: Vec<Option<f32>>,
}

/// Gaps between consecutive graphemes of a measured word.
pub fn expected_gaps(word: &Word) -> Vec<Option<f32>> {
    let mut gaps = Vec::with_capacity(word.graphemes.len());
    let mut previous: Option<f32> = None;
    for grapheme in &word.graphemes {
        gaps.push(previous.map(|left| grapheme.original_left - left));
        previous = Some(grapheme.original_left);
    }
    gaps
}

/// Replace the content of `container` with word and character wrappers.
pub fn build_words(
    doc: &mut Document,
    container: NodeId,
    words: &[Word],
    options: &SplitOptions,
) -> DocumentResult<Vec<WordNode>> {
    doc.clear_children(container)?;

    let mut built = Vec::with_capacity(words.len());
    let mut char_index = 0;
    for (word_index, word) in words.iter().enumerate() {
        if word_index > 0 && !word.no_space_before {
            append_space(doc, container)?;
        }
        let node = append_wrapper(doc, container, WrapperKind::Word, word_index, options)?;
        let mut chars = Vec::with_capacity(word.graphemes.len());
        for grapheme in &word.graphemes {
            let char_node = append_wrapper(doc, node, WrapperKind::Char, char_index, options)?;
            doc.append_text(char_node, &grapheme.text)?;
            chars.push(char_node);
            char_index += 1;
        }
        built.push(WordNode {
            node,
            chars,
            no_space_before: word.no_space_before,
            expected_gaps: expected_gaps(word),
        });
    }

    tracing::debug!(
        target: "glyphsplit::split",
        words = built.len(),
        chars = char_index,
        "built wrappers"
    );
    Ok(built)
}
