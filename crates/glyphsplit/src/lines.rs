//! Line detection and the line wrapper layer.
//!
//! Words are grouped by their top edge after kerning compensation, since the
//! corrections can move wrap points. A word stays on the current line while
//! its top is within the tolerance of the line's first word.

use glyphsplit_core::{Document, DocumentResult, NodeId};
use glyphsplit_layout::LayoutHost;

use crate::build::{self, WordNode, WrapperKind};
use crate::options::SplitOptions;

/// Minimum grouping tolerance in device-independent units.
pub const MIN_TOLERANCE: f32 = 5.0;

/// Grouping tolerance as a fraction of the font size.
pub const TOLERANCE_FACTOR: f32 = 0.3;

/// Tolerance for grouping words of a given font size into one line.
pub fn line_tolerance(font_size: f32) -> f32 {
    (font_size * TOLERANCE_FACTOR).max(MIN_TOLERANCE)
}

/// Group word indices into lines by top edge.
///
/// A word without a measured top joins the current line.
pub fn group_lines(tops: &[Option<f32>], tolerance: f32) -> Vec<Vec<usize>> {
    let mut lines: Vec<Vec<usize>> = Vec::new();
    let mut anchor: Option<f32> = None;

    for (index, top) in tops.iter().enumerate() {
        let starts_line = match (anchor, top) {
            (Some(anchor), Some(top)) => (top - anchor).abs() >= tolerance,
            _ => lines.is_empty(),
        };
        if starts_line || anchor.is_none() {
            anchor = *top;
        }
        if starts_line {
            lines.push(Vec::new());
        }
        if let Some(line) = lines.last_mut() {
            line.push(index);
        }
    }
    lines
}

/// Measure word tops, group them into lines and rebuild the line layer.
///
/// Returns the line wrappers in order.
pub fn detect_lines<H: LayoutHost + ?Sized>(
    doc: &mut Document,
    host: &mut H,
    container: NodeId,
    words: &[WordNode],
    options: &SplitOptions,
) -> DocumentResult<Vec<NodeId>> {
    let tops: Vec<Option<f32>> = words
        .iter()
        .map(|w| host.element_rect(doc, w.node).map(|r| r.top()))
        .collect();
    let font_size = host.font_size(doc, container);
    let tolerance = line_tolerance(font_size);
    let groups = group_lines(&tops, tolerance);
    tracing::trace!(
        target: "glyphsplit::lines",
        ?tops,
        font_size,
        tolerance,
        "measured word tops"
    );

    let lines = rebuild_lines(doc, container, words, &groups, options)?;
    tracing::debug!(target: "glyphsplit::lines", lines = lines.len(), "rebuilt line layer");
    Ok(lines)
}

/// Tear down the current line layer and rebuild it from `groups`.
///
/// Word wrappers are kept and moved; spaces and old line wrappers are
/// discarded. A space goes between words on the same line unless the later
/// word is a continuation.
pub fn rebuild_lines(
    doc: &mut Document,
    container: NodeId,
    words: &[WordNode],
    groups: &[Vec<usize>],
    options: &SplitOptions,
) -> DocumentResult<Vec<NodeId>> {
    for word in words {
        doc.detach(word.node)?;
    }
    doc.clear_children(container)?;

    let mut lines = Vec::with_capacity(groups.len());
    for (line_index, group) in groups.iter().enumerate() {
        let line = build::append_wrapper(doc, container, WrapperKind::Line, line_index, options)?;
        for (position, &word_index) in group.iter().enumerate() {
            let Some(word) = words.get(word_index) else {
                continue;
            };
            if position > 0 && !word.no_space_before {
                build::append_space(doc, line)?;
            }
            doc.append_child(line, word.node)?;
        }
        lines.push(line);
    }
    Ok(lines)
}
