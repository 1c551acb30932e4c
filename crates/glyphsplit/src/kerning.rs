//! Kerning compensation.
//!
//! Once every character sits in its own wrapper the host can no longer shape
//! pairs together, so gaps drift from what was originally drawn. Each word is
//! measured once after wrapping and every drifted gap is corrected with a
//! `margin-left` on the right-hand character. The offset moves that character
//! and everything after it by the same amount, so each correction fixes its
//! own gap without touching its neighbours and one pass is enough.

use glyphsplit_core::{Document, DocumentResult, NodeId};
use glyphsplit_layout::LayoutHost;

use crate::build::WordNode;

/// A correction for one character of a word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Position of the character within its word. Never 0.
    pub index: usize,
    /// Offset to apply, rounded to two decimals.
    pub offset: f32,
}

/// Round to two decimal places.
pub fn round_offset(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Compute the corrections for one word.
///
/// `expected[i]` is the pre-split gap between characters `i - 1` and `i`,
/// `positions[i]` the current left edge of character `i`. A delta whose
/// magnitude reaches `threshold` is a measurement artifact (typically the
/// character moved to another line) and is skipped, as are deltas that round
/// to zero.
pub fn plan_corrections(
    expected: &[Option<f32>],
    positions: &[Option<f32>],
    threshold: f32,
) -> Vec<Correction> {
    let mut corrections = Vec::new();
    for i in 1..positions.len().min(expected.len()) {
        let (Some(expected_gap), Some(left), Some(previous)) =
            (expected[i], positions[i], positions[i - 1])
        else {
            continue;
        };
        let delta = expected_gap - (left - previous);
        if !delta.is_finite() || delta.abs() >= threshold {
            tracing::trace!(target: "glyphsplit::kerning", index = i, delta, "skipping artifact");
            continue;
        }
        let offset = round_offset(delta);
        if offset != 0.0 {
            corrections.push(Correction { index: i, offset });
        }
    }
    corrections
}

/// Format an offset as a CSS pixel length.
pub fn format_offset(offset: f32) -> String {
    format!("{offset}px")
}

/// Measure and correct every word in order. Returns the number of corrections.
///
/// The stashed expected gaps are cleared from each word once used.
pub fn compensate<H: LayoutHost + ?Sized>(
    doc: &mut Document,
    host: &mut H,
    words: &mut [WordNode],
    threshold: f32,
) -> DocumentResult<usize> {
    let mut applied = 0;
    for word in words.iter_mut() {
        if word.chars.len() < 2 {
            word.expected_gaps.clear();
            continue;
        }
        let positions = measure_lefts(doc, host, &word.chars);
        let corrections = plan_corrections(&word.expected_gaps, &positions, threshold);
        for correction in &corrections {
            let node = word.chars[correction.index];
            doc.set_style_property(node, "margin-left", &format_offset(correction.offset))?;
        }
        applied += corrections.len();
        word.expected_gaps.clear();
    }

    tracing::debug!(target: "glyphsplit::kerning", applied, "kerning compensation done");
    Ok(applied)
}

fn measure_lefts<H: LayoutHost + ?Sized>(
    doc: &Document,
    host: &mut H,
    nodes: &[NodeId],
) -> Vec<Option<f32>> {
    nodes
        .iter()
        .map(|&node| host.element_rect(doc, node).map(|r| r.left()))
        .collect()
}
