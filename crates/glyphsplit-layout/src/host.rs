//! The measurement seam between the split engine and a layout host.
//!
//! The engine never lays text out itself. It asks the host where things ended
//! up on screen: a sub-range of a text node, or the box of an element. Every
//! query reflects the tree as it is at the time of the call.

use glyphsplit_core::{Document, NodeId};

use crate::geometry::Rect;

/// A byte range inside a single text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    /// The text node.
    pub node: NodeId,
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Create a range over `start..end` of `node`.
    pub fn new(node: NodeId, start: usize, end: usize) -> Self {
        Self { node, start, end }
    }

    /// Whether the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A layout engine that can report on-screen geometry.
///
/// Coordinates are absolute, in device-independent units, with `y` growing
/// downwards. Methods return `None` when the target is not laid out (detached,
/// hidden, or outside the host's scope).
pub trait LayoutHost {
    /// Bounding box of the glyphs covering `range`.
    fn range_rect(&mut self, doc: &Document, range: &TextRange) -> Option<Rect>;

    /// Border box of an element.
    fn element_rect(&mut self, doc: &Document, node: NodeId) -> Option<Rect>;

    /// Computed font size of `node`, in device-independent units.
    fn font_size(&mut self, doc: &Document, node: NodeId) -> f32;

    /// Whether every font the content needs has loaded.
    ///
    /// Measuring before fonts load yields fallback-font widths.
    fn fonts_ready(&self) -> bool {
        true
    }

    /// The host's reduced motion preference.
    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}
