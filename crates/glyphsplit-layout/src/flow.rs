//! Reference inline formatting for a single container.
//!
//! [`FlowLayout`] lays out the subtree of one container element with a
//! greedy line breaker and reports geometry through [`LayoutHost`]. It models
//! the behaviour the split engine has to cope with:
//!
//! - Text inside one text node is shaped as a run: consecutive graphemes get
//!   the pair kerning from [`FontMetrics`].
//! - Element boundaries break shaping. Two graphemes in different nodes are
//!   never kerned against each other.
//! - `inline-block` elements are atomic. Their content is laid out on a
//!   single line and never wraps.
//! - Soft wrap opportunities exist at collapsible whitespace and on both
//!   sides of an atomic inline. Whitespace collapses to one space and hangs
//!   at the end of a line.
//! - `block` elements start and end their own lines.
//! - `margin-left` on an atomic inline shifts it and everything after it on
//!   the line.
//!
//! The computed layout is cached until the document revision or the
//! available width changes.
//!
//! # Example
//!
//! ```
//! use glyphsplit_core::Document;
//! use glyphsplit_layout::{FlowLayout, FontMetrics, LayoutHost, TextRange};
//!
//! let mut doc = Document::new();
//! let p = doc.create_element("p");
//! let text = doc.append_text(p, "AV").unwrap();
//!
//! let metrics = FontMetrics::new(16.0).with_kerning("A", "V", -1.5);
//! let mut layout = FlowLayout::new(p, 200.0, metrics);
//!
//! let v = layout.range_rect(&doc, &TextRange::new(text, 1, 2)).unwrap();
//! assert_eq!(v.left(), 8.0 - 1.5);
//! ```

use std::collections::HashMap;
use std::ops::Range;

use glyphsplit_core::{Document, NodeId, NodeKind};
use unicode_segmentation::UnicodeSegmentation;

use crate::geometry::{Point, Rect};
use crate::host::{LayoutHost, TextRange};
use crate::metrics::FontMetrics;
use crate::style::{self, Display};

/// Overflow allowance when deciding whether content fits on a line.
const FIT_EPSILON: f32 = 0.01;

/// One grapheme placed on a line.
#[derive(Debug, Clone, PartialEq)]
struct PlacedGlyph {
    range: Range<usize>,
    rect: Rect,
}

/// A grapheme shaped within its run, positioned relative to the run start.
#[derive(Debug, Clone)]
struct ShapedGlyph {
    range: Range<usize>,
    x: f32,
    advance: f32,
}

/// Layout of some content relative to its own top-left corner.
#[derive(Debug, Default)]
struct LocalLayout {
    width: f32,
    height: f32,
    boxes: Vec<(NodeId, Rect)>,
    glyphs: Vec<(NodeId, PlacedGlyph)>,
}

impl LocalLayout {
    fn merge_translated(&mut self, other: LocalLayout, dx: f32, dy: f32) {
        self.boxes.extend(
            other
                .boxes
                .into_iter()
                .map(|(node, rect)| (node, rect.offset(dx, dy))),
        );
        self.glyphs.extend(other.glyphs.into_iter().map(|(node, glyph)| {
            (
                node,
                PlacedGlyph {
                    range: glyph.range,
                    rect: glyph.rect.offset(dx, dy),
                },
            )
        }));
    }
}

/// An inline-level item produced by walking the tree.
#[derive(Debug)]
enum Item {
    /// A run of non-whitespace graphemes from one text node.
    Text {
        node: NodeId,
        glyphs: Vec<ShapedGlyph>,
        width: f32,
    },
    /// Collapsible whitespace from one text node.
    Space { node: NodeId, ranges: Vec<Range<usize>> },
    /// An `inline-block` element with its content already laid out.
    Atomic {
        node: NodeId,
        margin: f32,
        content: LocalLayout,
    },
    BlockStart(NodeId),
    BlockEnd(NodeId),
}

impl Item {
    fn is_text(&self) -> bool {
        matches!(self, Item::Text { .. })
    }

    fn advance(&self) -> f32 {
        match self {
            Item::Text { width, .. } => *width,
            Item::Atomic {
                margin, content, ..
            } => margin + content.width,
            _ => 0.0,
        }
    }
}

/// Line-breaking state while placing items.
#[derive(Debug, Default)]
struct LineState {
    x: f32,
    index: usize,
    has_content: bool,
    pending_space: Vec<(NodeId, Range<usize>)>,
    blocks: Vec<(NodeId, usize)>,
}

/// Computed geometry for the whole container.
#[derive(Debug, Default)]
struct FlowSnapshot {
    container: Rect,
    boxes: HashMap<NodeId, Rect>,
    glyphs: HashMap<NodeId, Vec<PlacedGlyph>>,
}

/// A deterministic inline layout of one container.
#[derive(Debug)]
pub struct FlowLayout {
    root: NodeId,
    origin: Point,
    width: f32,
    metrics: FontMetrics,
    fonts_ready: bool,
    reduced_motion: bool,
    cache: Option<((u64, u32), FlowSnapshot)>,
    passes: usize,
}

impl FlowLayout {
    /// Lay out `root` at the origin with `width` available.
    pub fn new(root: NodeId, width: f32, metrics: FontMetrics) -> Self {
        Self {
            root,
            origin: Point::ZERO,
            width,
            metrics,
            fonts_ready: true,
            reduced_motion: false,
            cache: None,
            passes: 0,
        }
    }

    /// Place the container's top-left corner at `origin`.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self.cache = None;
        self
    }

    /// Set the reduced motion preference reported to the engine.
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Set whether fonts report as loaded.
    pub fn set_fonts_ready(&mut self, ready: bool) {
        self.fonts_ready = ready;
    }

    /// The available width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Change the available width. Invalidates the cached layout.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// The font metrics in use.
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// How many full layout passes have run.
    pub fn layout_passes(&self) -> usize {
        self.passes
    }

    /// Number of lines the container currently occupies.
    pub fn line_count(&mut self, doc: &Document) -> usize {
        let line_height = self.metrics.line_height();
        let height = self.snapshot(doc).container.height();
        if line_height <= 0.0 {
            return 0;
        }
        (height / line_height).round() as usize
    }

    fn snapshot(&mut self, doc: &Document) -> &FlowSnapshot {
        let key = (doc.revision(), self.width.to_bits());
        let snapshot = match self.cache.take() {
            Some((cached, snapshot)) if cached == key => snapshot,
            _ => {
                self.passes += 1;
                self.compute(doc)
            }
        };
        &self.cache.insert((key, snapshot)).1
    }

    fn compute(&self, doc: &Document) -> FlowSnapshot {
        let mut items = Vec::new();
        self.collect(doc, self.root, &mut items);
        let local = self.place(items, Some(self.width));
        tracing::trace!(
            target: "glyphsplit_layout::flow",
            width = self.width,
            height = local.height,
            boxes = local.boxes.len(),
            "layout pass"
        );

        let mut snapshot = FlowSnapshot {
            container: Rect::new(self.origin.x, self.origin.y, self.width, local.height),
            ..Default::default()
        };
        for (node, rect) in local.boxes {
            snapshot
                .boxes
                .insert(node, rect.offset(self.origin.x, self.origin.y));
        }
        for (node, glyph) in local.glyphs {
            snapshot.glyphs.entry(node).or_default().push(PlacedGlyph {
                range: glyph.range,
                rect: glyph.rect.offset(self.origin.x, self.origin.y),
            });
        }
        snapshot
    }

    /// Walk the children of `node`, producing inline items.
    fn collect(&self, doc: &Document, node: NodeId, items: &mut Vec<Item>) {
        let Ok(children) = doc.children(node) else {
            return;
        };
        for &child in children {
            match doc.kind(child) {
                Ok(NodeKind::Text(text)) => self.shape_text(child, text, items),
                Ok(NodeKind::Element(el)) => match style::display(el) {
                    Display::None => {}
                    Display::Inline => self.collect(doc, child, items),
                    Display::InlineBlock => {
                        let mut inner = Vec::new();
                        self.collect(doc, child, &mut inner);
                        items.push(Item::Atomic {
                            node: child,
                            margin: style::margin_left(el, self.metrics.font_size()),
                            content: self.place(inner, None),
                        });
                    }
                    Display::Block => {
                        items.push(Item::BlockStart(child));
                        self.collect(doc, child, items);
                        items.push(Item::BlockEnd(child));
                    }
                },
                Err(_) => {}
            }
        }
    }

    /// Split a text node into text runs and whitespace, kerning within runs.
    fn shape_text(&self, node: NodeId, text: &str, items: &mut Vec<Item>) {
        let mut run: Vec<ShapedGlyph> = Vec::new();
        let mut spaces: Vec<Range<usize>> = Vec::new();
        let mut prev: Option<&str> = None;
        let mut pen = 0.0;

        for (offset, grapheme) in text.grapheme_indices(true) {
            let range = offset..offset + grapheme.len();
            if is_collapsible(grapheme) {
                if !run.is_empty() {
                    items.push(Item::Text {
                        node,
                        width: pen,
                        glyphs: std::mem::take(&mut run),
                    });
                }
                pen = 0.0;
                prev = None;
                spaces.push(range);
                continue;
            }
            if !spaces.is_empty() {
                items.push(Item::Space {
                    node,
                    ranges: std::mem::take(&mut spaces),
                });
            }
            if let Some(prev) = prev {
                pen += self.metrics.kerning(prev, grapheme);
            }
            let advance = self.metrics.advance(grapheme);
            run.push(ShapedGlyph {
                range,
                x: pen,
                advance,
            });
            pen += advance;
            prev = Some(grapheme);
        }

        if !run.is_empty() {
            items.push(Item::Text {
                node,
                width: pen,
                glyphs: run,
            });
        }
        if !spaces.is_empty() {
            items.push(Item::Space {
                node,
                ranges: spaces,
            });
        }
    }

    /// Place items on lines. `None` width means a single unbreakable line.
    fn place(&self, items: Vec<Item>, max_width: Option<f32>) -> LocalLayout {
        let line_height = self.metrics.line_height();
        let mut out = LocalLayout::default();
        let mut line = LineState::default();
        let mut iter = items.into_iter().peekable();

        while let Some(item) = iter.next() {
            match item {
                Item::Space { node, ranges } => {
                    if line.has_content {
                        line.pending_space
                            .extend(ranges.into_iter().map(|range| (node, range)));
                    } else {
                        let y = line.index as f32 * line_height;
                        for range in ranges {
                            out.glyphs.push((
                                node,
                                PlacedGlyph {
                                    range,
                                    rect: Rect::new(line.x, y, 0.0, line_height),
                                },
                            ));
                        }
                    }
                }
                Item::BlockStart(node) => {
                    if line.has_content {
                        self.break_line(&mut line, &mut out);
                    }
                    line.blocks.push((node, line.index));
                }
                Item::BlockEnd(node) => {
                    if line.has_content {
                        self.break_line(&mut line, &mut out);
                    }
                    if let Some((_, start)) = line.blocks.pop() {
                        let width = max_width.unwrap_or(out.width);
                        out.boxes.push((
                            node,
                            Rect::new(
                                0.0,
                                start as f32 * line_height,
                                width,
                                (line.index - start) as f32 * line_height,
                            ),
                        ));
                    }
                }
                first => {
                    // Adjacent text runs form one unbreakable chunk; atomics stand alone.
                    let mut chunk = vec![first];
                    if chunk[0].is_text() {
                        while iter.peek().is_some_and(Item::is_text) {
                            if let Some(next) = iter.next() {
                                chunk.push(next);
                            }
                        }
                    }
                    let chunk_width: f32 = chunk.iter().map(Item::advance).sum();
                    let space = if line.pending_space.is_empty() {
                        0.0
                    } else {
                        self.metrics.space_advance()
                    };

                    let overflows = max_width.is_some_and(|max| {
                        line.x + space + chunk_width > max + FIT_EPSILON
                    });
                    if line.has_content && overflows {
                        self.break_line(&mut line, &mut out);
                    } else {
                        self.flush_spaces(&mut line, &mut out, space);
                    }

                    for item in chunk {
                        self.place_inline(item, &mut line, &mut out);
                    }
                    out.width = out.width.max(line.x);
                }
            }
        }

        self.flush_spaces(&mut line, &mut out, 0.0);
        let lines = line.index + usize::from(line.has_content);
        out.height = lines as f32 * line_height;
        if let Some(max) = max_width {
            out.width = max;
        }
        out
    }

    fn place_inline(&self, item: Item, line: &mut LineState, out: &mut LocalLayout) {
        let line_height = self.metrics.line_height();
        let y = line.index as f32 * line_height;
        match item {
            Item::Text {
                node,
                glyphs,
                width,
            } => {
                for glyph in glyphs {
                    out.glyphs.push((
                        node,
                        PlacedGlyph {
                            range: glyph.range,
                            rect: Rect::new(line.x + glyph.x, y, glyph.advance, line_height),
                        },
                    ));
                }
                line.x += width;
            }
            Item::Atomic {
                node,
                margin,
                content,
            } => {
                let left = line.x + margin;
                let width = content.width;
                out.boxes
                    .push((node, Rect::new(left, y, width, line_height)));
                out.merge_translated(content, left, y);
                line.x = left + width;
            }
            Item::Space { .. } | Item::BlockStart(_) | Item::BlockEnd(_) => return,
        }
        line.has_content = true;
    }

    /// Emit pending whitespace: the first collapsed space gets `space`, the rest nothing.
    fn flush_spaces(&self, line: &mut LineState, out: &mut LocalLayout, space: f32) {
        let y = line.index as f32 * self.metrics.line_height();
        let mut width = space;
        for (node, range) in line.pending_space.drain(..) {
            out.glyphs.push((
                node,
                PlacedGlyph {
                    range,
                    rect: Rect::new(line.x, y, width, self.metrics.line_height()),
                },
            ));
            line.x += width;
            width = 0.0;
        }
    }

    fn break_line(&self, line: &mut LineState, out: &mut LocalLayout) {
        // Whitespace at the end of a line hangs with no width.
        self.flush_spaces(line, out, 0.0);
        line.index += 1;
        line.x = 0.0;
        line.has_content = false;
    }

    /// Union of every laid-out box and glyph under `node`.
    fn descendant_bounds(&mut self, doc: &Document, node: NodeId) -> Option<Rect> {
        let descendants = doc.descendants(node).ok()?;
        let snapshot = self.snapshot(doc);
        let mut bounds: Option<Rect> = None;
        for id in descendants {
            let rects = snapshot
                .boxes
                .get(&id)
                .into_iter()
                .chain(snapshot.glyphs.get(&id).into_iter().flatten().map(|g| &g.rect));
            for rect in rects {
                bounds = Some(match bounds {
                    Some(b) => b.union(rect),
                    None => *rect,
                });
            }
        }
        bounds
    }
}

fn is_collapsible(grapheme: &str) -> bool {
    matches!(grapheme, " " | "\t" | "\n" | "\r" | "\r\n" | "\u{000C}")
}

impl LayoutHost for FlowLayout {
    fn range_rect(&mut self, doc: &Document, range: &TextRange) -> Option<Rect> {
        if range.is_empty() {
            return None;
        }
        let glyphs = self.snapshot(doc).glyphs.get(&range.node)?;
        glyphs
            .iter()
            .filter(|g| g.range.start < range.end && g.range.end > range.start)
            .map(|g| g.rect)
            .reduce(|a, b| a.union(&b))
    }

    fn element_rect(&mut self, doc: &Document, node: NodeId) -> Option<Rect> {
        if node == self.root {
            return Some(self.snapshot(doc).container);
        }
        if let Some(rect) = self.snapshot(doc).boxes.get(&node) {
            return Some(*rect);
        }
        // Plain inline elements span their content.
        self.descendant_bounds(doc, node)
    }

    fn font_size(&mut self, _doc: &Document, _node: NodeId) -> f32 {
        self.metrics.font_size()
    }

    fn fonts_ready(&self) -> bool {
        self.fonts_ready
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
