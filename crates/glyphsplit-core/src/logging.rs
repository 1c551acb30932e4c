//! Logging and debugging facilities for glyphsplit.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Debug visualization for node trees
//! - Performance spans for profiling
//!
//! # Tracing Integration
//!
//! glyphsplit uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("glyphsplit=debug,glyphsplit_core=warn")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use glyphsplit_core::{Document, DocumentTreeDebug};
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("p");
//! doc.append_text(root, "hi").unwrap();
//!
//! let dump = DocumentTreeDebug::new().format_subtree(&doc, root).unwrap();
//! assert!(dump.contains("<p>"));
//! assert!(dump.contains("\"hi\""));
//! ```

use std::fmt::Write as FmtWrite;

use crate::document::{Document, NodeId, NodeKind};
use crate::error::DocumentResult;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Node tree target.
    pub const DOCUMENT: &str = "glyphsplit_core::document";
    /// Timer system target.
    pub const TIMER: &str = "glyphsplit_core::timer";
    /// Signal system target.
    pub const SIGNAL: &str = "glyphsplit_core::signal";
    /// Reference layout target.
    pub const FLOW: &str = "glyphsplit_layout::flow";
    /// Split pipeline target.
    pub const SPLIT: &str = "glyphsplit::split";
    /// Kerning compensation target.
    pub const KERNING: &str = "glyphsplit::kerning";
    /// Line detection target.
    pub const LINES: &str = "glyphsplit::lines";
    /// Resize coordination target.
    pub const RESIZE: &str = "glyphsplit::resize";
    /// Performance spans target.
    pub const PERF: &str = "glyphsplit::perf";
}

/// Debug utility for visualizing node trees.
///
/// The split pipeline dumps the container through this at `trace` level
/// after each rebuild.
#[derive(Debug, Clone)]
pub struct DocumentTreeDebug {
    show_attributes: bool,
}

impl Default for DocumentTreeDebug {
    fn default() -> Self {
        Self {
            show_attributes: true,
        }
    }
}

impl DocumentTreeDebug {
    /// Create a visualizer that shows attributes and inline style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show or hide element attributes and inline style.
    pub fn attributes(mut self, show: bool) -> Self {
        self.show_attributes = show;
        self
    }

    /// Format the subtree rooted at `root`, one node per line.
    pub fn format_subtree(&self, doc: &Document, root: NodeId) -> DocumentResult<String> {
        let mut output = String::new();
        self.format_into(doc, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_into(
        &self,
        doc: &Document,
        id: NodeId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> DocumentResult<()> {
        output.push_str(&build_prefix(depth, is_last));
        match doc.kind(id)? {
            NodeKind::Text(text) => {
                let _ = write!(output, "{text:?}");
            }
            NodeKind::Element(el) => {
                let _ = write!(output, "<{}", el.tag());
                if self.show_attributes {
                    for (name, value) in el.attributes() {
                        let _ = write!(output, " {name}={value:?}");
                    }
                    let style = el.style_text();
                    if !style.is_empty() {
                        let _ = write!(output, " style={style:?}");
                    }
                }
                output.push('>');
            }
        }
        output.push('\n');

        let children = doc.children(id)?;
        let count = children.len();
        for (i, &child) in children.iter().enumerate() {
            self.format_into(doc, child, depth + 1, i + 1 == count, output)?;
        }
        Ok(())
    }
}

fn build_prefix(depth: usize, is_last: bool) -> String {
    if depth == 0 {
        return String::new();
    }

    let mut prefix = String::new();
    for _ in 0..(depth - 1) {
        prefix.push_str("\u{2502}  ");
    }
    prefix.push_str(if is_last {
        "\u{2514}\u{2500}\u{2500} "
    } else {
        "\u{251c}\u{2500}\u{2500} "
    });
    prefix
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time whole pipeline runs.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "glyphsplit::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let word = doc.append_element(root, "span").unwrap();
        doc.set_attribute(word, "class", "split-word").unwrap();
        doc.set_style_property(word, "display", "inline-block").unwrap();
        doc.append_text(word, "ab").unwrap();
        doc.append_text(root, " ").unwrap();
        (doc, root)
    }

    #[test]
    fn test_format_hierarchy() {
        let (doc, root) = sample();
        let output = DocumentTreeDebug::new().format_subtree(&doc, root).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "<div>");
        assert!(lines[1].contains("class=\"split-word\""));
        assert!(lines[1].contains("style=\"display: inline-block\""));
        assert!(lines[2].contains("\"ab\""));
        assert!(lines[3].starts_with('\u{2514}'));
    }

    #[test]
    fn test_format_without_attributes() {
        let (doc, root) = sample();
        let output = DocumentTreeDebug::new()
            .attributes(false)
            .format_subtree(&doc, root)
            .unwrap();
        assert!(output.contains("\u{251c}\u{2500}\u{2500} <span>"));
        assert!(!output.contains("class"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
