//! Markup serialization and restorable snapshots.
//!
//! [`MarkupSnapshot`] captures the children of a node both as serialized
//! markup and as an owned fragment, so the exact original content can be put
//! back after the tree has been rebuilt.

use crate::document::{Document, NodeId, NodeKind};
use crate::error::DocumentResult;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "wbr"];

/// Serialize the children of `id`.
pub fn inner_markup(doc: &Document, id: NodeId) -> DocumentResult<String> {
    let mut out = String::new();
    for &child in doc.children(id)? {
        write_node(doc, child, &mut out)?;
    }
    Ok(out)
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) -> DocumentResult<()> {
    match doc.kind(id)? {
        NodeKind::Text(text) => escape_text(text, out),
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(el.tag());
            for (name, value) in el.attributes() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            let style = el.style_text();
            if !style.is_empty() {
                out.push_str(" style=\"");
                escape_attribute(&style, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.tag()) {
                return Ok(());
            }
            for &child in doc.children(id)? {
                write_node(doc, child, out)?;
            }
            out.push_str("</");
            out.push_str(el.tag());
            out.push('>');
        }
    }
    Ok(())
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// An owned copy of a subtree, detached from any document.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentNode {
    /// The node payload.
    pub kind: NodeKind,
    /// Owned children.
    pub children: Vec<FragmentNode>,
}

impl FragmentNode {
    fn capture(doc: &Document, id: NodeId) -> DocumentResult<Self> {
        let children = doc
            .children(id)?
            .iter()
            .map(|&child| Self::capture(doc, child))
            .collect::<DocumentResult<Vec<_>>>()?;
        Ok(Self {
            kind: doc.kind(id)?.clone(),
            children,
        })
    }

    fn instantiate(&self, doc: &mut Document, parent: NodeId) -> DocumentResult<()> {
        let id = doc.create(self.kind.clone());
        doc.append_child(parent, id)?;
        for child in &self.children {
            child.instantiate(doc, id)?;
        }
        Ok(())
    }
}

/// The children of a node, captured once and restorable verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSnapshot {
    markup: String,
    fragment: Vec<FragmentNode>,
}

impl MarkupSnapshot {
    /// Capture the current children of `id`.
    pub fn capture(doc: &Document, id: NodeId) -> DocumentResult<Self> {
        let fragment = doc
            .children(id)?
            .iter()
            .map(|&child| FragmentNode::capture(doc, child))
            .collect::<DocumentResult<Vec<_>>>()?;
        Ok(Self {
            markup: inner_markup(doc, id)?,
            fragment,
        })
    }

    /// The serialized markup at capture time.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Replace the children of `id` with the captured content.
    pub fn restore(&self, doc: &mut Document, id: NodeId) -> DocumentResult<()> {
        doc.clear_children(id)?;
        for node in &self.fragment {
            node.instantiate(doc, id)?;
        }
        tracing::trace!(target: "glyphsplit_core::document", ?id, bytes = self.markup.len(), "restored snapshot");
        Ok(())
    }
}
