//! Node tree for glyphsplit.
//!
//! Provides the arena-backed tree the split engine mutates:
//! - Stable node identifiers via `slotmap`
//! - Elements with ordered attributes and inline style declarations
//! - Text nodes
//! - A revision counter bumped on every mutation, so layout hosts can cache
//!   measurements until the tree changes
//!
//! # Example
//!
//! ```
//! use glyphsplit_core::Document;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("p");
//! doc.append_text(root, "Hello ").unwrap();
//! let em = doc.append_element(root, "em").unwrap();
//! doc.append_text(em, "world").unwrap();
//!
//! assert_eq!(doc.text_content(root), "Hello world");
//! assert_eq!(doc.text_nodes(root).len(), 2);
//! ```

use slotmap::{SlotMap, new_key_type};

use crate::error::{DocumentError, DocumentResult};

new_key_type! {
    /// A unique identifier for a node in a [`Document`].
    ///
    /// IDs stay valid while the node is alive, including across moves between
    /// parents. They become invalid once the node is removed.
    pub struct NodeId;
}

/// An element node: tag name, attributes and inline style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
}

impl Element {
    /// Create an element with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            style: Vec::new(),
        }
    }

    /// The lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value.
    ///
    /// Inline style lives in its own declaration list, see [`style_property`](Self::style_property).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any previous value in place.
    ///
    /// Setting `style` replaces all inline declarations.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if name == "style" {
            self.style = parse_declarations(&value);
            return;
        }
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        if name == "style" {
            let text = self.style_text();
            self.style.clear();
            return (!text.is_empty()).then_some(text);
        }
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Iterate over attributes in insertion order, excluding `style`.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Look up an inline style declaration.
    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style declaration, replacing any previous value in place.
    pub fn set_style_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.style.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.style.push((name, value)),
        }
    }

    /// Remove an inline style declaration, returning its previous value.
    pub fn remove_style_property(&mut self, name: &str) -> Option<String> {
        let index = self.style.iter().position(|(n, _)| n == name)?;
        Some(self.style.remove(index).1)
    }

    /// Iterate over inline style declarations in order.
    pub fn style_declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The inline style serialized as `name: value; name: value`.
    pub fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(n, v)| format!("{n}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Split a `style` attribute into declarations.
fn parse_declarations(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An element with children.
    Element(Element),
    /// A run of character data.
    Text(String),
}

/// Internal data stored in the arena for each node.
#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An arena of nodes forming one or more trees.
///
/// Nodes are created detached and attached with [`append_child`](Self::append_child).
/// Removing a node removes its whole subtree.
#[derive(Debug, Default)]
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    revision: u64,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            revision: 0,
        }
    }

    /// Monotonic counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create(NodeKind::Element(Element::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create(NodeKind::Text(text.to_string()))
    }

    /// Create a detached node from a payload.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.insert(NodeData::new(kind));
        self.touch();
        tracing::trace!(target: "glyphsplit_core::document", ?id, "created node");
        id
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> DocumentResult<NodeId> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> DocumentResult<NodeId> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Check whether a node is alive.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` is a live element.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(NodeData { kind: NodeKind::Element(_), .. }))
    }

    /// The payload of a node.
    pub fn kind(&self, id: NodeId) -> DocumentResult<&NodeKind> {
        self.nodes
            .get(id)
            .map(|d| &d.kind)
            .ok_or(DocumentError::InvalidNodeId)
    }

    /// Borrow an element.
    pub fn element(&self, id: NodeId) -> DocumentResult<&Element> {
        match self.kind(id)? {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DocumentError::NotAnElement),
        }
    }

    /// Mutably borrow an element. Counts as a mutation.
    pub fn element_mut(&mut self, id: NodeId) -> DocumentResult<&mut Element> {
        self.touch();
        match self.nodes.get_mut(id).map(|d| &mut d.kind) {
            Some(NodeKind::Element(el)) => Ok(el),
            Some(NodeKind::Text(_)) => Err(DocumentError::NotAnElement),
            None => Err(DocumentError::InvalidNodeId),
        }
    }

    /// Borrow the data of a text node.
    pub fn text(&self, id: NodeId) -> DocumentResult<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Ok(text),
            NodeKind::Element(_) => Err(DocumentError::NotAText),
        }
    }

    /// Look up an attribute of an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|el| el.attribute(name))
    }

    /// Set an attribute on an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DocumentResult<()> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DocumentResult<Option<String>> {
        Ok(self.element_mut(id)?.remove_attribute(name))
    }

    /// Set an inline style declaration on an element.
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) -> DocumentResult<()> {
        self.element_mut(id)?.set_style_property(name, value);
        Ok(())
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> DocumentResult<Option<NodeId>> {
        self.nodes
            .get(id)
            .map(|d| d.parent)
            .ok_or(DocumentError::InvalidNodeId)
    }

    /// Get the children of a node.
    pub fn children(&self, id: NodeId) -> DocumentResult<&[NodeId]> {
        self.nodes
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(DocumentError::InvalidNodeId)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DocumentResult<()> {
        if !self.nodes.contains_key(child) {
            return Err(DocumentError::InvalidNodeId);
        }
        match self.nodes.get(parent).map(|d| &d.kind) {
            Some(NodeKind::Element(_)) => {}
            Some(NodeKind::Text(_)) => return Err(DocumentError::NotAnElement),
            None => return Err(DocumentError::InvalidNodeId),
        }
        if self.is_ancestor_of(child, parent) {
            return Err(DocumentError::CircularParentage);
        }

        self.detach(child)?;
        if let Some(data) = self.nodes.get_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.nodes.get_mut(parent) {
            data.children.push(child);
        }
        self.touch();
        Ok(())
    }

    /// Remove a node from its parent, keeping it (and its subtree) alive.
    pub fn detach(&mut self, id: NodeId) -> DocumentResult<()> {
        let old_parent = self
            .nodes
            .get(id)
            .ok_or(DocumentError::InvalidNodeId)?
            .parent;
        if let Some(parent_id) = old_parent {
            if let Some(parent_data) = self.nodes.get_mut(parent_id) {
                parent_data.children.retain(|&c| c != id);
            }
            if let Some(data) = self.nodes.get_mut(id) {
                data.parent = None;
            }
            self.touch();
        }
        Ok(())
    }

    /// Remove a node and its whole subtree from the document.
    pub fn remove(&mut self, id: NodeId) -> DocumentResult<()> {
        self.detach(id)?;
        let doomed = self.descendants(id)?;
        tracing::trace!(target: "glyphsplit_core::document", ?id, count = doomed.len(), "removing subtree");
        for node in doomed {
            self.nodes.remove(node);
        }
        self.touch();
        Ok(())
    }

    /// Remove every child of `id` (and their subtrees).
    pub fn clear_children(&mut self, id: NodeId) -> DocumentResult<()> {
        let children = self.children(id)?.to_vec();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    fn is_ancestor_of(&self, potential_ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Pre-order traversal of the subtree rooted at `id`, including `id`.
    pub fn descendants(&self, id: NodeId) -> DocumentResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.preorder_into(id, &mut result)?;
        Ok(result)
    }

    fn preorder_into(&self, id: NodeId, result: &mut Vec<NodeId>) -> DocumentResult<()> {
        let data = self.nodes.get(id).ok_or(DocumentError::InvalidNodeId)?;
        result.push(id);
        for &child in &data.children {
            self.preorder_into(child, result)?;
        }
        Ok(())
    }

    /// Text nodes under `id` in document order.
    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .unwrap_or_default()
            .into_iter()
            .filter(|&n| matches!(self.kind(n), Ok(NodeKind::Text(_))))
            .collect()
    }

    /// Concatenated text of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.text_nodes(id)
            .into_iter()
            .filter_map(|n| self.text(n).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("DIV");
        doc.append_text(root, "one ").unwrap();
        let em = doc.append_element(root, "em").unwrap();
        doc.append_text(em, "two").unwrap();
        doc.append_text(root, " three").unwrap();
        (doc, root)
    }

    #[test]
    fn test_tag_is_lowercased() {
        let (doc, root) = sample();
        assert_eq!(doc.element(root).unwrap().tag(), "div");
    }

    #[test]
    fn test_text_content_in_document_order() {
        let (doc, root) = sample();
        assert_eq!(doc.text_content(root), "one two three");
        assert_eq!(doc.text_nodes(root).len(), 3);
    }

    #[test]
    fn test_append_moves_between_parents() {
        let (mut doc, root) = sample();
        let other = doc.create_element("p");
        let first = doc.children(root).unwrap()[0];
        doc.append_child(other, first).unwrap();
        assert_eq!(doc.parent(first).unwrap(), Some(other));
        assert_eq!(doc.children(root).unwrap().len(), 2);
    }

    #[test]
    fn test_circular_append_rejected() {
        let (mut doc, root) = sample();
        let em = doc.children(root).unwrap()[1];
        assert_eq!(doc.append_child(em, root), Err(DocumentError::CircularParentage));
    }

    #[test]
    fn test_append_to_text_rejected() {
        let (mut doc, root) = sample();
        let text = doc.children(root).unwrap()[0];
        let child = doc.create_element("span");
        assert_eq!(doc.append_child(text, child), Err(DocumentError::NotAnElement));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (mut doc, root) = sample();
        let before = doc.node_count();
        let em = doc.children(root).unwrap()[1];
        doc.remove(em).unwrap();
        assert_eq!(doc.node_count(), before - 2);
        assert!(!doc.contains(em));
        assert_eq!(doc.text_content(root), "one  three");
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let (mut doc, root) = sample();
        let before = doc.revision();
        doc.set_style_property(root, "margin-left", "1px").unwrap();
        assert!(doc.revision() > before);
        let after = doc.revision();
        let _ = doc.text_content(root);
        assert_eq!(doc.revision(), after);
    }

    #[test]
    fn test_style_attribute_round_trip() {
        let mut el = Element::new("span");
        el.set_attribute("style", "display: inline-block;margin-left:2px");
        assert_eq!(el.style_property("display"), Some("inline-block"));
        assert_eq!(el.style_property("margin-left"), Some("2px"));
        el.set_style_property("margin-left", "3px");
        assert_eq!(el.style_text(), "display: inline-block; margin-left: 3px");
        assert_eq!(el.remove_style_property("display").as_deref(), Some("inline-block"));
    }

    #[test]
    fn test_has_class() {
        let mut el = Element::new("span");
        el.set_attribute("class", "split-word  extra");
        assert!(el.has_class("split-word"));
        assert!(el.has_class("extra"));
        assert!(!el.has_class("split"));
    }
}
