//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use glyphsplit::layout::{FlowLayout, FontMetrics, LayoutHost};
use glyphsplit::{Document, NodeId, SplitResult};

/// Install a test log subscriber once per test binary.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("glyphsplit=trace,glyphsplit_core=debug")
        .with_test_writer()
        .try_init();
}

/// 10 unit glyphs, 5 unit spaces, 12 unit lines and a few kerning pairs.
pub fn metrics() -> FontMetrics {
    FontMetrics::new(10.0)
        .with_default_advance(10.0)
        .with_space_advance(5.0)
        .with_line_height(12.0)
        .with_kerning("A", "V", -2.0)
        .with_kerning("V", "A", -1.5)
        .with_kerning("T", "o", -1.25)
        .with_kerning("W", "a", -0.75)
        .with_kerning("f", "f", 0.5)
}

/// `<body><p>{text}</p></body>` with a host laid out at `width`.
pub fn paragraph(text: &str, width: f32) -> (Document, NodeId, FlowLayout) {
    let mut doc = Document::new();
    let body = doc.create_element("body");
    let p = doc.append_element(body, "p").expect("append p");
    doc.append_text(p, text).expect("append text");
    let host = FlowLayout::new(p, width, metrics());
    (doc, p, host)
}

/// Left edges of elements.
pub fn lefts(doc: &Document, host: &mut FlowLayout, nodes: &[NodeId]) -> Vec<f32> {
    nodes
        .iter()
        .map(|&n| host.element_rect(doc, n).expect("laid out").left())
        .collect()
}

/// Top edges of elements.
pub fn tops(doc: &Document, host: &mut FlowLayout, nodes: &[NodeId]) -> Vec<f32> {
    nodes
        .iter()
        .map(|&n| host.element_rect(doc, n).expect("laid out").top())
        .collect()
}

/// Text of each node.
pub fn texts(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|&n| doc.text_content(n)).collect()
}

/// Elements under `root` carrying `class`, in document order.
pub fn elements_with_class(doc: &Document, root: NodeId, class: &str) -> Vec<NodeId> {
    doc.descendants(root)
        .expect("live root")
        .into_iter()
        .filter(|&n| doc.element(n).is_ok_and(|el| el.has_class(class)))
        .collect()
}

/// Word wrappers of each line wrapper.
pub fn words_per_line(doc: &Document, result: &SplitResult) -> Vec<Vec<NodeId>> {
    result
        .lines
        .iter()
        .map(|&line| {
            doc.children(line)
                .expect("live line")
                .iter()
                .copied()
                .filter(|&n| doc.is_element(n))
                .collect()
        })
        .collect()
}
