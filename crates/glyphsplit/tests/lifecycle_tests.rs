//! Revert, dispose and the generated markup.

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use common::{elements_with_class, metrics, paragraph, texts};
use glyphsplit::layout::FlowLayout;
use glyphsplit::{
    Document, DocumentTreeDebug, SplitConfig, SplitError, SplitOptions, inner_markup, split,
};

fn rich_paragraph() -> (Document, glyphsplit::NodeId, FlowLayout) {
    let mut doc = Document::new();
    let body = doc.create_element("body");
    let p = doc.append_element(body, "p").unwrap();
    doc.set_attribute(p, "class", "lead").unwrap();
    doc.append_text(p, "Fish & chips,\u{00A0}").unwrap();
    let em = doc.append_element(p, "em").unwrap();
    doc.set_attribute(em, "title", "say \"please\"").unwrap();
    doc.set_style_property(em, "color", "red").unwrap();
    doc.append_text(em, "please").unwrap();
    doc.append_text(p, "  <now>\n").unwrap();
    let host = FlowLayout::new(p, 120.0, metrics());
    (doc, p, host)
}

#[test]
fn test_revert_restores_byte_identical_markup() {
    common::init_logging();
    let (mut doc, p, mut host) = rich_paragraph();
    let original = inner_markup(&doc, p).unwrap();

    let mut text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
    assert_ne!(inner_markup(&doc, p).unwrap(), original);
    assert!(doc.descendants(p).unwrap().iter().all(|&n| {
        doc.element(n).map_or(true, |el| el.tag() != "em")
    }));

    text.revert(&mut doc).unwrap();
    assert_eq!(inner_markup(&doc, p).unwrap(), original);
    assert_eq!(doc.attribute(p, "class"), Some("lead"));
    assert_eq!(doc.attribute(p, "aria-label"), None);
}

#[test]
fn test_revert_is_idempotent() {
    let (mut doc, p, mut host) = paragraph("twice over", 500.0);
    let original = inner_markup(&doc, p).unwrap();
    let mut text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();

    text.revert(&mut doc).unwrap();
    let revision = doc.revision();
    text.revert(&mut doc).unwrap();
    text.dispose();
    text.dispose();
    assert_eq!(doc.revision(), revision);
    assert_eq!(inner_markup(&doc, p).unwrap(), original);
    assert!(text.is_reverted());
}

#[test]
fn test_dispose_keeps_split_markup() {
    let (mut doc, p, mut host) = paragraph("stay split", 500.0);
    let mut text = split(&mut doc, &mut host, p, SplitOptions::new().auto_split(true)).unwrap();
    let split_markup = inner_markup(&doc, p).unwrap();

    text.dispose();
    assert!(!text.is_active());
    assert_eq!(inner_markup(&doc, p).unwrap(), split_markup);

    // Revert still works after dispose.
    text.revert(&mut doc).unwrap();
    assert_eq!(doc.text_content(p), "stay split");
}

#[test]
fn test_empty_container() {
    for content in ["", "   ", "\n\t \r\n"] {
        let (mut doc, p, mut host) = paragraph(content, 500.0);
        let original = inner_markup(&doc, p).unwrap();
        let mut text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
        let result = text.result();
        assert!(result.chars.is_empty());
        assert!(result.words.is_empty());
        assert!(result.lines.is_empty());
        text.revert(&mut doc).unwrap();
        text.dispose();
        assert_eq!(inner_markup(&doc, p).unwrap(), original);
    }
}

#[test]
fn test_invalid_container() {
    let (mut doc, p, mut host) = paragraph("x", 500.0);
    let text_node = doc.children(p).unwrap()[0];
    let err = split(&mut doc, &mut host, text_node, SplitOptions::new()).unwrap_err();
    assert!(matches!(err, SplitError::InvalidContainer { .. }));
}

#[test]
fn test_indices_are_global() {
    let (mut doc, p, mut host) = paragraph("ab cd ef", 30.0);
    let text = split(&mut doc, &mut host, p, SplitOptions::new().prop_index(true)).unwrap();
    let result = text.result();

    for (i, &c) in result.chars.iter().enumerate() {
        let el = doc.element(c).unwrap();
        assert_eq!(el.attribute("data-char-index"), Some(i.to_string().as_str()));
        assert_eq!(el.style_property("--char-index"), Some(i.to_string().as_str()));
        assert_eq!(el.attribute("aria-hidden"), Some("true"));
    }
    for (i, &w) in result.words.iter().enumerate() {
        let el = doc.element(w).unwrap();
        assert_eq!(el.attribute("data-word-index"), Some(i.to_string().as_str()));
    }
    assert_eq!(result.lines.len(), 3);
    assert_eq!(elements_with_class(&doc, p, "split-char"), result.chars);
}

#[test]
fn test_custom_classes_from_config() {
    let config = SplitConfig::from_toml_str(
        r#"
        char_class = "glyph"
        word_class = "token"
        line_class = "row"
        will_change = true
        "#,
    )
    .unwrap();
    let (mut doc, p, mut host) = paragraph("hi there", 500.0);
    let text = split(&mut doc, &mut host, p, config.into_options()).unwrap();

    assert_eq!(elements_with_class(&doc, p, "glyph"), text.result().chars);
    assert_eq!(elements_with_class(&doc, p, "token"), text.result().words);
    assert_eq!(elements_with_class(&doc, p, "row"), text.result().lines);
    let first = doc.element(text.result().chars[0]).unwrap();
    assert_eq!(first.style_property("will-change"), Some("transform, opacity"));
}

#[test]
fn test_fonts_not_ready_still_splits() {
    let (mut doc, p, mut host) = paragraph("early bird", 500.0);
    host.set_fonts_ready(false);
    let text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
    assert_eq!(texts(&doc, &text.result().words), vec!["early", "bird"]);
}

/// Collects formatted log output.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_rebuilt_trees_are_traced() {
    let capture = Capture::default();
    let sink = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("glyphsplit=trace")
        .with_ansi(false)
        .with_writer(move || sink.clone())
        .finish();

    let (mut doc, p, mut host) = paragraph("ok go", 500.0);
    tracing::subscriber::with_default(subscriber, || {
        split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
    });

    let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("stage=\"words\""));
    assert!(output.contains("stage=\"lines\""));
    assert!(output.contains("class=\"split-line\""));
    assert!(output.contains("\"o\""));
}

#[test]
fn test_tree_dump_after_split() {
    let (mut doc, p, mut host) = paragraph("ok", 500.0);
    split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
    let dump = DocumentTreeDebug::new().format_subtree(&doc, p).unwrap();
    assert!(dump.contains("split-line"));
    assert!(dump.contains("split-word"));
    assert!(dump.contains("\"o\""));
}
