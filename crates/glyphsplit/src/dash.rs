//! Forced word breaks after dashes.
//!
//! An em or en dash ends its word. The remainder becomes a continuation word
//! that is placed without a leading space but may wrap on its own, so
//! `"a—b"` behaves like `"a—"` followed by `"b"` glued together.

/// EM DASH.
pub const EM_DASH: char = '\u{2014}';
/// EN DASH.
pub const EN_DASH: char = '\u{2013}';

/// Whether a word must end after `grapheme`.
pub fn is_forced_break(grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    matches!(chars.next(), Some(EM_DASH | EN_DASH))
}

/// Split `items` after every forced break.
///
/// Returns the pieces with a flag marking continuations (every piece after
/// the first). A trailing dash does not produce an empty piece.
pub fn split_forced_breaks<T>(items: Vec<T>, text: impl Fn(&T) -> &str) -> Vec<(Vec<T>, bool)> {
    let mut pieces = Vec::new();
    let mut current = Vec::new();
    let mut continuation = false;
    for item in items {
        let breaks = is_forced_break(text(&item));
        current.push(item);
        if breaks {
            pieces.push((std::mem::take(&mut current), continuation));
            continuation = true;
        }
    }
    if !current.is_empty() {
        pieces.push((current, continuation));
    }
    pieces
}
