//! glyphsplit - split rendered text into animatable wrappers.
//!
//! Splitting text into one box per character normally destroys pair kerning
//! and ligature spacing, and fragments the line structure. glyphsplit measures
//! the original text first, rebuilds the container as character, word and
//! line wrappers, then corrects the drifted gaps and regroups the lines so the
//! result looks exactly like the text it replaced.
//!
//! This is the umbrella crate; it re-exports the core document types.
//!
//! # Example
//!
//! ```
//! use glyphsplit::layout::{FlowLayout, FontMetrics, LayoutHost};
//! use glyphsplit::{Document, SplitOptions, split};
//!
//! let mut doc = Document::new();
//! let p = doc.create_element("p");
//! doc.append_text(p, "AVATAR").unwrap();
//!
//! let metrics = FontMetrics::new(16.0).with_kerning("A", "V", -1.25);
//! let mut host = FlowLayout::new(p, 320.0, metrics);
//! let text = split(&mut doc, &mut host, p, SplitOptions::new()).unwrap();
//!
//! // The "V" keeps its kerned position despite sitting in its own box.
//! let a = host.element_rect(&doc, text.result().chars[0]).unwrap();
//! let v = host.element_rect(&doc, text.result().chars[1]).unwrap();
//! assert_eq!(v.left() - a.left(), 8.0 - 1.25);
//! ```

pub use glyphsplit_core::*;

/// Measurement and the reference layout.
pub mod layout {
    pub use glyphsplit_layout::*;
}

pub mod build;
pub mod dash;
mod error;
pub mod kerning;
pub mod lines;
pub mod measure;
pub mod options;
pub mod resize;
pub mod segment;
pub mod split;

pub use error::{Result, SplitError};
pub use options::{ClassNames, DEFAULT_DEBOUNCE, DEFAULT_KERNING_THRESHOLD, SplitConfig, SplitOptions};
pub use resize::{ResizeCoordinator, ResizeState};
pub use split::{SplitResult, SplitText, split};
