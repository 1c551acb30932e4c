//! Core systems for glyphsplit.
//!
//! This crate provides the host-independent building blocks the split engine
//! runs on:
//!
//! - **Document**: an arena node tree with elements, text nodes and inline style
//! - **Markup**: serialization and restorable snapshots of a node's content
//! - **Timers**: one-shot timers on an explicit clock
//! - **Signals**: slot connections with synchronous emission
//! - **Completions**: one-shot resolver/observer pairs
//!
//! # Example
//!
//! ```
//! use glyphsplit_core::{Document, MarkupSnapshot, inner_markup};
//!
//! let mut doc = Document::new();
//! let p = doc.create_element("p");
//! doc.append_text(p, "Hello & goodbye").unwrap();
//!
//! let snapshot = MarkupSnapshot::capture(&doc, p).unwrap();
//! doc.clear_children(p).unwrap();
//! snapshot.restore(&mut doc, p).unwrap();
//!
//! assert_eq!(inner_markup(&doc, p).unwrap(), "Hello &amp; goodbye");
//! ```

pub mod completion;
pub mod document;
mod error;
pub mod logging;
pub mod markup;
pub mod signal;
pub mod timer;

pub use completion::{Completion, CompletionHandle, CompletionState, completion_pair};
pub use document::{Document, Element, NodeId, NodeKind};
pub use error::{DocumentError, DocumentResult, TimerError, TimerResult};
pub use logging::{DocumentTreeDebug, PerfSpan};
pub use markup::{FragmentNode, MarkupSnapshot, inner_markup};
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerManager};
