//! Geometry and measurement for glyphsplit.
//!
//! The split engine measures everything through the [`LayoutHost`] trait.
//! Embedders implement it on top of their own layout engine. [`FlowLayout`]
//! is a deterministic implementation that lays out a single container with a
//! fixed-advance font model, used for testing and headless runs.

pub mod flow;
pub mod geometry;
pub mod host;
pub mod metrics;
pub mod style;

pub use flow::FlowLayout;
pub use geometry::{Point, Rect, Size};
pub use host::{LayoutHost, TextRange};
pub use metrics::FontMetrics;
pub use style::Display;
