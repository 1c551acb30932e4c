//! The split entry point and the handle it returns.
//!
//! [`split`] runs the whole pipeline once: segment, measure, build wrappers,
//! compensate kerning, detect lines. The returned [`SplitText`] owns
//! everything needed afterwards: the original markup snapshot, the resize
//! coordinator and the completion that triggers an automatic revert.
//!
//! The engine is single-threaded and host-driven. A host that enables
//! `auto_split` forwards size notifications for [`SplitText::observed_node`],
//! calls [`SplitText::poll`] from its event loop and
//! [`SplitText::on_animation_frame`] once per rendered frame.
//!
//! # Example
//!
//! ```
//! use glyphsplit::layout::{FlowLayout, FontMetrics};
//! use glyphsplit::{Document, SplitOptions, split};
//!
//! let mut doc = Document::new();
//! let body = doc.create_element("body");
//! let title = doc.append_element(body, "h1").unwrap();
//! doc.append_text(title, "Hello there").unwrap();
//!
//! let mut host = FlowLayout::new(title, 400.0, FontMetrics::default());
//! let mut text = split(&mut doc, &mut host, title, SplitOptions::new()).unwrap();
//! assert_eq!(text.result().words.len(), 2);
//! assert_eq!(text.result().chars.len(), 10);
//! assert_eq!(text.result().text(&doc), "Hello there");
//!
//! text.revert(&mut doc).unwrap();
//! assert_eq!(doc.text_content(title), "Hello there");
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use glyphsplit_core::{
    Completion, CompletionState, Document, DocumentTreeDebug, MarkupSnapshot, NodeId, PerfSpan,
    Signal,
};
use glyphsplit_layout::LayoutHost;

use crate::error::{Result, SplitError};
use crate::options::SplitOptions;
use crate::resize::{ResizeCoordinator, ResizeState};
use crate::{build, kerning, lines, measure, segment};

/// The wrappers produced by a split, in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitResult {
    /// Character wrappers.
    pub chars: Vec<NodeId>,
    /// Word wrappers.
    pub words: Vec<NodeId>,
    /// Line wrappers.
    pub lines: Vec<NodeId>,
    /// The host's reduced motion preference, sampled once at split time.
    pub prefers_reduced_motion: bool,
    continuations: Vec<bool>,
}

impl SplitResult {
    fn empty(prefers_reduced_motion: bool) -> Self {
        Self {
            prefers_reduced_motion,
            ..Default::default()
        }
    }

    /// Whether nothing was split.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether word `index` continues the previous one after a forced break.
    pub fn is_continuation(&self, index: usize) -> bool {
        self.continuations.get(index).copied().unwrap_or(false)
    }

    /// Reconstruct the visible text from the word wrappers.
    ///
    /// Words are joined by single spaces, except before continuations.
    pub fn text(&self, doc: &Document) -> String {
        let mut out = String::new();
        for (index, &word) in self.words.iter().enumerate() {
            if index > 0 && !self.is_continuation(index) {
                out.push(' ');
            }
            out.push_str(&doc.text_content(word));
        }
        out
    }
}

/// A split container.
///
/// Reverting restores the original markup; disposing only stops resize
/// tracking and the pending auto-revert. Both are idempotent.
#[derive(Debug)]
pub struct SplitText {
    container: NodeId,
    options: SplitOptions,
    result: SplitResult,
    snapshot: Option<MarkupSnapshot>,
    added_label: bool,
    observed: Option<NodeId>,
    resize: Option<ResizeCoordinator>,
    resized: Signal<SplitResult>,
    revert_on_complete: Option<Completion>,
    reverted: bool,
    disposed: bool,
}

/// Split the text of `container` into character, word and line wrappers.
///
/// Fails only when `container` is not a live element. Empty content yields
/// an inert handle with an empty result.
#[tracing::instrument(skip(doc, host, options), target = "glyphsplit::split", level = "debug")]
pub fn split<H: LayoutHost + ?Sized>(
    doc: &mut Document,
    host: &mut H,
    container: NodeId,
    options: SplitOptions,
) -> Result<SplitText> {
    if !doc.contains(container) {
        return Err(SplitError::invalid_container(container, "node does not exist"));
    }
    if !doc.is_element(container) {
        return Err(SplitError::invalid_container(container, "node is not an element"));
    }

    let reduced_motion = host.prefers_reduced_motion();
    if !host.fonts_ready() {
        tracing::warn!(
            target: "glyphsplit::split",
            "fonts are not ready; positions will be measured with fallback metrics"
        );
    }
    if options.on_resize.is_some() && !options.auto_split {
        tracing::warn!(target: "glyphsplit::split", "on_resize has no effect without auto_split");
    }

    let label = segment::collapse_whitespace(&doc.text_content(container));
    if label.is_empty() {
        tracing::warn!(target: "glyphsplit::split", "container has no text to split");
        return Ok(SplitText::inert(container, options, reduced_motion));
    }

    let revert_on_complete = match options.revert_on_complete.clone() {
        Some(completion) if completion.is_abandoned() => {
            tracing::warn!(
                target: "glyphsplit::split",
                "revert_on_complete can never resolve; ignoring it"
            );
            None
        }
        other => other,
    };

    let snapshot = MarkupSnapshot::capture(doc, container)?;
    let added_label = doc.attribute(container, "aria-label").is_none();
    if added_label {
        doc.set_attribute(container, "aria-label", &label)?;
    }

    let result = match run_pipeline(doc, host, container, &options, reduced_motion) {
        Ok(result) => result,
        Err(err) => {
            // Leave the tree as it was found.
            snapshot.restore(doc, container)?;
            if added_label {
                doc.remove_attribute(container, "aria-label")?;
            }
            return Err(err);
        }
    };

    let mut observed = None;
    let mut resize = None;
    if options.auto_split {
        match doc.parent(container)? {
            Some(parent) => {
                observed = Some(parent);
                resize = Some(ResizeCoordinator::new(options.debounce));
            }
            None => tracing::warn!(
                target: "glyphsplit::split",
                "auto_split needs a parent element to observe; resize tracking disabled"
            ),
        }
    }

    let resized = Signal::new();
    if let Some(callback) = &options.on_resize {
        let callback = Arc::clone(callback);
        resized.connect(move |result: &SplitResult| callback(result));
    }

    tracing::debug!(
        target: "glyphsplit::split",
        chars = result.chars.len(),
        words = result.words.len(),
        lines = result.lines.len(),
        reduced_motion,
        "split complete"
    );

    Ok(SplitText {
        container,
        options,
        result,
        snapshot: Some(snapshot),
        added_label,
        observed,
        resize,
        resized,
        revert_on_complete,
        reverted: false,
        disposed: false,
    })
}

/// Segment, measure, build, compensate and group lines.
fn run_pipeline<H: LayoutHost + ?Sized>(
    doc: &mut Document,
    host: &mut H,
    container: NodeId,
    options: &SplitOptions,
    reduced_motion: bool,
) -> Result<SplitResult> {
    let _perf = PerfSpan::new("split_pipeline");

    let sources = segment::segment_words(doc, container);
    let measured = measure::measure_words(doc, host, &sources);
    let mut words = build::build_words(doc, container, &measured, options)?;
    trace_tree(doc, container, "words");
    kerning::compensate(doc, host, &mut words, options.kerning_threshold)?;
    let lines = lines::detect_lines(doc, host, container, &words, options)?;
    trace_tree(doc, container, "lines");

    Ok(SplitResult {
        chars: words.iter().flat_map(|w| w.chars.iter().copied()).collect(),
        continuations: words.iter().map(|w| w.no_space_before).collect(),
        words: words.iter().map(|w| w.node).collect(),
        lines,
        prefers_reduced_motion: reduced_motion,
    })
}

fn trace_tree(doc: &Document, container: NodeId, stage: &'static str) {
    if !tracing::enabled!(target: "glyphsplit::split", tracing::Level::TRACE) {
        return;
    }
    let dump = DocumentTreeDebug::new()
        .attributes(stage != "words")
        .format_subtree(doc, container);
    match dump {
        Ok(tree) => tracing::trace!(target: "glyphsplit::split", stage, "rebuilt tree\n{tree}"),
        Err(err) => {
            tracing::trace!(target: "glyphsplit::split", stage, error = %err, "tree dump failed");
        }
    }
}

impl SplitText {
    fn inert(container: NodeId, options: SplitOptions, reduced_motion: bool) -> Self {
        Self {
            container,
            options,
            result: SplitResult::empty(reduced_motion),
            snapshot: None,
            added_label: false,
            observed: None,
            resize: None,
            resized: Signal::new(),
            revert_on_complete: None,
            reverted: false,
            disposed: false,
        }
    }

    /// The current result. Replaced wholesale by every resplit.
    pub fn result(&self) -> &SplitResult {
        &self.result
    }

    /// The split container.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The options the split was made with.
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Whether resize observation is live.
    pub fn is_active(&self) -> bool {
        !self.disposed && self.resize.as_ref().is_some_and(ResizeCoordinator::is_active)
    }

    /// Whether [`revert`](Self::revert) has run.
    pub fn is_reverted(&self) -> bool {
        self.reverted
    }

    /// The element whose size changes the host should report, while active.
    pub fn observed_node(&self) -> Option<NodeId> {
        self.observed.filter(|_| self.is_active())
    }

    /// Current resize state, if resize tracking is enabled.
    pub fn resize_state(&self) -> Option<ResizeState> {
        self.resize.as_ref().map(ResizeCoordinator::state)
    }

    /// Emitted with the new result after every resize-driven resplit.
    pub fn resized(&self) -> &Signal<SplitResult> {
        &self.resized
    }

    /// Report the observed element's size. Returns whether it counted as a
    /// width change.
    pub fn notify_resize(&mut self, width: f32, height: f32, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        self.resize
            .as_mut()
            .is_some_and(|resize| resize.notify(width, height, now))
    }

    /// How long the host may wait before the next [`poll`](Self::poll) matters.
    pub fn time_until_next_poll(&mut self, now: Instant) -> Option<Duration> {
        if self.disposed {
            return None;
        }
        self.resize.as_mut().and_then(|resize| resize.time_until_next(now))
    }

    /// Whether a resplit is waiting for [`on_animation_frame`](Self::on_animation_frame).
    pub fn needs_frame(&self) -> bool {
        !self.disposed && self.resize.as_ref().is_some_and(ResizeCoordinator::wants_frame)
    }

    /// Drive timers and the auto-revert completion.
    ///
    /// When the debounce expires the original markup is restored so the host
    /// can lay out the plain text during the next frame.
    pub fn poll(&mut self, doc: &mut Document, now: Instant) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        if let Some(completion) = &self.revert_on_complete {
            match completion.state() {
                CompletionState::Resolved => {
                    tracing::debug!(target: "glyphsplit::split", "completion resolved; reverting");
                    return self.revert(doc);
                }
                CompletionState::Abandoned => {
                    tracing::warn!(
                        target: "glyphsplit::split",
                        "revert_on_complete was dropped without resolving; auto-revert disabled"
                    );
                    self.revert_on_complete = None;
                }
                CompletionState::Pending => {}
            }
        }

        let started = self.resize.as_mut().is_some_and(|resize| resize.poll(now));
        if started && let Some(snapshot) = &self.snapshot {
            snapshot.restore(doc, self.container)?;
            tracing::trace!(target: "glyphsplit::resize", "original markup restored for resplit");
        }
        Ok(())
    }

    /// Finish a pending resplit. Returns whether a resplit ran.
    ///
    /// Does nothing unless a cycle is waiting for its frame, which also makes
    /// a frame that arrives after [`dispose`](Self::dispose) harmless.
    #[tracing::instrument(skip_all, target = "glyphsplit::resize", level = "debug")]
    pub fn on_animation_frame<H: LayoutHost + ?Sized>(
        &mut self,
        doc: &mut Document,
        host: &mut H,
    ) -> Result<bool> {
        if self.disposed {
            return Ok(false);
        }
        let Some(resize) = self.resize.as_mut() else {
            return Ok(false);
        };
        if !resize.wants_frame() {
            return Ok(false);
        }

        let outcome = run_pipeline(
            doc,
            host,
            self.container,
            &self.options,
            self.result.prefers_reduced_motion,
        );
        resize.finish();
        self.complete_resplit(doc, outcome)
    }

    fn complete_resplit(
        &mut self,
        doc: &mut Document,
        outcome: Result<SplitResult>,
    ) -> Result<bool> {
        self.result = match outcome {
            Ok(result) => result,
            Err(err) => {
                // A partial rebuild is replaced by the plain original markup.
                if let Some(snapshot) = &self.snapshot {
                    snapshot.restore(doc, self.container)?;
                }
                self.result = SplitResult::empty(self.result.prefers_reduced_motion);
                tracing::warn!(
                    target: "glyphsplit::resize",
                    error = %err,
                    "resplit failed; original markup restored"
                );
                return Err(err);
            }
        };

        tracing::debug!(
            target: "glyphsplit::resize",
            chars = self.result.chars.len(),
            words = self.result.words.len(),
            lines = self.result.lines.len(),
            "resplit complete"
        );
        self.resized.emit(self.result.clone());
        Ok(true)
    }

    /// Restore the original markup and dispose.
    ///
    /// Removes the `aria-label` only if the split added it. Calling it again
    /// does nothing.
    pub fn revert(&mut self, doc: &mut Document) -> Result<()> {
        if self.reverted {
            return Ok(());
        }
        self.reverted = true;
        self.dispose();

        if let Some(snapshot) = &self.snapshot {
            snapshot.restore(doc, self.container)?;
        }
        if self.added_label {
            doc.remove_attribute(self.container, "aria-label")?;
        }
        self.result = SplitResult::empty(self.result.prefers_reduced_motion);
        tracing::debug!(target: "glyphsplit::split", "reverted");
        Ok(())
    }

    /// Stop resize tracking and drop the auto-revert completion. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(resize) = self.resize.as_mut() {
            resize.dispose();
        }
        self.resized.disconnect_all();
        self.revert_on_complete = None;
        tracing::debug!(target: "glyphsplit::split", "disposed");
    }
}
