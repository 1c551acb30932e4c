//! Resize-driven resplitting.
//!
//! [`ResizeCoordinator`] decides *when* a resplit happens; the split handle
//! performs it. The host feeds it size notifications for the observed parent,
//! polls it from its event loop and reports animation frames.
//!
//! ```text
//!   Idle ──width change──▶ Pending ──debounce expired──▶ Resplitting
//!    ▲                      │  ▲                              │
//!    │                      └──┘ width change                 │
//!    │                           restarts the timer           │
//!    └─────────────── cycle finished (no change queued) ──────┘
//! ```
//!
//! The first notification after observation starts only records the
//! baseline width. Height-only changes are ignored. A width change during
//! Resplitting is remembered and sends the machine back to Pending once the
//! cycle completes, so cycles never overlap.

use std::time::{Duration, Instant};

use glyphsplit_core::{TimerId, TimerManager};

/// Current state of a resize coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ResizeState {
    /// Observing, nothing scheduled.
    #[default]
    Idle,
    /// A width change was seen; waiting for the debounce timer.
    Pending {
        /// The running debounce timer.
        timer: TimerId,
    },
    /// Markup has been restored; waiting for a frame to re-measure.
    Resplitting,
}

impl std::fmt::Display for ResizeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Pending { .. } => write!(f, "Pending"),
            Self::Resplitting => write!(f, "Resplitting"),
        }
    }
}

/// Debounced width tracking for one observed element.
#[derive(Debug)]
pub struct ResizeCoordinator {
    state: ResizeState,
    debounce: Duration,
    timers: TimerManager,
    last_width: Option<f32>,
    /// Time of the latest qualifying change seen while Resplitting.
    queued: Option<Instant>,
    active: bool,
}

impl ResizeCoordinator {
    /// Start observing with the given debounce window.
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: ResizeState::Idle,
            debounce,
            timers: TimerManager::new(),
            last_width: None,
            queued: None,
            active: true,
        }
    }

    /// The current state.
    pub fn state(&self) -> ResizeState {
        self.state
    }

    /// Whether observation is live.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The debounce window.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Feed a size notification. Returns whether it counted as a width change.
    pub fn notify(&mut self, width: f32, height: f32, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        let Some(last) = self.last_width else {
            self.last_width = Some(width);
            tracing::trace!(target: "glyphsplit::resize", width, height, "initial size recorded");
            return false;
        };
        if last == width {
            tracing::trace!(target: "glyphsplit::resize", width, height, "ignoring non-width change");
            return false;
        }
        self.last_width = Some(width);

        match self.state {
            ResizeState::Idle => self.schedule(now),
            ResizeState::Pending { timer } => {
                if self.timers.stop(timer).is_err() {
                    tracing::trace!(target: "glyphsplit::resize", "debounce timer already gone");
                }
                self.schedule(now);
            }
            ResizeState::Resplitting => {
                self.queued = Some(now);
                tracing::trace!(target: "glyphsplit::resize", width, "queued change during resplit");
            }
        }
        true
    }

    fn schedule(&mut self, from: Instant) {
        let timer = self.timers.start_one_shot(from, self.debounce);
        self.state = ResizeState::Pending { timer };
        tracing::trace!(target: "glyphsplit::resize", ?timer, "debounce timer started");
    }

    /// Fire expired timers. Returns `true` when the machine enters Resplitting.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        let expired = self.timers.process_expired(now);
        match self.state {
            ResizeState::Pending { timer } if expired.contains(&timer) => {
                self.state = ResizeState::Resplitting;
                tracing::debug!(target: "glyphsplit::resize", width = ?self.last_width, "resplit cycle started");
                true
            }
            _ => false,
        }
    }

    /// Time until the debounce timer fires, if one is running.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        if !self.active {
            return None;
        }
        self.timers.time_until_next(now)
    }

    /// Whether a frame should be delivered to finish a cycle.
    pub fn wants_frame(&self) -> bool {
        self.active && self.state == ResizeState::Resplitting
    }

    /// Finish a Resplitting cycle.
    ///
    /// A change queued during the cycle restarts the debounce from the time it
    /// was seen.
    pub fn finish(&mut self) {
        if self.state != ResizeState::Resplitting {
            return;
        }
        match self.queued.take() {
            Some(at) if self.active => self.schedule(at),
            _ => self.state = ResizeState::Idle,
        }
        tracing::debug!(target: "glyphsplit::resize", state = %self.state, "resplit cycle finished");
    }

    /// Stop observing and cancel anything scheduled. Idempotent.
    pub fn dispose(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.timers.clear();
        self.queued = None;
        self.state = ResizeState::Idle;
        tracing::debug!(target: "glyphsplit::resize", "resize observation stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(150);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_notification_suppressed() {
        let t0 = Instant::now();
        let mut coordinator = ResizeCoordinator::new(DEBOUNCE);
        assert!(!coordinator.notify(400.0, 100.0, t0));
        assert_eq!(coordinator.state(), ResizeState::Idle);
        assert!(coordinator.notify(300.0, 100.0, t0));
        assert!(matches!(coordinator.state(), ResizeState::Pending { .. }));
    }

    #[test]
    fn test_height_only_ignored() {
        let t0 = Instant::now();
        let mut coordinator = ResizeCoordinator::new(DEBOUNCE);
        coordinator.notify(400.0, 100.0, t0);
        assert!(!coordinator.notify(400.0, 250.0, t0));
        assert_eq!(coordinator.state(), ResizeState::Idle);
    }

    #[test]
    fn test_debounce_restarts() {
        let t0 = Instant::now();
        let mut coordinator = ResizeCoordinator::new(DEBOUNCE);
        coordinator.notify(400.0, 100.0, t0);
        coordinator.notify(390.0, 100.0, t0);
        coordinator.notify(380.0, 100.0, t0 + ms(100));
        assert!(!coordinator.poll(t0 + ms(200)));
        assert_eq!(coordinator.time_until_next(t0 + ms(200)), Some(ms(50)));
        assert!(coordinator.poll(t0 + ms(250)));
        assert_eq!(coordinator.state(), ResizeState::Resplitting);
        assert!(coordinator.wants_frame());
    }

    #[test]
    fn test_change_during_resplit_is_queued() {
        let t0 = Instant::now();
        let mut coordinator = ResizeCoordinator::new(DEBOUNCE);
        coordinator.notify(400.0, 100.0, t0);
        coordinator.notify(300.0, 100.0, t0);
        assert!(coordinator.poll(t0 + DEBOUNCE));
        assert!(coordinator.notify(200.0, 100.0, t0 + ms(160)));
        assert_eq!(coordinator.state(), ResizeState::Resplitting);

        coordinator.finish();
        assert!(matches!(coordinator.state(), ResizeState::Pending { .. }));
        assert!(coordinator.poll(t0 + ms(160) + DEBOUNCE));
        coordinator.finish();
        assert_eq!(coordinator.state(), ResizeState::Idle);
    }

    #[test]
    fn test_dispose_cancels() {
        let t0 = Instant::now();
        let mut coordinator = ResizeCoordinator::new(DEBOUNCE);
        coordinator.notify(400.0, 100.0, t0);
        coordinator.notify(300.0, 100.0, t0);
        coordinator.dispose();
        coordinator.dispose();
        assert!(!coordinator.is_active());
        assert!(!coordinator.poll(t0 + ms(1000)));
        assert!(!coordinator.notify(100.0, 100.0, t0));
        assert_eq!(coordinator.time_until_next(t0), None);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ResizeState::Idle.to_string(), "Idle");
        assert_eq!(ResizeState::Resplitting.to_string(), "Resplitting");
    }
}
