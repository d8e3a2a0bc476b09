//! Two-stage image fade.
//!
//! Swapping the preview image fades the current image out, swaps the source
//! once [`FADE_OUT`] has elapsed, then fades back in over [`FADE_IN`]. Whoever
//! drives the delays (a browser, a timer task) reports completion with the
//! [`TransitionTicket`] returned by [`ImageTransition::begin`]. A newer
//! transition invalidates older tickets, and tearing the transition down
//! invalidates all of them, so a late callback can never touch state that no
//! longer has a consumer.

use std::time::Duration;

use crate::assets::ImageAsset;

/// Delay before the source is swapped.
pub const FADE_OUT: Duration = Duration::from_millis(200);

/// Delay before the swapped image is fully visible again.
pub const FADE_IN: Duration = Duration::from_millis(200);

/// Identifies one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionTicket(u64);

/// Transition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FadingOut,
    FadingIn,
}

/// Displayed image plus any transition in flight.
#[derive(Debug, Clone, Default)]
pub struct ImageTransition {
    shown: Option<ImageAsset>,
    pending: Option<ImageAsset>,
    phase: Phase,
    generation: u64,
    torn_down: bool,
}

impl ImageTransition {
    /// Start with `initial` displayed and nothing in flight.
    #[must_use]
    pub const fn new(initial: Option<ImageAsset>) -> Self {
        Self {
            shown: initial,
            pending: None,
            phase: Phase::Idle,
            generation: 0,
            torn_down: false,
        }
    }

    /// Image currently backing the display.
    #[must_use]
    pub const fn shown(&self) -> Option<ImageAsset> {
        self.shown
    }

    /// Image waiting for the fade-out to finish.
    #[must_use]
    pub const fn pending(&self) -> Option<ImageAsset> {
        self.pending
    }

    /// Image the display is heading towards.
    #[must_use]
    pub fn target(&self) -> Option<ImageAsset> {
        self.pending.or(self.shown)
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the image is faded in (or fading in).
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase != Phase::FadingOut
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Start fading towards `target`.
    ///
    /// Returns `None` when `target` is already displayed or pending, or after
    /// teardown.
    pub fn begin(&mut self, target: ImageAsset) -> Option<TransitionTicket> {
        if self.torn_down || self.target() == Some(target) {
            return None;
        }
        self.generation += 1;
        self.pending = Some(target);
        self.phase = Phase::FadingOut;
        Some(TransitionTicket(self.generation))
    }

    /// The fade-out delay elapsed: swap the source.
    ///
    /// Returns `false` if the ticket is stale or the phase does not match.
    pub fn fade_out_elapsed(&mut self, ticket: TransitionTicket) -> bool {
        if !self.accepts(ticket) || self.phase != Phase::FadingOut {
            return false;
        }
        if let Some(next) = self.pending.take() {
            self.shown = Some(next);
        }
        self.phase = Phase::FadingIn;
        true
    }

    /// The fade-in delay elapsed: the transition is over.
    pub fn fade_in_elapsed(&mut self, ticket: TransitionTicket) -> bool {
        if !self.accepts(ticket) || self.phase != Phase::FadingIn {
            return false;
        }
        self.phase = Phase::Idle;
        true
    }

    /// Finish any transition in flight immediately.
    pub fn settle(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(next) = self.pending.take() {
            self.shown = Some(next);
        }
        self.phase = Phase::Idle;
    }

    /// Cancel everything; later tickets and calls to `begin` are ignored.
    pub fn tear_down(&mut self) {
        self.torn_down = true;
        self.pending = None;
        self.phase = Phase::Idle;
    }

    fn accepts(&self, ticket: TransitionTicket) -> bool {
        !self.torn_down && ticket.0 == self.generation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NARROW: ImageAsset = ImageAsset {
        key: "curtain-100cm",
        url: "/static/100.svg",
    };
    const WIDE: ImageAsset = ImageAsset {
        key: "curtain-300cm",
        url: "/static/300.svg",
    };

    #[test]
    fn test_full_transition() {
        let mut transition = ImageTransition::new(Some(NARROW));
        let ticket = transition.begin(WIDE).unwrap();
        assert_eq!(transition.phase(), Phase::FadingOut);
        assert!(!transition.is_visible());
        assert_eq!(transition.shown(), Some(NARROW));

        assert!(transition.fade_out_elapsed(ticket));
        assert_eq!(transition.shown(), Some(WIDE));
        assert_eq!(transition.phase(), Phase::FadingIn);
        assert!(transition.is_visible());

        assert!(transition.fade_in_elapsed(ticket));
        assert_eq!(transition.phase(), Phase::Idle);
    }

    #[test]
    fn test_begin_same_target_is_noop() {
        let mut transition = ImageTransition::new(Some(NARROW));
        assert!(transition.begin(NARROW).is_none());
        assert_eq!(transition.phase(), Phase::Idle);
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut transition = ImageTransition::new(None);
        let first = transition.begin(NARROW).unwrap();
        let second = transition.begin(WIDE).unwrap();

        assert!(!transition.fade_out_elapsed(first));
        assert_eq!(transition.shown(), None);

        assert!(transition.fade_out_elapsed(second));
        assert_eq!(transition.shown(), Some(WIDE));
    }

    #[test]
    fn test_out_of_order_callbacks_ignored() {
        let mut transition = ImageTransition::new(None);
        let ticket = transition.begin(NARROW).unwrap();
        assert!(!transition.fade_in_elapsed(ticket));
        assert_eq!(transition.phase(), Phase::FadingOut);
    }

    #[test]
    fn test_teardown_cancels_pending_swap() {
        let mut transition = ImageTransition::new(Some(NARROW));
        let ticket = transition.begin(WIDE).unwrap();
        transition.tear_down();

        assert!(!transition.fade_out_elapsed(ticket));
        assert_eq!(transition.shown(), Some(NARROW));
        assert!(transition.begin(WIDE).is_none());

        transition.settle();
        assert_eq!(transition.shown(), Some(NARROW));
    }

    #[test]
    fn test_settle_swaps_immediately() {
        let mut transition = ImageTransition::new(Some(NARROW));
        let ticket = transition.begin(WIDE).unwrap();
        transition.settle();
        assert_eq!(transition.shown(), Some(WIDE));
        assert_eq!(transition.phase(), Phase::Idle);
        assert!(!transition.fade_out_elapsed(ticket));
    }
}
