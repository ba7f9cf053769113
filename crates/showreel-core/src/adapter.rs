//! Media Event Adapter - maps media lifecycle signals onto controller transitions
//!
//! [`translate`] is the whole mapping table. It returns `None` for signals that
//! would not change anything (a repeated `canplay`, a `pause` while already
//! paused, the outcome of a superseded play attempt) so re-delivery never
//! repeats a side effect.

use crate::{
    error::PlayerError,
    media::{MediaEvent, PlayAttempt},
    types::{PlayerState, PlayerStatus},
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A single controller state change derived from one media event
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Move to a new status with no further bookkeeping
    Status(PlayerStatus),
    /// Duration became known
    Duration(f64),
    /// Position moved
    Time(f64),
    /// The resource is playing; `attempt` settles the pending request if any
    Confirmed { attempt: Option<PlayAttempt> },
    /// Load or playback failed
    Fail(PlayerError),
    /// Playback reached the end
    Finished,
}

/// Translate a media event against the current state.
///
/// `pending` is the play attempt the controller is still waiting on.
pub fn translate(
    event: &MediaEvent,
    state: &PlayerState,
    pending: Option<PlayAttempt>,
) -> Option<Transition> {
    use PlayerStatus::*;

    let status = state.status;
    match event {
        // Loading is only entered by command; `preload` fetches start without one.
        MediaEvent::LoadStart => None,

        MediaEvent::LoadedMetadata { duration } => {
            let usable = duration.is_finite() && *duration > 0.0;
            (usable && status != Errored && *duration != state.duration)
                .then_some(Transition::Duration(*duration))
        }

        MediaEvent::CanPlay => (status == Loading).then_some(Transition::Status(Ready)),

        MediaEvent::Play => (!matches!(status, Playing | Errored))
            .then_some(Transition::Confirmed { attempt: None }),

        MediaEvent::Pause => (status == Playing).then_some(Transition::Status(Paused)),

        MediaEvent::Ended => matches!(status, Playing | Paused).then_some(Transition::Finished),

        MediaEvent::TimeUpdate { current_time } => {
            if !current_time.is_finite() || status == Errored {
                return None;
            }
            let time = state.clamp_time(*current_time);
            (time != state.current_time).then_some(Transition::Time(time))
        }

        MediaEvent::Error { code, message } => (status != Errored)
            .then(|| Transition::Fail(PlayerError::from_media(*code, message.clone()))),

        MediaEvent::PlayResolved { attempt } => (pending == Some(*attempt))
            .then_some(Transition::Confirmed { attempt: Some(*attempt) }),

        MediaEvent::PlayRejected { attempt, reason } => (pending == Some(*attempt)).then(|| {
            Transition::Fail(PlayerError::PlaybackRejected {
                reason: reason.clone(),
            })
        }),
    }
}

/// FIFO that serializes event delivery.
///
/// A delivery made while another one is being applied (for example from a
/// callback fired synchronously by the host) is queued and applied by the
/// outer call once the current event is fully processed.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: RefCell<VecDeque<MediaEvent>>,
    draining: Cell<bool>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` and, unless a drain is already running, apply every
    /// queued event in order.
    pub fn deliver<F>(&self, event: MediaEvent, apply: F)
    where
        F: FnMut(MediaEvent),
    {
        self.pending.borrow_mut().push_back(event);
        if self.draining.replace(true) {
            return;
        }
        self.drain(apply);
    }

    /// Run `f` with delivery held back; events delivered while it runs are
    /// applied once it returns.
    pub fn hold<R, F>(&self, f: impl FnOnce() -> R, apply: F) -> R
    where
        F: FnMut(MediaEvent),
    {
        if self.draining.replace(true) {
            return f();
        }
        let out = f();
        self.drain(apply);
        out
    }

    fn drain<F>(&self, mut apply: F)
    where
        F: FnMut(MediaEvent),
    {
        loop {
            // Release the borrow before applying so `apply` may re-enter.
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(event) => apply(event),
                None => break,
            }
        }
        self.draining.set(false);
    }

    /// Drop anything still queued
    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }

    /// Number of events waiting
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaErrorCode;

    fn state(status: PlayerStatus) -> PlayerState {
        PlayerState {
            status,
            ..PlayerState::default()
        }
    }

    #[test]
    fn test_can_play_only_from_loading() {
        let event = MediaEvent::CanPlay;
        assert_eq!(
            translate(&event, &state(PlayerStatus::Loading), None),
            Some(Transition::Status(PlayerStatus::Ready))
        );
        for status in [PlayerStatus::Ready, PlayerStatus::Playing, PlayerStatus::Paused] {
            assert_eq!(translate(&event, &state(status), None), None);
        }
    }

    #[test]
    fn test_load_start_never_changes_status() {
        for status in [PlayerStatus::Idle, PlayerStatus::Loading, PlayerStatus::Ended] {
            assert_eq!(translate(&MediaEvent::LoadStart, &state(status), None), None);
        }
    }

    #[test]
    fn test_stale_attempt_is_ignored() {
        let loading = state(PlayerStatus::Loading);
        let resolved = MediaEvent::PlayResolved { attempt: PlayAttempt(1) };
        let rejected = MediaEvent::PlayRejected {
            attempt: PlayAttempt(1),
            reason: "AbortError".into(),
        };

        assert_eq!(translate(&resolved, &loading, Some(PlayAttempt(2))), None);
        assert_eq!(translate(&rejected, &loading, None), None);
        assert!(matches!(
            translate(&rejected, &loading, Some(PlayAttempt(1))),
            Some(Transition::Fail(PlayerError::PlaybackRejected { .. }))
        ));
    }

    #[test]
    fn test_error_is_deduplicated() {
        let event = MediaEvent::Error {
            code: MediaErrorCode::Network,
            message: String::new(),
        };
        assert!(translate(&event, &state(PlayerStatus::Loading), None).is_some());
        assert_eq!(translate(&event, &state(PlayerStatus::Errored), None), None);
    }

    #[test]
    fn test_time_update_is_clamped() {
        let playing = PlayerState {
            status: PlayerStatus::Playing,
            duration: 60.0,
            current_time: 10.0,
            ..PlayerState::default()
        };
        assert_eq!(
            translate(&MediaEvent::TimeUpdate { current_time: 61.2 }, &playing, None),
            Some(Transition::Time(60.0))
        );
        assert_eq!(
            translate(&MediaEvent::TimeUpdate { current_time: 10.0 }, &playing, None),
            None
        );
        assert_eq!(
            translate(&MediaEvent::TimeUpdate { current_time: f64::NAN }, &playing, None),
            None
        );
    }

    #[test]
    fn test_metadata_ignores_unknown_duration() {
        let loading = state(PlayerStatus::Loading);
        let stream = MediaEvent::LoadedMetadata { duration: f64::INFINITY };
        assert_eq!(translate(&stream, &loading, None), None);
        assert_eq!(
            translate(&MediaEvent::LoadedMetadata { duration: 95.0 }, &loading, None),
            Some(Transition::Duration(95.0))
        );
    }

    #[test]
    fn test_queue_serializes_reentrant_delivery() {
        let queue = EventQueue::new();
        let applied = RefCell::new(Vec::new());

        queue.deliver(MediaEvent::LoadStart, |event| {
            applied.borrow_mut().push(event.name());
            if event == MediaEvent::LoadStart {
                // Fired from inside the first event's processing.
                queue.deliver(MediaEvent::CanPlay, |_| panic!("nested drain"));
                assert_eq!(queue.len(), 1);
            }
        });

        assert_eq!(*applied.borrow(), vec!["loadstart", "canplay"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_hold_defers_delivery() {
        let queue = EventQueue::new();
        let applied = RefCell::new(Vec::new());

        let out = queue.hold(
            || {
                queue.deliver(MediaEvent::Pause, |_| panic!("applied while held"));
                assert_eq!(queue.len(), 1);
                7
            },
            |event| applied.borrow_mut().push(event),
        );

        assert_eq!(out, 7);
        assert_eq!(*applied.borrow(), vec![MediaEvent::Pause]);
        assert!(queue.is_empty());
    }
}
