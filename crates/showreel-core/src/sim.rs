//! Simulated media resource
//!
//! Records every command the player issues and lets a harness produce the
//! events a real host would send back. Used by tests, benches and the CLI.

use crate::media::{MediaCommand, MediaEvent, MediaResource, PlayAttempt};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct SimInner {
    commands: Vec<MediaCommand>,
    playing: bool,
    muted: bool,
    current_time: f64,
    last_attempt: Option<PlayAttempt>,
    detached: bool,
}

/// Media resource that performs no I/O
#[derive(Debug, Default)]
pub struct SimulatedMedia {
    inner: Rc<RefCell<SimInner>>,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for inspecting the resource after it moves into a player
    pub fn handle(&self) -> SimHandle {
        SimHandle {
            inner: Rc::clone(&self.inner),
        }
    }

    fn record(&self, command: MediaCommand) {
        self.inner.borrow_mut().commands.push(command);
    }
}

impl MediaResource for SimulatedMedia {
    fn load(&mut self) {
        self.record(MediaCommand::Load);
        let mut inner = self.inner.borrow_mut();
        inner.playing = false;
        inner.current_time = 0.0;
    }

    fn request_play(&mut self, attempt: PlayAttempt) {
        self.record(MediaCommand::RequestPlay { attempt });
        self.inner.borrow_mut().last_attempt = Some(attempt);
    }

    fn pause(&mut self) {
        self.record(MediaCommand::Pause);
        self.inner.borrow_mut().playing = false;
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.record(MediaCommand::SetCurrentTime { seconds });
        self.inner.borrow_mut().current_time = seconds;
    }

    fn set_muted(&mut self, muted: bool) {
        self.record(MediaCommand::SetMuted { muted });
        self.inner.borrow_mut().muted = muted;
    }

    fn detach(&mut self) {
        self.record(MediaCommand::Detach);
        let mut inner = self.inner.borrow_mut();
        inner.detached = true;
        inner.playing = false;
    }
}

/// Shared view of a [`SimulatedMedia`]
#[derive(Debug, Clone)]
pub struct SimHandle {
    inner: Rc<RefCell<SimInner>>,
}

impl SimHandle {
    /// Every command issued so far
    pub fn commands(&self) -> Vec<MediaCommand> {
        self.inner.borrow().commands.clone()
    }

    pub fn contains(&self, command: &MediaCommand) -> bool {
        self.inner.borrow().commands.contains(command)
    }

    /// How many commands matched `predicate`
    pub fn count(&self, predicate: impl Fn(&MediaCommand) -> bool) -> usize {
        self.inner.borrow().commands.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().commands.clear();
    }

    /// The resource's own playing flag
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().playing
    }

    pub fn is_muted(&self) -> bool {
        self.inner.borrow().muted
    }

    pub fn is_detached(&self) -> bool {
        self.inner.borrow().detached
    }

    pub fn current_time(&self) -> f64 {
        self.inner.borrow().current_time
    }

    /// Most recent play request
    pub fn last_attempt(&self) -> Option<PlayAttempt> {
        self.inner.borrow().last_attempt
    }

    /// Settle the most recent play request successfully.
    ///
    /// Returns the events a host would fire: `play` then the resolution.
    pub fn resolve_play(&self) -> Vec<MediaEvent> {
        let mut inner = self.inner.borrow_mut();
        match inner.last_attempt {
            Some(attempt) if !inner.detached => {
                inner.playing = true;
                vec![MediaEvent::Play, MediaEvent::PlayResolved { attempt }]
            }
            _ => Vec::new(),
        }
    }

    /// Refuse the most recent play request
    pub fn reject_play(&self, reason: impl Into<String>) -> Option<MediaEvent> {
        let inner = self.inner.borrow();
        inner.last_attempt.map(|attempt| MediaEvent::PlayRejected {
            attempt,
            reason: reason.into(),
        })
    }

    /// Events fired when playback stops by itself
    pub fn finish(&self) -> Vec<MediaEvent> {
        self.inner.borrow_mut().playing = false;
        vec![MediaEvent::Pause, MediaEvent::Ended]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_commands() {
        let mut media = SimulatedMedia::new();
        let handle = media.handle();

        media.load();
        media.request_play(PlayAttempt(3));
        media.set_muted(true);

        assert_eq!(handle.commands().len(), 3);
        assert_eq!(handle.last_attempt(), Some(PlayAttempt(3)));
        assert!(handle.is_muted());
        assert_eq!(handle.count(|c| matches!(c, MediaCommand::Load)), 1);
    }

    #[test]
    fn test_resolve_sets_playing() {
        let mut media = SimulatedMedia::new();
        let handle = media.handle();
        assert!(handle.resolve_play().is_empty());

        media.request_play(PlayAttempt(1));
        let events = handle.resolve_play();
        assert_eq!(events.len(), 2);
        assert!(handle.is_playing());

        media.detach();
        assert!(!handle.is_playing());
        assert!(handle.resolve_play().is_empty());
    }
}
