//! Media resource boundary
//!
//! The player never decodes or fetches anything itself. It drives a host
//! media resource through [`MediaResource`] and learns what happened from the
//! [`MediaEvent`]s the host reports back.

use crate::error::MediaErrorCode;
use serde::{Deserialize, Serialize};

/// Identifies one asynchronous play request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayAttempt(pub u64);

impl PlayAttempt {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for PlayAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle signals reported by the media resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaEvent {
    /// The resource started fetching
    LoadStart,
    /// Metadata arrived; `duration` may be NaN or infinite for streams
    LoadedMetadata { duration: f64 },
    /// Enough data is available to start playing
    CanPlay,
    /// The resource started playing
    Play,
    /// The resource paused
    Pause,
    /// Playback reached the end of the media
    Ended,
    /// Position changed
    TimeUpdate { current_time: f64 },
    /// Load or decode failure
    Error {
        code: MediaErrorCode,
        #[serde(default)]
        message: String,
    },
    /// A play request settled successfully
    PlayResolved { attempt: PlayAttempt },
    /// A play request was refused
    PlayRejected { attempt: PlayAttempt, reason: String },
}

impl MediaEvent {
    /// Host event name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            MediaEvent::LoadStart => "loadstart",
            MediaEvent::LoadedMetadata { .. } => "loadedmetadata",
            MediaEvent::CanPlay => "canplay",
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
            MediaEvent::TimeUpdate { .. } => "timeupdate",
            MediaEvent::Error { .. } => "error",
            MediaEvent::PlayResolved { .. } => "play_resolved",
            MediaEvent::PlayRejected { .. } => "play_rejected",
        }
    }
}

/// Commands the player issues to the media resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MediaCommand {
    Load,
    RequestPlay { attempt: PlayAttempt },
    Pause,
    SetCurrentTime { seconds: f64 },
    SetMuted { muted: bool },
    Detach,
}

/// Host playback primitive wrapped by the player.
///
/// Every call returns immediately. `request_play` must report its outcome
/// later as [`MediaEvent::PlayResolved`] or [`MediaEvent::PlayRejected`]
/// carrying the same attempt.
pub trait MediaResource {
    /// (Re)load the configured sources
    fn load(&mut self);

    /// Ask the resource to start playing
    fn request_play(&mut self, attempt: PlayAttempt);

    /// Pause playback
    fn pause(&mut self);

    /// Move the playback position
    fn set_current_time(&mut self, seconds: f64);

    /// Mute or unmute audio
    fn set_muted(&mut self, muted: bool);

    /// Drop every subscription and release the underlying resource
    fn detach(&mut self);
}

impl<M: MediaResource + ?Sized> MediaResource for Box<M> {
    fn load(&mut self) {
        (**self).load()
    }

    fn request_play(&mut self, attempt: PlayAttempt) {
        (**self).request_play(attempt)
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn set_current_time(&mut self, seconds: f64) {
        (**self).set_current_time(seconds)
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }

    fn detach(&mut self) {
        (**self).detach()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event: MediaEvent =
            serde_json::from_str(r#"{"type":"time_update","current_time":12.5}"#).unwrap();
        assert_eq!(event, MediaEvent::TimeUpdate { current_time: 12.5 });

        let event: MediaEvent =
            serde_json::from_str(r#"{"type":"error","code":"network"}"#).unwrap();
        assert_eq!(event.name(), "error");
    }

    #[test]
    fn test_attempt_sequence() {
        let first = PlayAttempt(1);
        assert_eq!(first.next(), PlayAttempt(2));
        assert_eq!(first.to_string(), "#1");
    }
}
