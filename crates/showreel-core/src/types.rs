//! Core types for Showreel

use crate::error::PlayerError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// Constructed, nothing requested yet
    Idle,
    /// Media is loading
    Loading,
    /// Media can play but has not started
    Ready,
    /// Media is playing
    Playing,
    /// Playback paused
    Paused,
    /// Playback reached the end
    Ended,
    /// Load or playback failed
    Errored,
}

impl PlayerStatus {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: PlayerStatus) -> bool {
        use PlayerStatus::*;
        matches!(
            (self, target),
            // From Idle
            (Idle, Loading) | (Idle, Playing) | (Idle, Errored) |
            // From Loading
            (Loading, Ready) | (Loading, Playing) | (Loading, Errored) |
            // From Ready
            (Ready, Playing) | (Ready, Errored) |
            // From Playing
            (Playing, Paused) | (Playing, Ended) | (Playing, Loading) | (Playing, Errored) |
            // From Paused (hosts fire pause right before ended)
            (Paused, Playing) | (Paused, Ended) | (Paused, Loading) | (Paused, Errored) |
            // From Ended
            (Ended, Playing) | (Ended, Loading) | (Ended, Errored) |
            // From Errored
            (Errored, Loading)
        )
    }

    /// Whether a `play()` command may be issued from this state
    pub fn accepts_play(&self) -> bool {
        matches!(
            self,
            PlayerStatus::Idle
                | PlayerStatus::Loading
                | PlayerStatus::Ready
                | PlayerStatus::Paused
                | PlayerStatus::Ended
        )
    }
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerStatus::Idle => write!(f, "idle"),
            PlayerStatus::Loading => write!(f, "loading"),
            PlayerStatus::Ready => write!(f, "ready"),
            PlayerStatus::Playing => write!(f, "playing"),
            PlayerStatus::Paused => write!(f, "paused"),
            PlayerStatus::Ended => write!(f, "ended"),
            PlayerStatus::Errored => write!(f, "errored"),
        }
    }
}

/// Snapshot of a player's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub status: PlayerStatus,
    /// Playback position in seconds
    pub current_time: f64,
    /// Content duration in seconds, 0 until metadata is known
    pub duration: f64,
    pub muted: bool,
    /// Set only while `status` is `Errored`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<PlayerError>,
}

impl PlayerState {
    pub fn new(muted: bool) -> Self {
        Self {
            status: PlayerStatus::Idle,
            current_time: 0.0,
            duration: 0.0,
            muted,
            last_error: None,
        }
    }

    /// Whether the duration has been reported
    pub fn duration_known(&self) -> bool {
        self.duration > 0.0
    }

    /// Clamp a position into `[0, duration]`
    pub fn clamp_time(&self, time: f64) -> f64 {
        if self.duration_known() {
            time.clamp(0.0, self.duration)
        } else {
            time.max(0.0)
        }
    }

    /// Playback progress in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_known() {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(true)
    }
}
