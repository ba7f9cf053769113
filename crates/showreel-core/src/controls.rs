//! Playback controls - keyboard and pointer input mapping

use serde::{Deserialize, Serialize};

/// Seek distance for arrow keys on the player, in seconds
pub const ARROW_SEEK_SECONDS: f64 = 10.0;
/// Seek distance for arrow keys on the focused progress bar, as a share of the duration
pub const PROGRESS_STEP_FRACTION: f64 = 0.05;

/// Where a key press happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// Anywhere inside the player
    Player,
    /// The focused progress bar
    ProgressBar,
}

/// User intent decoded from keyboard/pointer input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlAction {
    TogglePlay,
    Play,
    Pause,
    ToggleMute,
    Retry,
    /// Relative seek in seconds
    SeekBy { seconds: f64 },
    /// Relative seek as a share of the duration
    SeekByFraction { fraction: f64 },
    /// Absolute seek as a share of the duration
    SeekToFraction { fraction: f64 },
}

impl ControlAction {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str, target: KeyTarget) -> Option<Self> {
        let on_progress = target == KeyTarget::ProgressBar;
        match key {
            " " | "Enter" => Some(ControlAction::TogglePlay),
            "m" | "M" => Some(ControlAction::ToggleMute),
            "ArrowLeft" if on_progress => Some(ControlAction::SeekByFraction {
                fraction: -PROGRESS_STEP_FRACTION,
            }),
            "ArrowRight" if on_progress => Some(ControlAction::SeekByFraction {
                fraction: PROGRESS_STEP_FRACTION,
            }),
            "ArrowLeft" => Some(ControlAction::SeekBy {
                seconds: -ARROW_SEEK_SECONDS,
            }),
            "ArrowRight" => Some(ControlAction::SeekBy {
                seconds: ARROW_SEEK_SECONDS,
            }),
            _ => None,
        }
    }

    /// Map a click on the progress bar at `offset_x` within a bar `width` wide
    pub fn from_progress_click(offset_x: f64, width: f64) -> Option<Self> {
        if width.is_nan() || width <= 0.0 || !offset_x.is_finite() {
            return None;
        }
        Some(ControlAction::SeekToFraction {
            fraction: (offset_x / width).clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            ControlAction::from_key(" ", KeyTarget::Player),
            Some(ControlAction::TogglePlay)
        );
        assert_eq!(
            ControlAction::from_key("M", KeyTarget::ProgressBar),
            Some(ControlAction::ToggleMute)
        );
        assert_eq!(
            ControlAction::from_key("ArrowLeft", KeyTarget::Player),
            Some(ControlAction::SeekBy { seconds: -10.0 })
        );
        assert_eq!(
            ControlAction::from_key("ArrowRight", KeyTarget::ProgressBar),
            Some(ControlAction::SeekByFraction { fraction: 0.05 })
        );
        assert_eq!(ControlAction::from_key("k", KeyTarget::Player), None);
    }

    #[test]
    fn test_progress_click() {
        assert_eq!(
            ControlAction::from_progress_click(50.0, 200.0),
            Some(ControlAction::SeekToFraction { fraction: 0.25 })
        );
        assert_eq!(
            ControlAction::from_progress_click(250.0, 200.0),
            Some(ControlAction::SeekToFraction { fraction: 1.0 })
        );
        assert_eq!(ControlAction::from_progress_click(10.0, 0.0), None);
    }
}
