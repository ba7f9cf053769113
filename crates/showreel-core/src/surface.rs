//! Surface Renderer - projects player state onto the control surface
//!
//! [`render`] is a pure function: it reads state and config, never mutates
//! either, and never issues media commands. Hosts implement [`SurfaceSink`]
//! to push the resulting [`SurfaceView`] into real elements.

use crate::{
    config::PlayerConfig,
    error::RETRY_MESSAGE,
    types::{PlayerState, PlayerStatus},
};
use serde::Serialize;

/// Icon shown on the play/pause button while playing
pub const ICON_PAUSE: &str = "⏸";
/// Icon shown on the play/pause button otherwise
pub const ICON_PLAY: &str = "▶";
/// Mute button icon while muted
pub const ICON_MUTED: &str = "🔇";
/// Mute button icon while audible
pub const ICON_UNMUTED: &str = "🔊";

/// The one overlay layer visible above the video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    /// Normal surface, nothing covering the video
    None,
    /// Spinner while media loads
    Loading,
    /// Error message with a retry button
    Error { message: String },
}

/// Everything the control surface displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceView {
    /// Progress bar fill in `[0, 1]`
    pub progress: f64,
    pub current_label: String,
    pub duration_label: String,
    pub play_icon: &'static str,
    pub play_label: &'static str,
    pub mute_icon: &'static str,
    pub mute_label: &'static str,
    pub overlay: Overlay,
    /// Large centered play button
    pub show_play_button: bool,
    pub show_poster: bool,
    /// Whether the control bar exists at all
    pub controls_visible: bool,
    /// Whether the controls accept input
    pub controls_enabled: bool,
    /// State classes for the player root element
    pub css_classes: Vec<&'static str>,
}

impl SurfaceView {
    /// Progress as a CSS width, e.g. `"25%"`
    pub fn progress_width(&self) -> String {
        let percent = self.progress * 100.0;
        if percent.fract() == 0.0 {
            format!("{}%", percent as u32)
        } else {
            format!("{:.2}%", percent)
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.css_classes.contains(&class)
    }
}

/// Project state and config onto the surface
pub fn render(state: &PlayerState, config: &PlayerConfig, controls_enabled: bool) -> SurfaceView {
    let playing = state.status == PlayerStatus::Playing;

    let overlay = match (state.status, &state.last_error) {
        (PlayerStatus::Errored, Some(err)) => Overlay::Error {
            message: err.user_message().to_string(),
        },
        (PlayerStatus::Errored, None) => Overlay::Error {
            message: RETRY_MESSAGE.to_string(),
        },
        (PlayerStatus::Loading, _) => Overlay::Loading,
        _ => Overlay::None,
    };

    let mut css_classes = Vec::new();
    if playing {
        css_classes.push("playing");
    }
    match overlay {
        Overlay::Loading => css_classes.push("loading"),
        Overlay::Error { .. } => css_classes.push("error"),
        Overlay::None => {}
    }
    if !controls_enabled {
        css_classes.push("disabled");
    }

    let not_started = matches!(
        state.status,
        PlayerStatus::Idle | PlayerStatus::Loading | PlayerStatus::Ready
    );

    SurfaceView {
        progress: state.progress(),
        current_label: format_time(state.current_time),
        duration_label: format_time(state.duration),
        play_icon: if playing { ICON_PAUSE } else { ICON_PLAY },
        play_label: if playing { "Pause video" } else { "Play video" },
        mute_icon: if state.muted { ICON_MUTED } else { ICON_UNMUTED },
        mute_label: if state.muted { "Unmute" } else { "Mute" },
        show_play_button: !playing && overlay == Overlay::None,
        overlay,
        show_poster: config.poster.is_some() && not_started && state.current_time == 0.0,
        controls_visible: config.show_controls,
        controls_enabled,
        css_classes,
    }
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Receives every rendered view
pub trait SurfaceSink {
    fn apply(&mut self, view: &SurfaceView);
}

/// Sink that keeps every view it receives
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    views: std::rc::Rc<std::cell::RefCell<Vec<SurfaceView>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent view
    pub fn last(&self) -> Option<SurfaceView> {
        self.views.borrow().last().cloned()
    }

    /// Number of renders so far
    pub fn render_count(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn views(&self) -> Vec<SurfaceView> {
        self.views.borrow().clone()
    }
}

impl SurfaceSink for RecordingSurface {
    fn apply(&mut self, view: &SurfaceView) {
        self.views.borrow_mut().push(view.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MediaErrorCode, PlayerError};

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(125.4), "2:05");
        assert_eq!(format_time(3599.0), "59:59");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-4.0), "0:00");
    }

    #[test]
    fn test_progress_fill() {
        let config = PlayerConfig::default();
        let mut state = PlayerState::default();
        state.current_time = 5.0;
        assert_eq!(render(&state, &config, true).progress, 0.0);

        state.duration = 20.0;
        let view = render(&state, &config, true);
        assert_eq!(view.progress, 0.25);
        assert_eq!(view.progress_width(), "25%");
    }

    #[test]
    fn test_single_overlay_per_status() {
        let config = PlayerConfig::default();
        let mut state = PlayerState::default();

        state.status = PlayerStatus::Loading;
        let view = render(&state, &config, true);
        assert_eq!(view.overlay, Overlay::Loading);
        assert!(view.has_class("loading") && !view.has_class("error"));
        assert!(!view.show_play_button);

        state.status = PlayerStatus::Errored;
        state.last_error = Some(PlayerError::from_media(MediaErrorCode::Network, ""));
        let view = render(&state, &config, true);
        assert!(matches!(view.overlay, Overlay::Error { .. }));
        assert!(view.has_class("error") && !view.has_class("loading"));

        state.status = PlayerStatus::Paused;
        state.last_error = None;
        let view = render(&state, &config, true);
        assert_eq!(view.overlay, Overlay::None);
        assert!(view.show_play_button);
    }

    #[test]
    fn test_icons() {
        let config = PlayerConfig::default();
        let mut state = PlayerState::default();
        state.status = PlayerStatus::Playing;
        state.muted = false;

        let view = render(&state, &config, true);
        assert_eq!(view.play_icon, ICON_PAUSE);
        assert_eq!(view.mute_icon, ICON_UNMUTED);
        assert!(view.has_class("playing"));

        state.status = PlayerStatus::Ready;
        state.muted = true;
        let view = render(&state, &config, true);
        assert_eq!(view.play_icon, ICON_PLAY);
        assert_eq!(view.mute_icon, ICON_MUTED);
    }

    #[test]
    fn test_poster_hidden_once_started() {
        let config = PlayerConfig {
            poster: Some("poster.jpg".into()),
            ..PlayerConfig::default()
        };
        let mut state = PlayerState::default();
        assert!(render(&state, &config, true).show_poster);

        state.status = PlayerStatus::Playing;
        assert!(!render(&state, &config, true).show_poster);
    }
}
