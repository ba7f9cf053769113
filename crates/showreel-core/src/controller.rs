//! Player Controller - owns the playback state machine
//!
//! Coordinates:
//! - Commands from the control surface (play, pause, seek, mute, retry)
//! - Media events translated by the adapter
//! - State broadcast and surface rendering after every transition
//! - Cancellation of in-flight play attempts on retry/destroy

use crate::{
    adapter::{translate, Transition},
    config::PlayerConfig,
    controls::ControlAction,
    error::{Error, PlayerError, Result},
    media::{MediaEvent, MediaResource, PlayAttempt},
    surface::{render, SurfaceSink, SurfaceView},
    types::{PlayerId, PlayerState, PlayerStatus},
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Player controller managing a single media resource
pub struct PlayerController<M: MediaResource> {
    /// Unique widget ID
    id: PlayerId,
    /// Construction-time configuration
    config: PlayerConfig,
    /// Why the config was rejected, if it was
    config_error: Option<String>,
    /// Current player state
    state: PlayerState,
    /// State change broadcaster
    state_tx: watch::Sender<PlayerState>,
    /// Wrapped media resource, released on destroy
    media: Option<M>,
    /// Control surface, released on destroy
    surface: Option<Box<dyn SurfaceSink>>,
    /// Play attempt still waiting for its outcome
    pending_play: Option<PlayAttempt>,
    /// Last attempt number handed out
    last_attempt: PlayAttempt,
    destroyed: bool,
}

impl<M: MediaResource> PlayerController<M> {
    /// Create a player around `media`, rendering into `surface`.
    ///
    /// An invalid config never fails construction: the player stays Idle with
    /// its controls disabled.
    pub fn new(config: PlayerConfig, mut media: M, surface: impl SurfaceSink + 'static) -> Self {
        let id = PlayerId::new();
        let state = PlayerState::new(config.muted);
        let (state_tx, _) = watch::channel(state.clone());

        let config_error = match config.validate() {
            Ok(()) => None,
            Err(e) => {
                warn!(player = %id, error = %e, error_code = e.error_code(), "Controls disabled");
                Some(e.to_string())
            }
        };

        media.set_muted(config.muted);

        let mut player = Self {
            id,
            config,
            config_error,
            state,
            state_tx,
            media: Some(media),
            surface: Some(Box::new(surface)),
            pending_play: None,
            last_attempt: PlayAttempt(0),
            destroyed: false,
        };

        info!(
            player = %player.id,
            sources = player.config.sources.len(),
            autoplay = player.config.autoplay,
            "Player created"
        );

        if player.config.autoplay && player.controls_enabled() {
            player.start_loading();
            player.request_play();
        }
        player.publish();

        player
    }

    /// Get player ID
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Get the configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PlayerState {
        self.state.clone()
    }

    /// Get current status
    pub fn status(&self) -> PlayerStatus {
        self.state.status
    }

    /// Subscribe to state changes
    pub fn subscribe_state(&self) -> watch::Receiver<PlayerState> {
        self.state_tx.subscribe()
    }

    /// Whether the controls accept input (config was valid)
    pub fn controls_enabled(&self) -> bool {
        self.config_error.is_none()
    }

    /// Play attempt still waiting for its outcome
    pub fn pending_attempt(&self) -> Option<PlayAttempt> {
        self.pending_play
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The wrapped media resource, until destroy
    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    /// Render the surface for the current state
    pub fn surface_view(&self) -> SurfaceView {
        render(&self.state, &self.config, self.controls_enabled())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Start playback
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn play(&mut self) -> Result<()> {
        self.ensure_alive()?;
        if let Some(reason) = &self.config_error {
            return Err(Error::ConfigInvalid(reason.clone()));
        }

        let status = self.state.status;
        if status == PlayerStatus::Playing {
            debug!("Already playing");
            return Ok(());
        }
        if !status.accepts_play() {
            return Err(Error::InvalidStateTransition {
                from: status.to_string(),
                to: PlayerStatus::Playing.to_string(),
            });
        }
        if let Some(attempt) = self.pending_play {
            debug!(%attempt, "Play already requested");
            return Ok(());
        }

        if status == PlayerStatus::Idle {
            self.start_loading();
        }
        self.request_play();
        self.publish();
        Ok(())
    }

    /// Pause playback
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn pause(&mut self) -> Result<()> {
        self.ensure_alive()?;

        if self.state.status == PlayerStatus::Playing {
            self.with_media(|m| m.pause());
            self.cancel_pending("paused");
            self.set_status(PlayerStatus::Paused)?;
            self.publish();
        } else if self.pending_play.is_some() {
            self.with_media(|m| m.pause());
            self.cancel_pending("paused before start");
        } else {
            debug!(status = %self.state.status, "Nothing to pause");
        }
        Ok(())
    }

    /// Play if stopped, pause if playing or about to play
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.state.status == PlayerStatus::Playing || self.pending_play.is_some() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Seek to position in seconds, clamped into `[0, duration]`.
    ///
    /// Ignored until the duration is known.
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn seek(&mut self, position: f64) -> Result<()> {
        self.ensure_alive()?;

        if !position.is_finite() {
            debug!("Ignoring non-finite seek target");
            return Ok(());
        }
        if !self.state.duration_known() {
            debug!("Duration unknown, seek ignored");
            return Ok(());
        }
        if self.state.status == PlayerStatus::Errored {
            debug!("Seek ignored while errored");
            return Ok(());
        }

        let clamped = self.state.clamp_time(position);
        info!(from = self.state.current_time, to = clamped, "Seeking");

        self.with_media(|m| m.set_current_time(clamped));
        self.state.current_time = clamped;
        self.publish();
        Ok(())
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta: f64) -> Result<()> {
        self.seek(self.state.current_time + delta)
    }

    /// Seek to a share of the duration, e.g. from a progress bar click
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        self.seek(fraction * self.state.duration)
    }

    /// Flip the muted flag; independent of playback status
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn toggle_mute(&mut self) -> Result<()> {
        self.ensure_alive()?;

        let muted = !self.state.muted;
        self.with_media(|m| m.set_muted(muted));
        self.state.muted = muted;
        debug!(muted, "Mute toggled");
        self.publish();
        Ok(())
    }

    /// Clear an error and reload the media
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn retry(&mut self) -> Result<()> {
        self.ensure_alive()?;

        if self.state.status != PlayerStatus::Errored {
            debug!(status = %self.state.status, "Nothing to retry");
            return Ok(());
        }

        self.cancel_pending("retry");
        self.set_status(PlayerStatus::Loading)?;
        self.with_media(|m| m.load());
        self.publish();
        Ok(())
    }

    /// Detach from the media resource and release it.
    ///
    /// Safe to call in any state and more than once. Outcomes of play attempts
    /// still in flight are discarded.
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        self.cancel_pending("destroyed");
        if let Some(mut media) = self.media.take() {
            media.pause();
            media.detach();
        }
        self.surface = None;
        self.destroyed = true;

        info!(status = %self.state.status, "Player destroyed");
    }

    /// Run a decoded user action
    pub fn perform(&mut self, action: ControlAction) -> Result<()> {
        match action {
            ControlAction::TogglePlay => self.toggle_play(),
            ControlAction::Play => self.play(),
            ControlAction::Pause => self.pause(),
            ControlAction::ToggleMute => self.toggle_mute(),
            ControlAction::Retry => self.retry(),
            ControlAction::SeekBy { seconds } => self.seek_by(seconds),
            ControlAction::SeekByFraction { fraction } => {
                self.seek_by(fraction * self.state.duration)
            }
            ControlAction::SeekToFraction { fraction } => self.seek_to_fraction(fraction),
        }
    }

    // =========================================================================
    // Media events
    // =========================================================================

    /// Apply one media event.
    ///
    /// Failures never propagate to the caller; they become an Errored state.
    pub fn handle_event(&mut self, event: MediaEvent) {
        if self.destroyed {
            debug!(player = %self.id, event = event.name(), "Event after destroy ignored");
            return;
        }

        let Some(transition) = translate(&event, &self.state, self.pending_play) else {
            debug!(
                player = %self.id,
                event = event.name(),
                status = %self.state.status,
                "Redundant event"
            );
            return;
        };

        if let Err(e) = self.apply(transition) {
            warn!(player = %self.id, event = event.name(), error = %e, "Event not applied");
            return;
        }
        self.publish();
    }

    fn apply(&mut self, transition: Transition) -> Result<()> {
        match transition {
            Transition::Status(status) => self.set_status(status)?,
            Transition::Duration(duration) => {
                self.state.duration = duration;
                self.state.current_time = self.state.clamp_time(self.state.current_time);
                debug!(player = %self.id, duration, "Duration known");
            }
            Transition::Time(time) => self.state.current_time = time,
            Transition::Confirmed { attempt } => {
                if let Some(pending) = self.pending_play.take() {
                    debug!(player = %self.id, %pending, confirmed = ?attempt, "Play confirmed");
                }
                if self.state.status != PlayerStatus::Playing {
                    self.set_status(PlayerStatus::Playing)?;
                }
            }
            Transition::Fail(error) => self.fail(error)?,
            Transition::Finished => {
                self.state.current_time = 0.0;
                self.with_media(|m| m.set_current_time(0.0));
                if self.config.loop_playback {
                    self.set_status(PlayerStatus::Loading)?;
                    self.request_play();
                } else {
                    self.set_status(PlayerStatus::Ended)?;
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            Err(Error::Destroyed)
        } else {
            Ok(())
        }
    }

    fn with_media(&mut self, f: impl FnOnce(&mut M)) {
        if let Some(media) = self.media.as_mut() {
            f(media);
        }
    }

    /// Transition to new status
    fn set_status(&mut self, status: PlayerStatus) -> Result<()> {
        let current = self.state.status;
        if current == status {
            return Ok(());
        }
        if !current.can_transition_to(status) {
            return Err(Error::InvalidStateTransition {
                from: current.to_string(),
                to: status.to_string(),
            });
        }

        self.state.status = status;
        if status != PlayerStatus::Errored {
            self.state.last_error = None;
        }

        info!(player = %self.id, from = %current, to = %status, "State transition");
        Ok(())
    }

    fn fail(&mut self, error: PlayerError) -> Result<()> {
        self.cancel_pending("failed");
        self.set_status(PlayerStatus::Errored)?;
        // An errored player never leaves the resource running.
        self.with_media(|m| m.pause());
        warn!(
            player = %self.id,
            error_code = error.error_code(),
            error = %error,
            "Playback failed"
        );
        self.state.last_error = Some(error);
        Ok(())
    }

    fn start_loading(&mut self) {
        if let Err(e) = self.set_status(PlayerStatus::Loading) {
            debug!(player = %self.id, error = %e, "Load not started");
            return;
        }
        self.with_media(|m| m.load());
    }

    fn request_play(&mut self) {
        let attempt = self.last_attempt.next();
        self.last_attempt = attempt;
        self.pending_play = Some(attempt);
        debug!(player = %self.id, %attempt, "Requesting playback");
        self.with_media(|m| m.request_play(attempt));
    }

    fn cancel_pending(&mut self, reason: &str) {
        if let Some(attempt) = self.pending_play.take() {
            debug!(player = %self.id, %attempt, reason, "Play attempt discarded");
        }
    }

    /// Broadcast the new state and redraw
    fn publish(&mut self) {
        self.state_tx.send_replace(self.state.clone());
        let view = self.surface_view();
        if let Some(surface) = self.surface.as_mut() {
            surface.apply(&view);
        }
    }
}

impl<M: MediaResource> Drop for PlayerController<M> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MediaSource, media::MediaCommand, sim::SimulatedMedia, surface::RecordingSurface,
    };

    fn config() -> PlayerConfig {
        PlayerConfig::showcase(vec![MediaSource::new("reel.mp4", "video/mp4")])
    }

    #[test]
    fn test_player_creation() {
        let player =
            PlayerController::new(config(), SimulatedMedia::new(), RecordingSurface::new());

        assert_eq!(player.status(), PlayerStatus::Idle);
        assert_eq!(player.state().current_time, 0.0);
        assert!(player.controls_enabled());
    }

    #[test]
    fn test_autoplay_loads_and_plays() {
        let media = SimulatedMedia::new();
        let log = media.handle();
        let config = PlayerConfig {
            autoplay: true,
            ..config()
        };
        let player = PlayerController::new(config, media, RecordingSurface::new());

        assert_eq!(player.status(), PlayerStatus::Loading);
        assert_eq!(player.pending_attempt(), Some(PlayAttempt(1)));
        assert!(log.contains(&MediaCommand::Load));
        assert!(log.contains(&MediaCommand::RequestPlay { attempt: PlayAttempt(1) }));
    }

    #[test]
    fn test_pause_cancels_pending_attempt() {
        let mut player =
            PlayerController::new(config(), SimulatedMedia::new(), RecordingSurface::new());
        player.play().unwrap();
        let attempt = player.pending_attempt().unwrap();

        player.pause().unwrap();
        assert_eq!(player.pending_attempt(), None);

        player.handle_event(MediaEvent::PlayResolved { attempt });
        assert_eq!(player.status(), PlayerStatus::Loading);
    }

    #[test]
    fn test_commands_after_destroy() {
        let mut player =
            PlayerController::new(config(), SimulatedMedia::new(), RecordingSurface::new());
        player.destroy();
        player.destroy();

        assert!(matches!(player.play(), Err(Error::Destroyed)));
        assert!(matches!(player.toggle_mute(), Err(Error::Destroyed)));
        assert!(player.media().is_none());
    }
}
