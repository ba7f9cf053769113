//! Scripted playback against a simulated media resource

use serde::{Deserialize, Serialize};
use showreel_core::{
    sim::{SimHandle, SimulatedMedia},
    surface::RecordingSurface,
    ControlAction, KeyTarget, MediaEvent, Overlay, PlayerConfig, PlayerController,
};
use tabled::Tabled;

/// One line of a simulation script
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// `{"action": "toggle_play"}`
    Action(ControlAction),
    /// `{"seek": 42.0}`
    Seek { seek: f64 },
    /// `{"key": "ArrowRight", "progress_bar": false}`
    Key {
        key: String,
        #[serde(default)]
        progress_bar: bool,
    },
    /// `{"event": {"type": "can_play"}}`
    Event { event: MediaEvent },
    /// `{"host": "resolve_play"}`
    Host { host: HostStep },
    /// `{"reject": "NotAllowedError"}`
    Reject { reject: String },
    /// `{"destroy": true}`
    Destroy { destroy: bool },
}

/// Host behaviour driven by the simulated resource
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostStep {
    /// Settle the latest play request successfully
    ResolvePlay,
    /// Play through to the end
    Finish,
}

/// Player state after one step
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct StepRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub step: String,
    pub status: String,
    pub time: String,
    pub overlay: String,
    pub icon: String,
    pub muted: bool,
    pub result: String,
}

/// Parse a script file body
pub fn parse(json: &str) -> anyhow::Result<Vec<Step>> {
    Ok(serde_json::from_str(json)?)
}

/// Run every step and collect the resulting rows
pub fn run(config: PlayerConfig, steps: &[Step]) -> Vec<StepRow> {
    let media = SimulatedMedia::new();
    let host = media.handle();
    let surface = RecordingSurface::new();
    let mut player = PlayerController::new(config, media, surface.clone());

    let mut rows = vec![row(0, "create".into(), &player, Ok(()))];
    for (i, step) in steps.iter().enumerate() {
        let (label, result) = apply(&mut player, &host, step);
        rows.push(row(i + 1, label, &player, result));
    }
    rows
}

fn apply(
    player: &mut PlayerController<SimulatedMedia>,
    host: &SimHandle,
    step: &Step,
) -> (String, Result<(), String>) {
    let feed = |player: &mut PlayerController<SimulatedMedia>, events: Vec<MediaEvent>| {
        for event in events {
            player.handle_event(event);
        }
    };

    match step {
        Step::Action(action) => (
            format!("{:?}", action),
            player.perform(*action).map_err(|e| e.to_string()),
        ),
        Step::Seek { seek } => (
            format!("seek {}", seek),
            player.seek(*seek).map_err(|e| e.to_string()),
        ),
        Step::Key { key, progress_bar } => {
            let target = if *progress_bar {
                KeyTarget::ProgressBar
            } else {
                KeyTarget::Player
            };
            let result = match ControlAction::from_key(key, target) {
                Some(action) => player.perform(action).map_err(|e| e.to_string()),
                None => Err(format!("unmapped key {:?}", key)),
            };
            (format!("key {:?}", key), result)
        }
        Step::Event { event } => {
            player.handle_event(event.clone());
            (format!("event {}", event.name()), Ok(()))
        }
        Step::Host { host: HostStep::ResolvePlay } => {
            feed(player, host.resolve_play());
            ("host resolves play".into(), Ok(()))
        }
        Step::Host { host: HostStep::Finish } => {
            feed(player, host.finish());
            ("host reaches end".into(), Ok(()))
        }
        Step::Reject { reject } => {
            let result = match host.reject_play(reject.as_str()) {
                Some(event) => {
                    player.handle_event(event);
                    Ok(())
                }
                None => Err("no play request to reject".into()),
            };
            (format!("host rejects play ({})", reject), result)
        }
        Step::Destroy { destroy } => {
            if *destroy {
                player.destroy();
            }
            ("destroy".into(), Ok(()))
        }
    }
}

fn row(
    index: usize,
    step: String,
    player: &PlayerController<SimulatedMedia>,
    result: Result<(), String>,
) -> StepRow {
    let state = player.state();
    let view = player.surface_view();

    let overlay = match view.overlay {
        Overlay::None => "-".to_string(),
        Overlay::Loading => "loading".to_string(),
        Overlay::Error { .. } => state
            .last_error
            .as_ref()
            .map(|e| format!("error ({})", e.error_code()))
            .unwrap_or_else(|| "error".to_string()),
    };

    StepRow {
        index,
        step,
        status: state.status.to_string(),
        time: format!("{} / {}", view.current_label, view.duration_label),
        overlay,
        icon: view.play_icon.to_string(),
        muted: state.muted,
        result: match result {
            Ok(()) => "ok".to_string(),
            Err(e) => e,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showreel_core::MediaSource;

    fn config() -> PlayerConfig {
        PlayerConfig::showcase(vec![MediaSource::new("reel.mp4", "video/mp4")])
    }

    #[test]
    fn test_parse_steps() {
        let steps = parse(
            r#"[
                {"action": "play"},
                {"event": {"type": "loaded_metadata", "duration": 90}},
                {"host": "resolve_play"},
                {"seek": 30},
                {"key": "m"},
                {"reject": "NotAllowedError"},
                {"destroy": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 7);
        assert!(matches!(steps[0], Step::Action(ControlAction::Play)));
        assert!(matches!(steps[2], Step::Host { host: HostStep::ResolvePlay }));
        assert!(matches!(steps[4], Step::Key { ref key, progress_bar: false } if key == "m"));
    }

    #[test]
    fn test_run_happy_path() {
        let steps = parse(
            r#"[
                {"action": "play"},
                {"event": {"type": "loaded_metadata", "duration": 125}},
                {"event": {"type": "can_play"}},
                {"host": "resolve_play"},
                {"seek": 65}
            ]"#,
        )
        .unwrap();

        let rows = run(config(), &steps);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[1].status, "loading");
        assert_eq!(rows[1].overlay, "loading");
        assert_eq!(rows[3].status, "ready");
        assert_eq!(rows[4].status, "playing");
        assert_eq!(rows[5].time, "1:05 / 2:05");
    }

    #[test]
    fn test_run_reports_errors() {
        let steps =
            parse(r#"[{"action": "play"}, {"reject": "NotAllowedError"}, {"action": "play"}]"#)
                .unwrap();

        let rows = run(config(), &steps);
        assert_eq!(rows[2].status, "errored");
        assert_eq!(rows[2].overlay, "error (PLAYBACK_REJECTED)");
        assert!(rows[3].result.contains("Invalid playback state transition"));
    }
}
