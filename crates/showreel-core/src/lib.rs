//! Showreel Core - Video Player Widget Library
//!
//! This crate provides the headless core of the portfolio video player:
//! - Playback state machine owning a single media resource
//! - Media event adapter with deduplication of redundant signals
//! - Pure projection of state onto the custom control surface
//! - Keyboard and pointer control mapping
//! - Configuration parsing from data attributes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Showreel Core                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │   UI input ──► ┌──────────────┐ ── commands ──► ┌─────────┐  │
//! │                │    Player    │                 │  Media  │  │
//! │                │  Controller  │ ◄── Adapter ─── │Resource │  │
//! │                └──────┬───────┘    (events)     └─────────┘  │
//! │                       │                                      │
//! │              ┌────────┴────────┐                             │
//! │              │                 │                             │
//! │       ┌──────┴──────┐   ┌──────┴──────┐                      │
//! │       │   Surface   │   │    State    │                      │
//! │       │  Renderer   │   │  Broadcast  │                      │
//! │       └─────────────┘   └─────────────┘                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use showreel_core::{create_player, MediaSource, PlayerConfig, PlayerStatus};
//! use showreel_core::sim::SimulatedMedia;
//! use showreel_core::surface::RecordingSurface;
//!
//! let config = PlayerConfig::showcase(vec![MediaSource::new("reel.mp4", "video/mp4")]);
//! let media = SimulatedMedia::new();
//! let host = media.handle();
//! let mut player = create_player(config, media, RecordingSurface::new());
//!
//! player.play().unwrap();
//! for event in host.resolve_play() {
//!     player.handle_event(event);
//! }
//! assert_eq!(player.status(), PlayerStatus::Playing);
//! ```

pub mod adapter;
pub mod config;
pub mod controller;
pub mod controls;
pub mod error;
pub mod media;
pub mod sim;
pub mod surface;
pub mod types;

pub use adapter::{translate, EventQueue, Transition};
pub use config::{parse_sources, MediaSource, PlayerConfig};
pub use controller::PlayerController;
pub use controls::{ControlAction, KeyTarget};
pub use error::{Error, MediaErrorCode, PlayerError, Result};
pub use media::{MediaCommand, MediaEvent, MediaResource, PlayAttempt};
pub use surface::{format_time, render, Overlay, SurfaceSink, SurfaceView};
pub use types::{PlayerId, PlayerState, PlayerStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a player bound to `media`, rendering into `surface`
pub fn create_player<M, S>(config: PlayerConfig, media: M, surface: S) -> PlayerController<M>
where
    M: MediaResource,
    S: SurfaceSink + 'static,
{
    PlayerController::new(config, media, surface)
}

/// Initialize the player library
pub fn init() {
    tracing::info!(version = VERSION, "Showreel Core initialized");
}
