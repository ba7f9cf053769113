//! Showreel WASM - Browser Binding for the Video Player Widget
//!
//! Builds the player markup inside a mount point, drives the `<video>` element
//! through the core controller, and renders every state change back into the DOM.
//!
//! ## Usage
//!
//! ```javascript
//! import init, { createPlayer, createPlayerFromDataset } from '@showreel/wasm';
//!
//! await init();
//! const player = createPlayer(document.querySelector('#reel'), {
//!     sources: [{ src: '/media/reel.mp4', type: 'video/mp4' }],
//!     poster: '/media/reel.jpg',
//! });
//! player.play();
//!
//! // Or from data attributes:
//! // <div data-video-player data-sources='[{"src":"/media/reel.mp4"}]'></div>
//! document.querySelectorAll('[data-video-player]').forEach(createPlayerFromDataset);
//! ```

use showreel_core::{Error, PlayerConfig, PlayerController};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

mod binding;
mod markup;
mod video;

use binding::Binding;
use video::VideoElementMedia;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"[Showreel WASM] Initialized".into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Mount a player in `mount` configured by a JS object.
///
/// `config` takes the same shape as the data attributes
/// (`autoplay`, `muted`, `loop`, `controls`, `poster`, `sources`).
/// `undefined` gives the default config, which has no sources and so
/// renders with its controls disabled.
#[wasm_bindgen(js_name = createPlayer)]
pub fn create_player(mount: HtmlElement, config: JsValue) -> Result<ShowreelPlayer, JsValue> {
    let config: PlayerConfig = if config.is_undefined() || config.is_null() {
        PlayerConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    ShowreelPlayer::mount(&mount, config)
}

/// Mount a player configured from the mount point's `data-*` attributes
#[wasm_bindgen(js_name = createPlayerFromDataset)]
pub fn create_player_from_dataset(mount: HtmlElement) -> Result<ShowreelPlayer, JsValue> {
    let config =
        PlayerConfig::from_attributes(|name| mount.get_attribute(&format!("data-{}", name)));
    ShowreelPlayer::mount(&mount, config)
}

/// Handle to a mounted player
#[wasm_bindgen]
pub struct ShowreelPlayer {
    binding: Rc<Binding>,
}

impl ShowreelPlayer {
    fn mount(mount: &HtmlElement, config: PlayerConfig) -> Result<Self, JsValue> {
        Ok(Self {
            binding: Binding::mount(mount, config)?,
        })
    }

    fn run<F>(&self, f: F) -> Result<(), JsValue>
    where
        F: FnOnce(&mut PlayerController<VideoElementMedia>) -> Result<(), Error>,
    {
        self.binding
            .command(f)?
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[wasm_bindgen]
impl ShowreelPlayer {
    /// Start playback
    pub fn play(&self) -> Result<(), JsValue> {
        self.run(|c| c.play())
    }

    /// Pause playback
    pub fn pause(&self) -> Result<(), JsValue> {
        self.run(|c| c.pause())
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) -> Result<(), JsValue> {
        self.run(|c| c.toggle_play())
    }

    /// Seek to `seconds`, clamped to the duration
    pub fn seek(&self, seconds: f64) -> Result<(), JsValue> {
        self.run(|c| c.seek(seconds))
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> Result<(), JsValue> {
        self.run(|c| c.toggle_mute())
    }

    /// Reload after an error
    pub fn retry(&self) -> Result<(), JsValue> {
        self.run(|c| c.retry())
    }

    /// Remove listeners and release the video element. Safe to call twice.
    pub fn destroy(&self) {
        self.binding.destroy();
    }

    /// Read-only state snapshot
    /// (`{ status, currentTime, duration, muted, lastError? }`)
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self.binding.state()?;
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }

    /// Current status name, e.g. `"playing"`
    pub fn status(&self) -> Result<String, JsValue> {
        Ok(self.binding.state()?.status.to_string())
    }
}

impl Drop for ShowreelPlayer {
    fn drop(&mut self) {
        self.binding.destroy();
    }
}
