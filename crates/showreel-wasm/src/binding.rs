//! Wires the DOM to a player controller
//!
//! Every input (media events, play promise outcomes, control clicks, keys)
//! goes through one [`EventQueue`], so the controller sees a single ordered
//! stream even when the browser fires events from inside a command.

use crate::markup::{DomSurface, SurfaceElements};
use crate::video::{media_event, VideoElementMedia, MEDIA_EVENTS};
use showreel_core::{
    ControlAction, EventQueue, KeyTarget, MediaErrorCode, MediaEvent, PlayerConfig,
    PlayerController, PlayerState,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent};

type Controller = PlayerController<VideoElementMedia>;

/// A registered DOM listener, removed on destroy
struct Listener {
    target: EventTarget,
    name: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

pub struct Binding {
    controller: RefCell<Controller>,
    queue: EventQueue,
    elements: Rc<SurfaceElements>,
    listeners: RefCell<Vec<Listener>>,
}

impl Binding {
    /// Build the markup inside `mount` and start a player on it
    pub fn mount(mount: &HtmlElement, config: PlayerConfig) -> Result<Rc<Self>, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let elements = Rc::new(SurfaceElements::build(&document, mount, &config)?);

        let binding = Rc::new_cyclic(|weak: &Weak<Binding>| {
            let media = VideoElementMedia::new(elements.video.clone(), weak.clone());
            let surface = DomSurface::new(elements.clone());
            Binding {
                controller: RefCell::new(PlayerController::new(config, media, surface)),
                queue: EventQueue::new(),
                elements: elements.clone(),
                listeners: RefCell::new(Vec::new()),
            }
        });

        binding.wire()?;
        Ok(binding)
    }

    /// Deliver a media event in order with everything else
    pub fn deliver(&self, event: MediaEvent) {
        self.queue.deliver(event, |event| self.apply(event));
    }

    /// Run a command against the controller, holding back events it triggers
    pub fn command<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> Result<R, JsValue> {
        self.queue.hold(
            || match self.controller.try_borrow_mut() {
                Ok(mut controller) => Ok(f(&mut controller)),
                Err(_) => Err(JsValue::from_str("player is busy")),
            },
            |event| self.apply(event),
        )
    }

    /// Run a control action from a DOM listener; failures are logged
    fn perform(&self, action: ControlAction) {
        match self.command(|c| c.perform(action)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(?action, error = %e, "Control action refused"),
            Err(e) => web_sys::console::warn_2(&"[Showreel] control action dropped".into(), &e),
        }
    }

    fn apply(&self, event: MediaEvent) {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.handle_event(event),
            Err(_) => {
                let message = format!("[Showreel] dropped {} event", event.name());
                web_sys::console::warn_1(&message.into());
            }
        }
    }

    /// Remove listeners, then release the media resource. Idempotent.
    pub fn destroy(&self) {
        for listener in self.listeners.borrow_mut().drain(..) {
            let callback = listener.callback.as_ref().unchecked_ref();
            if let Err(e) = listener
                .target
                .remove_event_listener_with_callback(listener.name, callback)
            {
                web_sys::console::warn_2(&"[Showreel] listener removal failed".into(), &e);
            }
        }
        self.queue.clear();
        if let Err(e) = self.command(|c| c.destroy()) {
            web_sys::console::warn_2(&"[Showreel] destroy failed".into(), &e);
        }
    }

    fn wire(self: &Rc<Self>) -> Result<(), JsValue> {
        let el = &self.elements;

        for name in MEDIA_EVENTS {
            let video = el.video.clone();
            self.listen(&el.video, name, move |binding, _| {
                if let Some(event) = media_event(name, &video) {
                    binding.deliver(event);
                }
            })?;
        }

        // When every <source> fails the error fires on the last one, not the video.
        if let Some(source) = &el.last_source {
            self.listen(source, "error", |binding, _| {
                binding.deliver(MediaEvent::Error {
                    code: MediaErrorCode::SrcNotSupported,
                    message: "no playable source".to_string(),
                });
            })?;
        }

        // Clicks on the big play button bubble to the overlay.
        self.listen(&el.overlay, "click", |binding, _| {
            binding.perform(ControlAction::TogglePlay)
        })?;
        self.listen(&el.retry, "click", |binding, _| {
            binding.perform(ControlAction::Retry)
        })?;

        if let Some(controls) = &el.controls {
            self.listen(&controls.play_pause, "click", |binding, _| {
                binding.perform(ControlAction::TogglePlay)
            })?;
            self.listen(&controls.mute, "click", |binding, _| {
                binding.perform(ControlAction::ToggleMute)
            })?;

            let progress = controls.progress.clone();
            self.listen(&controls.progress, "click", move |binding, event| {
                let Some(click) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = progress.get_bounding_client_rect();
                let offset = f64::from(click.client_x()) - rect.left();
                if let Some(action) = ControlAction::from_progress_click(offset, rect.width()) {
                    binding.perform(action);
                }
            })?;
        }

        let progress: Option<JsValue> = el.controls.as_ref().map(|c| c.progress.clone().into());
        self.listen(&el.root, "keydown", move |binding, event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let on_progress = match (event.target(), &progress) {
                (Some(target), Some(progress)) => JsValue::from(target) == *progress,
                _ => false,
            };
            let target = if on_progress { KeyTarget::ProgressBar } else { KeyTarget::Player };
            if let Some(action) = ControlAction::from_key(&key.key(), target) {
                event.prevent_default();
                binding.perform(action);
            }
        })?;

        Ok(())
    }

    fn listen<F>(
        self: &Rc<Self>,
        target: &EventTarget,
        name: &'static str,
        mut handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(&Binding, &Event) + 'static,
    {
        let weak = Rc::downgrade(self);
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(binding) = weak.upgrade() {
                handler(&binding, &event);
            }
        });
        target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push(Listener {
            target: target.clone(),
            name,
            callback,
        });
        Ok(())
    }

    /// Snapshot of the controller state
    pub fn state(&self) -> Result<PlayerState, JsValue> {
        self.controller
            .try_borrow()
            .map(|c| c.state())
            .map_err(|_| JsValue::from_str("player is busy"))
    }
}
