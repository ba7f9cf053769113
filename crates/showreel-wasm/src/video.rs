//! `<video>` element as a media resource

use crate::binding::Binding;
use showreel_core::{MediaErrorCode, MediaEvent, MediaResource, PlayAttempt};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlVideoElement;

/// Media events the binding listens for on the video element
pub const MEDIA_EVENTS: [&str; 8] = [
    "loadstart",
    "loadedmetadata",
    "canplay",
    "play",
    "pause",
    "ended",
    "timeupdate",
    "error",
];

/// Route back to the owner, shared with in-flight play futures.
///
/// Cutting it in one place cuts it for every clone.
pub struct Link<T>(Rc<RefCell<Weak<T>>>);

impl<T> Link<T> {
    pub fn new(target: Weak<T>) -> Self {
        Self(Rc::new(RefCell::new(target)))
    }

    pub fn get(&self) -> Option<Rc<T>> {
        self.0.borrow().upgrade()
    }

    pub fn cut(&self) {
        *self.0.borrow_mut() = Weak::new();
    }
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// Wraps an `HtmlVideoElement`; play outcomes come back through the binding
pub struct VideoElementMedia {
    video: HtmlVideoElement,
    link: Link<Binding>,
}

impl VideoElementMedia {
    pub fn new(video: HtmlVideoElement, binding: Weak<Binding>) -> Self {
        Self {
            video,
            link: Link::new(binding),
        }
    }

    fn settle(&self, event: MediaEvent) {
        let link = self.link.clone();
        spawn_local(async move {
            if let Some(binding) = link.get() {
                binding.deliver(event);
            }
        });
    }
}

impl MediaResource for VideoElementMedia {
    fn load(&mut self) {
        self.video.load();
    }

    fn request_play(&mut self, attempt: PlayAttempt) {
        let promise = match self.video.play() {
            Ok(promise) => promise,
            Err(e) => {
                self.settle(MediaEvent::PlayRejected {
                    attempt,
                    reason: describe(&e),
                });
                return;
            }
        };

        let link = self.link.clone();
        spawn_local(async move {
            let event = match JsFuture::from(promise).await {
                Ok(_) => MediaEvent::PlayResolved { attempt },
                Err(e) => MediaEvent::PlayRejected {
                    attempt,
                    reason: describe(&e),
                },
            };
            // Checked after the await: detach may have run meanwhile.
            if let Some(binding) = link.get() {
                binding.deliver(event);
            }
        });
    }

    fn pause(&mut self) {
        if let Err(e) = self.video.pause() {
            web_sys::console::warn_2(&"[Showreel] pause failed".into(), &e);
        }
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.video.set_current_time(seconds);
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn detach(&mut self) {
        self.link.cut();
        while let Some(child) = self.video.first_element_child() {
            child.remove();
        }
        if let Err(e) = self.video.remove_attribute("src") {
            web_sys::console::warn_2(&"[Showreel] detach failed".into(), &e);
        }
        // Drops the buffered media and any network activity.
        self.video.load();
    }
}

/// Read the media event named `name` off the element
pub fn media_event(name: &str, video: &HtmlVideoElement) -> Option<MediaEvent> {
    let event = match name {
        "loadstart" => MediaEvent::LoadStart,
        "loadedmetadata" => MediaEvent::LoadedMetadata {
            duration: video.duration(),
        },
        "canplay" => MediaEvent::CanPlay,
        "play" => MediaEvent::Play,
        "pause" => MediaEvent::Pause,
        "ended" => MediaEvent::Ended,
        "timeupdate" => MediaEvent::TimeUpdate {
            current_time: video.current_time(),
        },
        "error" => match video.error() {
            Some(err) => MediaEvent::Error {
                code: MediaErrorCode::from_code(err.code()),
                message: err.message(),
            },
            None => MediaEvent::Error {
                code: MediaErrorCode::Unknown,
                message: String::new(),
            },
        },
        _ => return None,
    };
    Some(event)
}

/// Short reason for a rejected `play()` promise, e.g. `NotAllowedError`
fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        let name: String = err.name().into();
        let message: String = err.message().into();
        return if message.is_empty() { name } else { format!("{}: {}", name, message) };
    }
    value.as_string().unwrap_or_else(|| "play() rejected".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_link_reaches_earlier_clones() {
        let owner = Rc::new("binding".to_string());
        let link = Link::new(Rc::downgrade(&owner));
        let in_flight = link.clone();
        assert_eq!(in_flight.get().as_deref(), Some(&"binding".to_string()));

        link.cut();
        assert!(in_flight.get().is_none());
        assert!(link.get().is_none());
        // The owner itself is still alive.
        assert_eq!(Rc::strong_count(&owner), 1);
    }
}
