//! Player markup built inside the mount point, and the DOM surface sink

use showreel_core::{surface::ICON_PLAY, Overlay, PlayerConfig, SurfaceSink, SurfaceView};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlVideoElement};

/// The control bar, present only when controls are shown
pub struct ControlElements {
    pub bar: HtmlElement,
    pub play_pause: HtmlElement,
    pub progress: HtmlElement,
    pub progress_filled: HtmlElement,
    pub current_time: HtmlElement,
    pub duration: HtmlElement,
    pub mute: HtmlElement,
}

/// Explicit references to every element the player touches
pub struct SurfaceElements {
    pub root: HtmlElement,
    pub video: HtmlVideoElement,
    /// Last `<source>`; its error means no source was playable
    pub last_source: Option<Element>,
    pub poster: Option<HtmlElement>,
    pub overlay: HtmlElement,
    pub play_button: HtmlElement,
    pub loading: HtmlElement,
    pub error: HtmlElement,
    pub error_message: HtmlElement,
    pub retry: HtmlElement,
    pub controls: Option<ControlElements>,
}

impl SurfaceElements {
    /// Replace the mount point's children with the player markup
    pub fn build(
        document: &Document,
        mount: &HtmlElement,
        config: &PlayerConfig,
    ) -> Result<Self, JsValue> {
        let root = html(document, "div", "video-player")?;
        root.set_attribute("tabindex", "0")?;

        let video: HtmlVideoElement = document.create_element("video")?.unchecked_into();
        video.set_class_name("video-player__video");
        video.set_muted(config.muted);
        video.set_default_muted(config.muted);
        // No native `loop`: the controller restarts on `ended` itself.
        video.set_attribute("preload", "metadata")?;
        video.set_attribute("playsinline", "")?;

        let mut last_source = None;
        for source in &config.sources {
            let el = document.create_element("source")?;
            el.set_attribute("src", &source.uri)?;
            if let Some(mime) = &source.mime_type {
                el.set_attribute("type", mime)?;
            }
            video.append_child(&el)?;
            last_source = Some(el);
        }
        root.append_child(&video)?;

        let poster = match &config.poster {
            Some(src) => {
                let img = html(document, "img", "video-player__poster")?;
                img.set_attribute("src", src)?;
                img.set_attribute("alt", "")?;
                root.append_child(&img)?;
                Some(img)
            }
            None => None,
        };

        let overlay = html(document, "div", "video-player__overlay")?;
        let play_button = button(document, "video-player__play-btn", "Play video")?;
        play_button.set_text_content(Some(ICON_PLAY));
        overlay.append_child(&play_button)?;
        root.append_child(&overlay)?;

        let loading = html(document, "div", "video-player__loading")?;
        let spinner = html(document, "div", "video-player__spinner")?;
        loading.append_child(&spinner)?;
        root.append_child(&loading)?;

        let error = html(document, "div", "video-player__error")?;
        let error_message = html(document, "p", "video-player__error-message")?;
        let retry = button(document, "video-player__retry", "Retry")?;
        retry.set_text_content(Some("Retry"));
        error.append_child(&error_message)?;
        error.append_child(&retry)?;
        root.append_child(&error)?;

        let controls = if config.show_controls {
            let controls = ControlElements::build(document)?;
            root.append_child(&controls.bar)?;
            Some(controls)
        } else {
            None
        };

        mount.set_inner_html("");
        mount.append_child(&root)?;

        Ok(Self {
            root,
            video,
            last_source,
            poster,
            overlay,
            play_button,
            loading,
            error,
            error_message,
            retry,
            controls,
        })
    }
}

impl ControlElements {
    fn build(document: &Document) -> Result<Self, JsValue> {
        let bar = html(document, "div", "video-player__controls")?;

        let play_pause = button(
            document,
            "video-player__control video-player__play-pause",
            "Play video",
        )?;
        play_pause.set_text_content(Some(ICON_PLAY));

        let progress = html(document, "div", "video-player__progress")?;
        progress.set_attribute("role", "slider")?;
        progress.set_attribute("tabindex", "0")?;
        progress.set_attribute("aria-label", "Seek")?;
        progress.set_attribute("aria-valuemin", "0")?;
        progress.set_attribute("aria-valuemax", "100")?;
        progress.set_attribute("aria-valuenow", "0")?;
        let progress_filled = html(document, "div", "video-player__progress-filled")?;
        progress.append_child(&progress_filled)?;

        let time = html(document, "div", "video-player__time")?;
        let current_time = html(document, "span", "video-player__current")?;
        let separator = html(document, "span", "video-player__separator")?;
        separator.set_text_content(Some(" / "));
        let duration = html(document, "span", "video-player__duration")?;
        time.append_child(&current_time)?;
        time.append_child(&separator)?;
        time.append_child(&duration)?;

        let mute = button(document, "video-player__control video-player__mute", "Unmute")?;

        bar.append_child(&play_pause)?;
        bar.append_child(&progress)?;
        bar.append_child(&time)?;
        bar.append_child(&mute)?;

        Ok(Self {
            bar,
            play_pause,
            progress,
            progress_filled,
            current_time,
            duration,
            mute,
        })
    }
}

fn html(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element(tag)?.unchecked_into();
    el.set_class_name(class);
    Ok(el)
}

fn button(document: &Document, class: &str, label: &str) -> Result<HtmlElement, JsValue> {
    let el = html(document, "button", class)?;
    el.set_attribute("type", "button")?;
    el.set_attribute("aria-label", label)?;
    Ok(el)
}

/// Writes rendered views into the player markup
pub struct DomSurface {
    elements: Rc<SurfaceElements>,
}

impl DomSurface {
    pub fn new(elements: Rc<SurfaceElements>) -> Self {
        Self { elements }
    }

    fn write(&self, view: &SurfaceView) -> Result<(), JsValue> {
        let el = &self.elements;

        let classes = el.root.class_list();
        for class in ["playing", "loading", "error", "disabled"] {
            classes.toggle_with_force(class, view.has_class(class))?;
        }

        show(&el.overlay, view.show_play_button)?;
        show(&el.loading, view.overlay == Overlay::Loading)?;
        match &view.overlay {
            Overlay::Error { message } => {
                el.error_message.set_text_content(Some(message));
                show(&el.error, true)?;
            }
            _ => show(&el.error, false)?,
        }
        if let Some(poster) = &el.poster {
            show(poster, view.show_poster)?;
        }

        el.play_button
            .toggle_attribute_with_force("disabled", !view.controls_enabled)?;

        if let Some(controls) = &el.controls {
            controls
                .progress_filled
                .style()
                .set_property("width", &view.progress_width())?;
            let percent = format!("{}", (view.progress * 100.0).round());
            controls.progress.set_attribute("aria-valuenow", &percent)?;
            controls.current_time.set_text_content(Some(&view.current_label));
            controls.duration.set_text_content(Some(&view.duration_label));

            controls.play_pause.set_text_content(Some(view.play_icon));
            controls.play_pause.set_attribute("aria-label", view.play_label)?;
            controls.mute.set_text_content(Some(view.mute_icon));
            controls.mute.set_attribute("aria-label", view.mute_label)?;

            for button in [&controls.play_pause, &controls.mute] {
                button.toggle_attribute_with_force("disabled", !view.controls_enabled)?;
            }
        }
        Ok(())
    }
}

impl SurfaceSink for DomSurface {
    fn apply(&mut self, view: &SurfaceView) {
        if let Err(e) = self.write(view) {
            web_sys::console::warn_2(&"[Showreel] surface update failed".into(), &e);
        }
    }
}

fn show(el: &HtmlElement, visible: bool) -> Result<(), JsValue> {
    if visible {
        el.style().remove_property("display").map(|_| ())
    } else {
        el.style().set_property("display", "none")
    }
}
