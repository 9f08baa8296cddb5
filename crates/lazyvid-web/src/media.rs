//! Video element wrapper

use lazyvid_core::{MediaElement, PlatformError, PlayFuture, PlaybackError, VideoSource};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, Element, HtmlSourceElement, HtmlVideoElement};

/// An `HtmlVideoElement` driven by lazyvid
#[derive(Debug, Clone)]
pub struct WebVideo {
    video: HtmlVideoElement,
}

impl WebVideo {
    pub fn video(&self) -> &HtmlVideoElement {
        &self.video
    }
}

impl From<HtmlVideoElement> for WebVideo {
    fn from(video: HtmlVideoElement) -> Self {
        Self { video }
    }
}

fn dom_error(err: JsValue) -> PlatformError {
    PlatformError::Dom(format!("{:?}", err))
}

/// Map a rejected `play()` onto [`PlaybackError`]
fn playback_error(err: JsValue) -> PlaybackError {
    match err.dyn_ref::<DomException>() {
        Some(exception) => match exception.name().as_str() {
            "NotAllowedError" => PlaybackError::NotAllowed(exception.message()),
            "NotSupportedError" => PlaybackError::NotSupported(exception.message()),
            _ => PlaybackError::Aborted(exception.message()),
        },
        None => PlaybackError::Aborted(format!("{:?}", err)),
    }
}

impl MediaElement for WebVideo {
    type Element = Element;

    fn element(&self) -> Element {
        self.video.clone().into()
    }

    fn append_source(&self, source: &VideoSource) -> Result<(), PlatformError> {
        let document = self
            .video
            .owner_document()
            .ok_or_else(|| PlatformError::Dom("Video has no owner document".to_string()))?;
        let element: HtmlSourceElement = document
            .create_element("source")
            .map_err(dom_error)?
            .dyn_into()
            .map_err(|_| PlatformError::Dom("Element is not a source".to_string()))?;
        element.set_src(&source.src);
        element.set_type(&source.mime_type);
        self.video.append_child(&element).map_err(dom_error)?;
        Ok(())
    }

    fn load(&self) {
        self.video.load();
    }

    fn play(&self) -> PlayFuture {
        match self.video.play() {
            Ok(promise) => {
                let pending = JsFuture::from(promise);
                Box::pin(async move { pending.await.map(|_| ()).map_err(playback_error) })
            }
            Err(err) => {
                let err = playback_error(err);
                Box::pin(async move { Err(err) })
            }
        }
    }

    fn pause(&self) {
        if let Err(err) = self.video.pause() {
            tracing::debug!("pause() threw: {:?}", err);
        }
    }
}
