//! lazyvid web
//!
//! Browser platform for lazyvid, over `web-sys`. Only built for `wasm32`.
//!
//! # Example
//! ```rust,ignore
//! use lazyvid_core::{LazyVideo, LazyVideoConfig, VideoSource};
//! use lazyvid_web::{WebPlatform, WebVideo};
//!
//! let platform = WebPlatform::new()?;
//! let video = WebVideo::from(video_element);
//! let lazy = LazyVideo::attach(platform, video, sources, LazyVideoConfig::default());
//! ```

#![cfg(target_arch = "wasm32")]

mod media;
mod observer;

pub use media::WebVideo;
pub use observer::WebObserver;

use lazyvid_core::{LocalTask, ObserverCallback, ObserverOptions, Platform, PlatformError};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlVideoElement};

/// The browser window as a lazyvid platform
#[derive(Debug, Clone)]
pub struct WebPlatform {
    document: Document,
}

impl WebPlatform {
    /// Fails with [`PlatformError::NoViewport`] outside a browser window
    pub fn new() -> Result<Self, PlatformError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(PlatformError::NoViewport)?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Create a detached `<video>` element
    pub fn create_video(&self) -> Result<WebVideo, PlatformError> {
        let video: HtmlVideoElement = self
            .document
            .create_element("video")
            .map_err(|e| PlatformError::Dom(format!("Failed to create video element: {:?}", e)))?
            .dyn_into()
            .map_err(|_| PlatformError::Dom("Element is not a video".to_string()))?;
        Ok(WebVideo::from(video))
    }
}

impl Platform for WebPlatform {
    type Element = Element;
    type Observer = WebObserver;
    type Media = WebVideo;

    fn create_observer(
        &self,
        callback: ObserverCallback<WebObserver>,
        options: &ObserverOptions,
    ) -> Result<WebObserver, PlatformError> {
        if web_sys::window().is_none() {
            return Err(PlatformError::NoViewport);
        }
        WebObserver::new(callback, options)
    }

    fn spawn_local(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
