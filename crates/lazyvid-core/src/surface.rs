//! Lazy video surface
//!
//! Owns one media element and its candidate sources. Sources are appended
//! the first time the element becomes visible; after that, playback can
//! optionally follow visibility.
//!
//! The source list and the loaded callback are read when the element first
//! becomes visible, not when observation starts, so both can change while
//! the video is still waiting.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{observe_once, observe_playback, Disposer, MediaElement, ObserverOptions, Platform, VideoSource};

/// Whether sources have been attached for this mount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttachmentState {
    #[default]
    Unattached,
    Attached,
}

/// Lazy video configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyVideoConfig {
    /// Visible fraction required before loading starts
    pub threshold: f64,
    /// Margin around the viewport, so loading starts slightly early
    pub root_margin: String,
    /// Pause while off-screen, resume when back
    pub pause_on_leave: bool,
}

impl Default for LazyVideoConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: "200px".to_string(),
            pause_on_leave: false,
        }
    }
}

impl LazyVideoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }

    pub fn with_pause_on_leave(mut self, pause_on_leave: bool) -> Self {
        self.pause_on_leave = pause_on_leave;
        self
    }

    /// Options for the loading trigger
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions::new()
            .with_threshold(self.threshold)
            .with_root_margin(self.root_margin.clone())
    }
}

struct Shared<P: Platform> {
    platform: P,
    media: P::Media,
    sources: RefCell<Vec<VideoSource>>,
    on_loaded: RefCell<Option<Rc<dyn Fn()>>>,
    state: Cell<AttachmentState>,
    pause_on_leave: Cell<bool>,
    detached: Cell<bool>,
    playback: RefCell<Option<Disposer>>,
}

impl<P: Platform> Shared<P> {
    fn attach_sources(&self) {
        if self.detached.get() || self.state.get() == AttachmentState::Attached {
            return;
        }

        let sources = self.sources.borrow().clone();
        if sources.is_empty() {
            tracing::debug!("Video became visible with no sources, staying unattached");
            return;
        }

        for source in &sources {
            if let Err(err) = self.media.append_source(source) {
                tracing::warn!("Cannot append source {}: {}", source.src, err);
            }
        }
        self.media.load();
        self.state.set(AttachmentState::Attached);
        tracing::debug!("Attached {} sources", sources.len());

        self.sync_playback();

        let on_loaded = self.on_loaded.borrow().clone();
        if let Some(on_loaded) = on_loaded {
            on_loaded();
        }
    }

    /// Rebuild the playback toggle from the current state
    fn sync_playback(&self) {
        let previous = self.playback.borrow_mut().take();
        drop(previous);

        let wanted = !self.detached.get()
            && self.state.get() == AttachmentState::Attached
            && self.pause_on_leave.get();
        if wanted {
            let playback = observe_playback(&self.platform, Some(&self.media), &ObserverOptions::default());
            *self.playback.borrow_mut() = playback;
        }
    }
}

/// A mounted lazy video
///
/// Dropping it (or calling [`detach`](LazyVideo::detach)) tears down every
/// observer it created, exactly once.
pub struct LazyVideo<P: Platform> {
    shared: Rc<Shared<P>>,
    config: LazyVideoConfig,
    trigger: Option<Disposer>,
}

impl<P: Platform> LazyVideo<P> {
    /// Start waiting for `media` to become visible
    pub fn attach(
        platform: P,
        media: P::Media,
        sources: Vec<VideoSource>,
        config: LazyVideoConfig,
    ) -> Self {
        let shared = Rc::new(Shared {
            platform,
            media,
            sources: RefCell::new(sources),
            on_loaded: RefCell::new(None),
            state: Cell::new(AttachmentState::Unattached),
            pause_on_leave: Cell::new(config.pause_on_leave),
            detached: Cell::new(false),
            playback: RefCell::new(None),
        });

        let mut video = Self {
            shared,
            config,
            trigger: None,
        };
        video.observe_visibility();
        video
    }

    fn observe_visibility(&mut self) {
        self.trigger = None;
        if self.shared.detached.get() || self.shared.state.get() == AttachmentState::Attached {
            return;
        }

        let shared = Rc::downgrade(&self.shared);
        let target = self.shared.media.element();
        self.trigger = observe_once(
            &self.shared.platform,
            Some(&target),
            move || {
                if let Some(shared) = shared.upgrade() {
                    shared.attach_sources();
                }
            },
            &self.config.observer_options(),
        );
    }

    /// Apply new configuration
    ///
    /// A changed threshold or root margin restarts the loading trigger
    /// (only while still unattached). A changed `pause_on_leave` rebuilds
    /// the playback toggle.
    pub fn update(&mut self, config: LazyVideoConfig) {
        if self.shared.detached.get() {
            return;
        }

        let trigger_changed =
            config.threshold != self.config.threshold || config.root_margin != self.config.root_margin;
        let playback_changed = config.pause_on_leave != self.config.pause_on_leave;
        self.config = config;

        if trigger_changed {
            self.observe_visibility();
        }
        if playback_changed {
            self.shared.pause_on_leave.set(self.config.pause_on_leave);
            self.shared.sync_playback();
        }
    }

    /// Replace the sources used at first visibility
    ///
    /// Has no effect on a video that is already attached.
    pub fn set_sources(&self, sources: Vec<VideoSource>) {
        *self.shared.sources.borrow_mut() = sources;
    }

    /// Set the callback invoked once sources are attached
    pub fn set_on_loaded(&self, on_loaded: impl Fn() + 'static) {
        *self.shared.on_loaded.borrow_mut() = Some(Rc::new(on_loaded));
    }

    pub fn clear_on_loaded(&self) {
        *self.shared.on_loaded.borrow_mut() = None;
    }

    pub fn state(&self) -> AttachmentState {
        self.shared.state.get()
    }

    pub fn is_attached(&self) -> bool {
        self.state() == AttachmentState::Attached
    }

    /// Is the playback toggle currently wired
    pub fn is_toggling_playback(&self) -> bool {
        self.shared.playback.borrow().is_some()
    }

    /// Is the loading trigger still alive
    pub fn is_waiting(&self) -> bool {
        self.trigger.is_some()
    }

    pub fn config(&self) -> &LazyVideoConfig {
        &self.config
    }

    pub fn media(&self) -> &P::Media {
        &self.shared.media
    }

    pub fn is_detached(&self) -> bool {
        self.shared.detached.get()
    }

    /// Tear down all observers. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if self.shared.detached.replace(true) {
            return;
        }
        self.trigger = None;
        let playback = self.shared.playback.borrow_mut().take();
        drop(playback);
        tracing::debug!("Lazy video detached ({:?})", self.shared.state.get());
    }
}

impl<P: Platform> Drop for LazyVideo<P> {
    fn drop(&mut self) {
        self.detach();
    }
}
