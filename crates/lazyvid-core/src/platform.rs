//! Platform seam
//!
//! The observers never touch a DOM directly. A [`Platform`] provides the
//! viewport-intersection primitive, media elements and a single-threaded
//! executor for playback requests.

use std::future::Future;
use std::pin::Pin;

use crate::{ObserverOptions, PlatformError, PlaybackError, VideoSource};

/// Pending result of a playback-start request
pub type PlayFuture = Pin<Box<dyn Future<Output = Result<(), PlaybackError>>>>;

/// Fire-and-forget task for [`Platform::spawn_local`]
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Receives a batch of entries and the watcher that produced them
pub type ObserverCallback<O> = Box<dyn FnMut(&[VisibilityEntry], &O)>;

/// One observation record of a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl VisibilityEntry {
    pub fn visible(intersection_ratio: f64) -> Self {
        Self {
            is_intersecting: true,
            intersection_ratio,
        }
    }

    pub fn hidden() -> Self {
        Self {
            is_intersecting: false,
            intersection_ratio: 0.0,
        }
    }
}

/// A live intersection watcher
pub trait IntersectionWatcher: 'static {
    type Element;

    fn observe(&self, target: &Self::Element);

    /// Stop watching one target; the watcher itself stays alive
    fn unobserve(&self, target: &Self::Element);

    /// Stop watching everything. Must be idempotent.
    fn disconnect(&self);
}

/// A video element the surface can fill with sources and drive
pub trait MediaElement: Clone + 'static {
    type Element;

    /// The element to hand to an intersection watcher
    fn element(&self) -> Self::Element;

    /// Append a `<source>` child
    fn append_source(&self, source: &VideoSource) -> Result<(), PlatformError>;

    /// Restart resource selection
    fn load(&self);

    /// Request playback. The request is issued immediately; the future
    /// only reports whether the platform accepted it.
    fn play(&self) -> PlayFuture;

    fn pause(&self);
}

/// Host environment
pub trait Platform: Clone + 'static {
    type Element: Clone + 'static;
    type Observer: IntersectionWatcher<Element = Self::Element>;
    type Media: MediaElement<Element = Self::Element>;

    /// Create a watcher. Returns [`PlatformError::NoViewport`] when there
    /// is nothing to intersect with.
    fn create_observer(
        &self,
        callback: ObserverCallback<Self::Observer>,
        options: &ObserverOptions,
    ) -> Result<Self::Observer, PlatformError>;

    fn spawn_local(&self, task: LocalTask);
}

/// Create a watcher, degrading every failure to `None`
pub(crate) fn create_watcher<P: Platform>(
    platform: &P,
    callback: ObserverCallback<P::Observer>,
    options: &ObserverOptions,
) -> Option<P::Observer> {
    match platform.create_observer(callback, options) {
        Ok(observer) => Some(observer),
        Err(PlatformError::NoViewport) => None,
        Err(err) => {
            tracing::warn!("Cannot create intersection observer: {}", err);
            None
        }
    }
}
