//! lazyvid core
//!
//! Viewport-deferred video loading.
//!
//! Features:
//! - Visibility trigger: one-shot "became visible" notification
//! - Playback toggle: play while visible, pause while not
//! - `LazyVideo`: attaches `<source>` children on first visibility
//!
//! Everything here is generic over a [`Platform`], which supplies the
//! intersection primitive, the media element and a local executor.
//!
//! # Example
//! ```rust,ignore
//! use lazyvid_core::{LazyVideo, LazyVideoConfig, VideoSource};
//!
//! let sources = vec![
//!     VideoSource::new("/clip.webm", "video/webm"),
//!     VideoSource::new("/clip.mp4", "video/mp4"),
//! ];
//! let video = LazyVideo::attach(platform, media, sources, LazyVideoConfig::default());
//! ```

pub mod error;
pub mod options;
pub mod source;
pub mod platform;
pub mod disposer;
pub mod trigger;
pub mod playback;
pub mod surface;

pub use error::{PlatformError, PlaybackError};
pub use options::ObserverOptions;
pub use source::VideoSource;
pub use platform::{
    IntersectionWatcher, LocalTask, MediaElement, ObserverCallback, Platform, PlayFuture,
    VisibilityEntry,
};
pub use disposer::Disposer;
pub use trigger::observe_once;
pub use playback::observe_playback;
pub use surface::{AttachmentState, LazyVideo, LazyVideoConfig};
