//! lazyvid engine
//!
//! Headless platform for lazyvid: a document with a scrollable viewport,
//! intersection observers computed from layout rects, and video elements
//! with resource selection and an autoplay policy.
//!
//! # Example
//! ```rust,ignore
//! use lazyvid_core::{LazyVideo, LazyVideoConfig, VideoSource};
//! use lazyvid_engine::{DOMRect, Document};
//!
//! let document = Document::new(800.0, 600.0);
//! let video = document.create_video(DOMRect::new(0.0, 2000.0, 640.0, 360.0));
//! let lazy = LazyVideo::attach(document.clone(), video, vec![VideoSource::mp4("/a.mp4")], LazyVideoConfig::default());
//!
//! document.scroll_to(0.0, 1500.0);
//! document.update();
//! assert!(lazy.is_attached());
//! ```

pub mod geometry;
pub mod intersection;
pub mod media;
mod document;

pub use document::Document;
pub use geometry::{DOMRect, Length, RootMargin};
pub use intersection::{IntersectionObserver, IntersectionObserverEntry};
pub use media::{can_play_type, CanPlayType, HTMLMediaElement, NetworkState, ReadyState, VideoElement};

/// Node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn raw(self) -> u32 {
        self.0
    }
}
