//! Media Elements
//!
//! HTMLVideoElement with `<source>` children and resource selection.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use lazyvid_core::{MediaElement, PlatformError, PlayFuture, PlaybackError, VideoSource};

use crate::document::DocumentInner;
use crate::NodeId;

/// Network state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkState {
    #[default]
    Empty = 0,
    Idle = 1,
    Loading = 2,
    NoSource = 3,
}

/// Ready state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// Can play type result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanPlayType {
    Empty,
    Maybe,
    Probably,
}

/// Check if a MIME type is playable
pub fn can_play_type(mime_type: &str) -> CanPlayType {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    match essence {
        "video/mp4" | "video/webm" => CanPlayType::Probably,
        "video/ogg" | "video/quicktime" => CanPlayType::Maybe,
        _ => CanPlayType::Empty,
    }
}

/// Media element state
#[derive(Debug, Default)]
pub struct HTMLMediaElement {
    pub sources: Vec<VideoSource>,
    pub current_src: String,
    pub network_state: NetworkState,
    pub ready_state: ReadyState,
    pub paused: bool,
    pub muted: bool,

    // Call counters
    pub load_requests: u32,
    pub play_requests: u32,
    pub pause_requests: u32,
}

impl HTMLMediaElement {
    pub fn new() -> Self {
        Self {
            paused: true,
            ..Self::default()
        }
    }

    /// Restart resource selection over the `<source>` children
    pub fn load(&mut self) {
        self.load_requests += 1;
        self.paused = true;

        match self.sources.iter().find(|s| can_play_type(&s.mime_type) != CanPlayType::Empty) {
            Some(source) => {
                self.current_src = source.src.clone();
                self.network_state = NetworkState::Loading;
                self.ready_state = ReadyState::HaveEnoughData;
            }
            None => {
                self.current_src.clear();
                self.network_state = NetworkState::NoSource;
                self.ready_state = ReadyState::HaveNothing;
            }
        }
    }

    /// Start playback
    pub fn play(&mut self, user_activation: bool) -> Result<(), PlaybackError> {
        self.play_requests += 1;

        if self.current_src.is_empty() {
            return Err(PlaybackError::NotSupported("no playable source".into()));
        }
        if !self.muted && !user_activation {
            return Err(PlaybackError::NotAllowed("unmuted autoplay without user activation".into()));
        }
        self.paused = false;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.pause_requests += 1;
        self.paused = true;
    }
}

/// HTML Video Element
#[derive(Debug, Clone)]
pub struct VideoElement {
    node: NodeId,
    state: Rc<RefCell<HTMLMediaElement>>,
    document: Weak<RefCell<DocumentInner>>,
}

impl VideoElement {
    pub(crate) fn new(node: NodeId, document: Weak<RefCell<DocumentInner>>) -> Self {
        Self {
            node,
            state: Rc::new(RefCell::new(HTMLMediaElement::new())),
            document,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn set_muted(&self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    pub fn sources(&self) -> Vec<VideoSource> {
        self.state.borrow().sources.clone()
    }

    pub fn current_src(&self) -> String {
        self.state.borrow().current_src.clone()
    }

    pub fn network_state(&self) -> NetworkState {
        self.state.borrow().network_state
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    pub fn load_requests(&self) -> u32 {
        self.state.borrow().load_requests
    }

    pub fn play_requests(&self) -> u32 {
        self.state.borrow().play_requests
    }

    pub fn pause_requests(&self) -> u32 {
        self.state.borrow().pause_requests
    }

    fn user_activation(&self) -> bool {
        self.document
            .upgrade()
            .is_some_and(|document| document.borrow().user_activation)
    }
}

impl MediaElement for VideoElement {
    type Element = NodeId;

    fn element(&self) -> NodeId {
        self.node
    }

    fn append_source(&self, source: &VideoSource) -> Result<(), PlatformError> {
        if source.src.is_empty() {
            return Err(PlatformError::Dom("source without src".into()));
        }
        self.state.borrow_mut().sources.push(source.clone());
        Ok(())
    }

    fn load(&self) {
        let mut state = self.state.borrow_mut();
        state.load();
        tracing::debug!("Video {:?} selected {:?}", self.node, state.current_src);
    }

    fn play(&self) -> PlayFuture {
        let activation = self.user_activation();
        let result = self.state.borrow_mut().play(activation);
        Box::pin(async move { result })
    }

    fn pause(&self) {
        self.state.borrow_mut().pause();
    }
}
