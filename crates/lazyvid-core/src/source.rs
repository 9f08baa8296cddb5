//! Media source descriptors

use serde::{Deserialize, Serialize};

/// One candidate resource for a media element
///
/// A list of these is in preference order; the media element picks the
/// first one it can play.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoSource {
    pub src: String,
    /// MIME type, e.g. `video/webm`
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl VideoSource {
    pub fn new(src: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn mp4(src: impl Into<String>) -> Self {
        Self::new(src, "video/mp4")
    }

    pub fn webm(src: impl Into<String>) -> Self {
        Self::new(src, "video/webm")
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for VideoSource {
    fn from((src, mime_type): (S, T)) -> Self {
        Self::new(src, mime_type)
    }
}
