//! Error types
//!
//! Nothing in this crate is fatal. These errors only travel between a
//! [`Platform`](crate::Platform) and the observers, which log and drop them.

/// Failure reported by a platform while setting up observation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlatformError {
    /// No viewport exists (headless or non-browser context)
    #[error("No viewport available")]
    NoViewport,

    #[error("Invalid root margin: {0}")]
    InvalidRootMargin(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(f64),

    #[error("DOM error: {0}")]
    Dom(String),
}

/// Rejection of a playback-start request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// Autoplay policy refused to start playback
    #[error("Not allowed: {0}")]
    NotAllowed(String),

    /// No playable source
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Interrupted by `pause()` or `load()`
    #[error("Aborted: {0}")]
    Aborted(String),
}
