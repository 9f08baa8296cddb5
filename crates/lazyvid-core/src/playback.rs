//! Playback toggle
//!
//! Plays a media element while it intersects the viewport and pauses it
//! otherwise, for as long as the observation lives.

use crate::platform::create_watcher;
use crate::{Disposer, IntersectionWatcher, MediaElement, ObserverOptions, Platform, VisibilityEntry};

/// Toggle playback of `media` on every visibility batch
///
/// Rejected play requests are logged at debug level and dropped.
pub fn observe_playback<P: Platform>(
    platform: &P,
    media: Option<&P::Media>,
    options: &ObserverOptions,
) -> Option<Disposer> {
    let media = media?.clone();
    let target = media.element();
    let spawner = platform.clone();

    let callback = Box::new(move |entries: &[VisibilityEntry], _: &P::Observer| {
        let Some(entry) = entries.first() else {
            return;
        };
        if entry.is_intersecting {
            tracing::trace!("Media entered viewport, playing");
            let request = media.play();
            spawner.spawn_local(Box::pin(async move {
                if let Err(err) = request.await {
                    tracing::debug!("Play request rejected: {}", err);
                }
            }));
        } else {
            tracing::trace!("Media left viewport, pausing");
            media.pause();
        }
    });

    let observer = create_watcher(platform, callback, options)?;
    observer.observe(&target);

    Some(Disposer::new(move || observer.disconnect()))
}
