//! Visibility trigger
//!
//! Fires a callback the first time a target becomes visible, then stops
//! watching the target. The watcher itself stays alive until disposed.

use crate::platform::create_watcher;
use crate::{Disposer, IntersectionWatcher, ObserverOptions, Platform, VisibilityEntry};

/// Call `on_intersect` once, when `target` first intersects the viewport
///
/// Returns `None` without side effects when the platform has no viewport,
/// when the watcher cannot be created, or when `target` is absent.
pub fn observe_once<P, F>(
    platform: &P,
    target: Option<&P::Element>,
    on_intersect: F,
    options: &ObserverOptions,
) -> Option<Disposer>
where
    P: Platform,
    F: FnOnce() + 'static,
{
    let target = target?.clone();
    let watched = target.clone();
    let mut on_intersect = Some(on_intersect);

    let callback = Box::new(move |entries: &[VisibilityEntry], observer: &P::Observer| {
        if !entries.first().is_some_and(|entry| entry.is_intersecting) {
            return;
        }
        if let Some(on_intersect) = on_intersect.take() {
            on_intersect();
        }
        observer.unobserve(&watched);
    });

    let observer = create_watcher(platform, callback, options)?;
    observer.observe(&target);
    tracing::debug!(
        "Waiting for first visibility (threshold {:?}, margin {})",
        options.threshold,
        options.root_margin
    );

    Some(Disposer::new(move || observer.disconnect()))
}
