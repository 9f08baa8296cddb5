//! IntersectionObserver wrapper

use js_sys::Array;
use lazyvid_core::{IntersectionWatcher, ObserverCallback, ObserverOptions, PlatformError, VisibilityEntry};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type Listener = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// A browser `IntersectionObserver` and the closure it calls
pub struct WebObserver {
    observer: IntersectionObserver,
    // `None` for the borrowed handle passed into callbacks
    listener: Option<Listener>,
}

impl WebObserver {
    pub(crate) fn new(
        mut callback: ObserverCallback<WebObserver>,
        options: &ObserverOptions,
    ) -> Result<Self, PlatformError> {
        let listener = Listener::new(move |entries: Array, observer: IntersectionObserver| {
            let batch: Vec<VisibilityEntry> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| VisibilityEntry {
                    is_intersecting: entry.is_intersecting(),
                    intersection_ratio: entry.intersection_ratio(),
                })
                .collect();
            let handle = WebObserver {
                observer,
                listener: None,
            };
            callback(&batch, &handle);
        });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        let thresholds: Array = options.threshold.iter().map(|t| JsValue::from_f64(*t)).collect();
        init.set_threshold(&thresholds);

        let observer = IntersectionObserver::new_with_options(listener.as_ref().unchecked_ref(), &init)
            .map_err(|err| options_error(&err, options))?;

        Ok(Self {
            observer,
            listener: Some(listener),
        })
    }
}

/// The constructor throws RangeError for thresholds, SyntaxError for margins
fn options_error(err: &JsValue, options: &ObserverOptions) -> PlatformError {
    if err.is_instance_of::<js_sys::RangeError>() {
        let bad = options
            .threshold
            .iter()
            .copied()
            .find(|t| !(0.0..=1.0).contains(t))
            .unwrap_or(f64::NAN);
        PlatformError::InvalidThreshold(bad)
    } else {
        PlatformError::InvalidRootMargin(options.root_margin.clone())
    }
}

impl IntersectionWatcher for WebObserver {
    type Element = Element;

    fn observe(&self, target: &Element) {
        self.observer.observe(target);
    }

    fn unobserve(&self, target: &Element) {
        self.observer.unobserve(target);
    }

    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for WebObserver {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.observer.disconnect();
            // May be dropped from inside its own callback; free after it returns
            wasm_bindgen_futures::spawn_local(async move {
                drop(listener);
            });
        }
    }
}
