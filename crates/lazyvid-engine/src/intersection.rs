//! Intersection Observer
//!
//! Observe element visibility and intersection with the viewport.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use lazyvid_core::{IntersectionWatcher, ObserverCallback, ObserverOptions, PlatformError, VisibilityEntry};

use crate::document::DocumentInner;
use crate::geometry::{DOMRect, RootMargin};
use crate::NodeId;

/// Intersection observer entry
#[derive(Debug, Clone)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub root_bounds: DOMRect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
    pub time: f64,
}

impl From<&IntersectionObserverEntry> for VisibilityEntry {
    fn from(entry: &IntersectionObserverEntry) -> Self {
        VisibilityEntry {
            is_intersecting: entry.is_intersecting,
            intersection_ratio: entry.intersection_ratio,
        }
    }
}

/// What was last reported for a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    is_intersecting: bool,
    threshold_index: usize,
}

/// Per-observer bookkeeping
#[derive(Debug)]
pub(crate) struct IntersectionState {
    id: u64,
    root_margin: RootMargin,
    thresholds: Vec<f64>,
    observed: Vec<(NodeId, Option<Snapshot>)>,
    connected: bool,
}

impl IntersectionState {
    pub(crate) fn new(id: u64, options: &ObserverOptions) -> Result<Self, PlatformError> {
        let root_margin = RootMargin::parse(&options.root_margin)?;

        let mut thresholds = options.threshold.clone();
        if let Some(&bad) = thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(PlatformError::InvalidThreshold(bad));
        }
        if thresholds.is_empty() {
            thresholds.push(0.0);
        }
        thresholds.sort_by(|a, b| a.total_cmp(b));
        thresholds.dedup();

        Ok(Self {
            id,
            root_margin,
            thresholds,
            observed: Vec::new(),
            connected: true,
        })
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected
    }

    pub(crate) fn observed(&self) -> Vec<NodeId> {
        self.observed.iter().map(|(node, _)| *node).collect()
    }

    fn observe(&mut self, target: NodeId) {
        // Disconnected observers have released their callback
        if !self.connected {
            return;
        }
        if !self.observed.iter().any(|(node, _)| *node == target) {
            self.observed.push((target, None));
        }
    }

    fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|(node, _)| *node != target);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.connected = false;
    }

    /// Compute entries for targets whose visibility changed
    ///
    /// `layout` returns `None` for targets that are not in the document.
    pub(crate) fn check_intersections(
        &mut self,
        viewport: DOMRect,
        layout: impl Fn(NodeId) -> Option<DOMRect>,
        time: f64,
    ) -> Vec<IntersectionObserverEntry> {
        let root = self.root_margin.apply(viewport);
        let min_threshold = self.thresholds[0];
        let mut entries = Vec::new();

        for (node, last) in &mut self.observed {
            let rect = layout(*node);
            let intersection = rect.and_then(|r| r.intersection(&root));

            let (ratio, is_intersecting) = match (rect, intersection) {
                (Some(rect), Some(i)) => {
                    // Zero-area targets count as fully visible once touching
                    let ratio = if rect.area() > 0.0 { i.area() / rect.area() } else { 1.0 };
                    (ratio, ratio >= min_threshold)
                }
                _ => (0.0, false),
            };
            let threshold_index = if is_intersecting {
                self.thresholds.iter().filter(|&&t| ratio >= t).count()
            } else {
                0
            };

            let snapshot = Snapshot { is_intersecting, threshold_index };
            if *last == Some(snapshot) {
                continue;
            }
            *last = Some(snapshot);

            entries.push(IntersectionObserverEntry {
                target: *node,
                bounding_client_rect: rect.unwrap_or_default(),
                intersection_rect: intersection.unwrap_or_default(),
                root_bounds: root,
                intersection_ratio: ratio,
                is_intersecting,
                time,
            });
        }

        entries
    }
}

/// A registered observer: its state plus the callback to deliver to
pub(crate) struct Registration {
    pub(crate) state: RefCell<IntersectionState>,
    callback: RefCell<Option<ObserverCallback<IntersectionObserver>>>,
}

impl Registration {
    pub(crate) fn new(state: IntersectionState, callback: ObserverCallback<IntersectionObserver>) -> Self {
        Self {
            state: RefCell::new(state),
            callback: RefCell::new(Some(callback)),
        }
    }

    /// Hand a batch to the callback
    ///
    /// No borrow is held while the callback runs, so it may unobserve,
    /// disconnect or create other observers.
    pub(crate) fn deliver(&self, entries: &[IntersectionObserverEntry], observer: &IntersectionObserver) {
        if !self.state.borrow().is_connected() {
            return;
        }
        // Missing while a delivery to this observer is already running
        let Some(mut callback) = self.callback.borrow_mut().take() else {
            return;
        };

        let batch: Vec<VisibilityEntry> = entries.iter().map(VisibilityEntry::from).collect();
        callback(&batch, observer);

        if self.state.borrow().is_connected() {
            *self.callback.borrow_mut() = Some(callback);
        }
    }
}

/// Handle to a live intersection observer
#[derive(Clone)]
pub struct IntersectionObserver {
    pub(crate) registration: Rc<Registration>,
    pub(crate) document: Weak<RefCell<DocumentInner>>,
}

impl IntersectionObserver {
    pub fn id(&self) -> u64 {
        self.registration.state.borrow().id()
    }

    /// Targets currently watched
    pub fn observed(&self) -> Vec<NodeId> {
        self.registration.state.borrow().observed()
    }

    pub fn is_connected(&self) -> bool {
        self.registration.state.borrow().is_connected()
    }
}

impl IntersectionWatcher for IntersectionObserver {
    type Element = NodeId;

    fn observe(&self, target: &NodeId) {
        self.registration.state.borrow_mut().observe(*target);
    }

    fn unobserve(&self, target: &NodeId) {
        self.registration.state.borrow_mut().unobserve(*target);
    }

    fn disconnect(&self) {
        if !self.is_connected() {
            return;
        }
        self.registration.state.borrow_mut().disconnect();
        let callback = self.registration.callback.borrow_mut().take();
        drop(callback);

        if let Some(document) = self.document.upgrade() {
            document.borrow_mut().unregister(&self.registration);
        }
        tracing::trace!("Intersection observer {} disconnected", self.id());
    }
}
