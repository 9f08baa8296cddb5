//! Headless document
//!
//! Holds element layout, the viewport and registered intersection
//! observers. [`Document::update`] is the rendering opportunity: it checks
//! intersections, delivers batches and then drives spawned tasks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use lazyvid_core::{LocalTask, ObserverCallback, ObserverOptions, Platform, PlatformError};

use crate::geometry::DOMRect;
use crate::intersection::{IntersectionObserver, IntersectionState, Registration};
use crate::media::VideoElement;
use crate::NodeId;

/// Milliseconds per simulated frame
const FRAME_TIME: f64 = 16.0;

#[derive(Debug)]
struct NodeData {
    rect: DOMRect,
    connected: bool,
}

pub(crate) struct DocumentInner {
    nodes: HashMap<NodeId, NodeData>,
    next_node: u32,
    /// `None` when running without a viewport
    viewport: Option<DOMRect>,
    pub(crate) user_activation: bool,
    observers: Vec<Rc<Registration>>,
    next_observer: u64,
    time: f64,
}

impl DocumentInner {
    fn layout_rect(&self, node: NodeId) -> Option<DOMRect> {
        self.nodes
            .get(&node)
            .filter(|data| data.connected)
            .map(|data| data.rect)
    }

    pub(crate) fn unregister(&mut self, registration: &Rc<Registration>) {
        self.observers.retain(|r| !Rc::ptr_eq(r, registration));
    }
}

/// A document with a scrollable viewport
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
    executor: Rc<smol::LocalExecutor<'static>>,
}

impl Document {
    /// Create a document with a `width` x `height` viewport at the origin
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_viewport(Some(DOMRect::new(0.0, 0.0, width, height)))
    }

    /// Create a document without a viewport. Observers cannot be created.
    pub fn headless() -> Self {
        Self::with_viewport(None)
    }

    fn with_viewport(viewport: Option<DOMRect>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                nodes: HashMap::new(),
                next_node: 1,
                viewport,
                user_activation: false,
                observers: Vec::new(),
                next_observer: 1,
                time: 0.0,
            })),
            executor: Rc::new(smol::LocalExecutor::new()),
        }
    }

    /// Add an element laid out at `rect`
    pub fn create_element(&self, rect: DOMRect) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let node = NodeId(inner.next_node);
        inner.next_node += 1;
        inner.nodes.insert(node, NodeData { rect, connected: true });
        node
    }

    /// Add a `<video>` laid out at `rect`
    pub fn create_video(&self, rect: DOMRect) -> VideoElement {
        let node = self.create_element(rect);
        VideoElement::new(node, Rc::downgrade(&self.inner))
    }

    /// Move or resize an element
    pub fn set_rect(&self, node: NodeId, rect: DOMRect) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(&node) {
            data.rect = rect;
        }
    }

    pub fn rect(&self, node: NodeId) -> Option<DOMRect> {
        self.inner.borrow().nodes.get(&node).map(|data| data.rect)
    }

    /// Detach an element from the document
    pub fn remove(&self, node: NodeId) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(&node) {
            data.connected = false;
        }
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.inner.borrow().layout_rect(node).is_some()
    }

    pub fn viewport(&self) -> Option<DOMRect> {
        self.inner.borrow().viewport
    }

    /// Scroll the viewport to a document position
    pub fn scroll_to(&self, x: f64, y: f64) {
        if let Some(viewport) = self.inner.borrow_mut().viewport.as_mut() {
            viewport.x = x.max(0.0);
            viewport.y = y.max(0.0);
        }
    }

    pub fn scroll_by(&self, dx: f64, dy: f64) {
        if let Some(viewport) = self.viewport() {
            self.scroll_to(viewport.x + dx, viewport.y + dy);
        }
    }

    pub fn resize(&self, width: f64, height: f64) {
        if let Some(viewport) = self.inner.borrow_mut().viewport.as_mut() {
            viewport.width = width.max(0.0);
            viewport.height = height.max(0.0);
        }
    }

    /// Record a user gesture, which lifts the autoplay restriction
    pub fn activate(&self) {
        self.inner.borrow_mut().user_activation = true;
    }

    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Check intersections, deliver batches, then run spawned tasks
    ///
    /// Returns the number of batches delivered.
    pub fn update(&self) -> usize {
        let (viewport, registrations, time) = {
            let mut inner = self.inner.borrow_mut();
            let Some(viewport) = inner.viewport else {
                return 0;
            };
            inner.time += FRAME_TIME;
            (viewport, inner.observers.clone(), inner.time)
        };

        let mut delivered = 0;
        for registration in registrations {
            let entries = {
                let inner = self.inner.borrow();
                let mut state = registration.state.borrow_mut();
                if !state.is_connected() {
                    continue;
                }
                let entries = state.check_intersections(viewport, |node| inner.layout_rect(node), time);
                entries
            };
            if entries.is_empty() {
                continue;
            }

            let observer = IntersectionObserver {
                registration: registration.clone(),
                document: Rc::downgrade(&self.inner),
            };
            registration.deliver(&entries, &observer);
            delivered += 1;
        }

        self.run_until_stalled();
        delivered
    }

    /// Run spawned tasks until none can make progress
    pub fn run_until_stalled(&self) {
        while self.executor.try_tick() {}
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field("nodes", &inner.nodes.len())
            .field("viewport", &inner.viewport)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl Platform for Document {
    type Element = NodeId;
    type Observer = IntersectionObserver;
    type Media = VideoElement;

    fn create_observer(
        &self,
        callback: ObserverCallback<IntersectionObserver>,
        options: &ObserverOptions,
    ) -> Result<IntersectionObserver, PlatformError> {
        let mut inner = self.inner.borrow_mut();
        if inner.viewport.is_none() {
            return Err(PlatformError::NoViewport);
        }

        let id = inner.next_observer;
        let state = IntersectionState::new(id, options)?;
        inner.next_observer += 1;

        let registration = Rc::new(Registration::new(state, callback));
        inner.observers.push(registration.clone());
        tracing::trace!("Intersection observer {} created", id);

        Ok(IntersectionObserver {
            registration,
            document: Rc::downgrade(&self.inner),
        })
    }

    fn spawn_local(&self, task: LocalTask) {
        self.executor.spawn(task).detach();
    }
}
