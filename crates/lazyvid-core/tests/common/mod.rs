//! Recording platform for observer tests
//!
//! Batches are delivered by hand, the way a browser would, including
//! spurious deliveries after `unobserve`.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lazyvid_core::*;

/// Everything the observers asked the platform to do
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(ObserverOptions),
    Observe(u32),
    Unobserve(u32),
    Disconnect,
    AppendSource(String, String),
    Load,
    Play,
    Pause,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

#[derive(Clone)]
pub struct MockPlatform {
    has_viewport: bool,
    log: CallLog,
    observers: Rc<RefCell<Vec<MockObserver>>>,
    tasks: Rc<RefCell<Vec<LocalTask>>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            has_viewport: true,
            log: Rc::default(),
            observers: Rc::default(),
            tasks: Rc::default(),
        }
    }

    /// A platform without a viewport
    pub fn headless() -> Self {
        Self {
            has_viewport: false,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.log.borrow().iter().filter(|c| *c == call).count()
    }

    /// Calls that reached the media element
    pub fn media_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Play | Call::Pause | Call::Load | Call::AppendSource(..)))
            .collect()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn observer(&self, index: usize) -> MockObserver {
        self.observers.borrow()[index].clone()
    }

    pub fn last_observer(&self) -> MockObserver {
        self.observers.borrow().last().cloned().expect("no observer created")
    }

    pub fn video(&self, id: u32) -> MockVideo {
        MockVideo {
            id,
            log: self.log.clone(),
            sources: Rc::default(),
            reject_play: Rc::new(Cell::new(false)),
        }
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Drive spawned playback tasks to completion
    pub fn run_tasks(&self) {
        let tasks: Vec<LocalTask> = self.tasks.borrow_mut().drain(..).collect();
        for task in tasks {
            smol::block_on(task);
        }
    }
}

impl Platform for MockPlatform {
    type Element = u32;
    type Observer = MockObserver;
    type Media = MockVideo;

    fn create_observer(
        &self,
        callback: ObserverCallback<MockObserver>,
        options: &ObserverOptions,
    ) -> Result<MockObserver, PlatformError> {
        if !self.has_viewport {
            return Err(PlatformError::NoViewport);
        }
        if options.root_margin == "bogus" {
            return Err(PlatformError::InvalidRootMargin(options.root_margin.clone()));
        }
        self.log.borrow_mut().push(Call::Create(options.clone()));
        let observer = MockObserver {
            state: Rc::new(ObserverState {
                callback: RefCell::new(Some(callback)),
                observed: RefCell::new(Vec::new()),
                disconnected: Cell::new(false),
                log: self.log.clone(),
            }),
        };
        self.observers.borrow_mut().push(observer.clone());
        Ok(observer)
    }

    fn spawn_local(&self, task: LocalTask) {
        self.tasks.borrow_mut().push(task);
    }
}

struct ObserverState {
    callback: RefCell<Option<ObserverCallback<MockObserver>>>,
    observed: RefCell<Vec<u32>>,
    disconnected: Cell<bool>,
    log: CallLog,
}

#[derive(Clone)]
pub struct MockObserver {
    state: Rc<ObserverState>,
}

impl MockObserver {
    /// Deliver a batch unless the observer was disconnected
    pub fn deliver(&self, entries: &[VisibilityEntry]) {
        if self.state.disconnected.get() {
            return;
        }
        let callback = self.state.callback.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(entries, self);
            if !self.state.disconnected.get() {
                *self.state.callback.borrow_mut() = Some(callback);
            }
        }
    }

    pub fn visible(&self) {
        self.deliver(&[VisibilityEntry::visible(1.0)]);
    }

    pub fn hidden(&self) {
        self.deliver(&[VisibilityEntry::hidden()]);
    }

    pub fn observed(&self) -> Vec<u32> {
        self.state.observed.borrow().clone()
    }

    pub fn is_disconnected(&self) -> bool {
        self.state.disconnected.get()
    }
}

impl IntersectionWatcher for MockObserver {
    type Element = u32;

    fn observe(&self, target: &u32) {
        self.state.log.borrow_mut().push(Call::Observe(*target));
        self.state.observed.borrow_mut().push(*target);
    }

    fn unobserve(&self, target: &u32) {
        self.state.log.borrow_mut().push(Call::Unobserve(*target));
        self.state.observed.borrow_mut().retain(|t| t != target);
    }

    fn disconnect(&self) {
        self.state.log.borrow_mut().push(Call::Disconnect);
        self.state.observed.borrow_mut().clear();
        self.state.disconnected.set(true);
        let callback = self.state.callback.borrow_mut().take();
        drop(callback);
    }
}

#[derive(Clone)]
pub struct MockVideo {
    pub id: u32,
    log: CallLog,
    sources: Rc<RefCell<Vec<VideoSource>>>,
    reject_play: Rc<Cell<bool>>,
}

impl MockVideo {
    pub fn sources(&self) -> Vec<VideoSource> {
        self.sources.borrow().clone()
    }

    pub fn reject_play(&self, reject: bool) {
        self.reject_play.set(reject);
    }
}

impl MediaElement for MockVideo {
    type Element = u32;

    fn element(&self) -> u32 {
        self.id
    }

    fn append_source(&self, source: &VideoSource) -> Result<(), PlatformError> {
        self.log
            .borrow_mut()
            .push(Call::AppendSource(source.src.clone(), source.mime_type.clone()));
        self.sources.borrow_mut().push(source.clone());
        Ok(())
    }

    fn load(&self) {
        self.log.borrow_mut().push(Call::Load);
    }

    fn play(&self) -> PlayFuture {
        self.log.borrow_mut().push(Call::Play);
        let rejected = self.reject_play.get();
        Box::pin(async move {
            if rejected {
                Err(PlaybackError::NotAllowed("autoplay blocked".into()))
            } else {
                Ok(())
            }
        })
    }

    fn pause(&self) {
        self.log.borrow_mut().push(Call::Pause);
    }
}

/// A counter usable from `'static` callbacks
#[derive(Clone, Default)]
pub struct Counter(Rc<Cell<usize>>);

impl Counter {
    pub fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn callback(&self) -> impl Fn() + 'static {
        let counter = self.clone();
        move || counter.bump()
    }
}
