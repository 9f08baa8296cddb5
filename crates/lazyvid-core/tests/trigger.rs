//! Visibility trigger tests

mod common;

use common::{Call, Counter, MockPlatform};
use lazyvid_core::{observe_once, ObserverOptions, VisibilityEntry};

// ============================================================================
// SETUP
// ============================================================================

#[test]
fn test_observes_target() {
    let platform = MockPlatform::new();
    let _disposer = observe_once(&platform, Some(&7), || {}, &ObserverOptions::default());

    assert_eq!(platform.observer_count(), 1);
    assert_eq!(platform.last_observer().observed(), vec![7]);
    assert_eq!(platform.count(&Call::Observe(7)), 1);
}

#[test]
fn test_passes_options_through() {
    let platform = MockPlatform::new();
    let options = ObserverOptions::new().with_threshold(0.5).with_root_margin("100px");
    let _disposer = observe_once(&platform, Some(&1), || {}, &options);

    assert_eq!(platform.calls()[0], Call::Create(options));
}

#[test]
fn test_no_viewport_is_noop() {
    let platform = MockPlatform::headless();
    let fired = Counter::default();
    let disposer = observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default());

    assert!(disposer.is_none());
    assert_eq!(platform.observer_count(), 0);
    assert!(platform.calls().is_empty());
}

#[test]
fn test_missing_target_is_noop() {
    let platform = MockPlatform::new();
    let disposer = observe_once(&platform, None, || {}, &ObserverOptions::default());

    assert!(disposer.is_none());
    assert_eq!(platform.observer_count(), 0);
}

#[test]
fn test_platform_failure_is_noop() {
    let platform = MockPlatform::new();
    let options = ObserverOptions::new().with_root_margin("bogus");
    let disposer = observe_once(&platform, Some(&1), || {}, &options);

    assert!(disposer.is_none());
    assert!(platform.calls().is_empty());
}

// ============================================================================
// FIRING
// ============================================================================

#[test]
fn test_fires_when_visible() {
    let platform = MockPlatform::new();
    let fired = Counter::default();
    let _disposer = observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default());

    platform.last_observer().visible();
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_does_not_fire_when_hidden() {
    let platform = MockPlatform::new();
    let fired = Counter::default();
    let _disposer = observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default());

    platform.last_observer().hidden();
    platform.last_observer().hidden();
    assert_eq!(fired.get(), 0);
    assert_eq!(platform.count(&Call::Unobserve(1)), 0);
}

#[test]
fn test_empty_batch_is_ignored() {
    let platform = MockPlatform::new();
    let fired = Counter::default();
    let _disposer = observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default());

    platform.last_observer().deliver(&[]);
    assert_eq!(fired.get(), 0);
}

#[test]
fn test_only_first_entry_counts() {
    let platform = MockPlatform::new();
    let fired = Counter::default();
    let _disposer = observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default());

    platform
        .last_observer()
        .deliver(&[VisibilityEntry::hidden(), VisibilityEntry::visible(1.0)]);
    assert_eq!(fired.get(), 0);

    platform
        .last_observer()
        .deliver(&[VisibilityEntry::visible(0.3), VisibilityEntry::hidden()]);
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_fires_at_most_once() {
    let platform = MockPlatform::new();
    let fired = Counter::default();
    let _disposer = observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default());

    let observer = platform.last_observer();
    observer.hidden();
    observer.visible();
    observer.visible();
    observer.hidden();
    observer.visible();

    assert_eq!(fired.get(), 1);
}

#[test]
fn test_unobserves_after_firing() {
    let platform = MockPlatform::new();
    let _disposer = observe_once(&platform, Some(&3), || {}, &ObserverOptions::default());

    let observer = platform.last_observer();
    observer.visible();

    assert_eq!(platform.count(&Call::Unobserve(3)), 1);
    assert!(observer.observed().is_empty());
    // Unwatched, not destroyed
    assert!(!observer.is_disconnected());
    assert_eq!(platform.count(&Call::Disconnect), 0);
}

#[test]
fn test_callback_runs_before_unobserve() {
    let platform = MockPlatform::new();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let probe = platform.clone();
    let record = seen.clone();
    let _disposer = observe_once(
        &platform,
        Some(&4),
        move || *record.borrow_mut() = probe.calls(),
        &ObserverOptions::default(),
    );

    platform.last_observer().visible();
    assert!(!seen.borrow().contains(&Call::Unobserve(4)));
    assert_eq!(platform.count(&Call::Unobserve(4)), 1);
}

// ============================================================================
// DISPOSAL
// ============================================================================

#[test]
fn test_dispose_disconnects() {
    let platform = MockPlatform::new();
    let mut disposer = observe_once(&platform, Some(&1), || {}, &ObserverOptions::default()).unwrap();

    disposer.dispose();
    assert_eq!(platform.count(&Call::Disconnect), 1);
    assert!(platform.last_observer().is_disconnected());
}

#[test]
fn test_dispose_is_idempotent() {
    let platform = MockPlatform::new();
    let mut disposer = observe_once(&platform, Some(&1), || {}, &ObserverOptions::default()).unwrap();

    disposer.dispose();
    disposer.dispose();
    drop(disposer);
    assert_eq!(platform.count(&Call::Disconnect), 1);
}

#[test]
fn test_dispose_after_firing() {
    let platform = MockPlatform::new();
    let fired = Counter::default();
    let mut disposer =
        observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default()).unwrap();

    platform.last_observer().visible();
    disposer.dispose();

    assert_eq!(fired.get(), 1);
    assert_eq!(platform.count(&Call::Disconnect), 1);
}

#[test]
fn test_no_notification_after_dispose() {
    let platform = MockPlatform::new();
    let fired = Counter::default();
    let mut disposer =
        observe_once(&platform, Some(&1), fired.callback(), &ObserverOptions::default()).unwrap();

    disposer.dispose();
    platform.last_observer().visible();
    assert_eq!(fired.get(), 0);
}

#[test]
fn test_drop_disposes() {
    let platform = MockPlatform::new();
    let disposer = observe_once(&platform, Some(&1), || {}, &ObserverOptions::default());
    drop(disposer);

    assert!(platform.last_observer().is_disconnected());
}
