//! Teardown handle

use std::fmt;

/// Releases an observation exactly once
///
/// Calling [`dispose`](Disposer::dispose) more than once is a no-op.
/// Dropping an undisposed handle disposes it.
pub struct Disposer {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    pub fn dispose(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.teardown.is_none()
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
