use std::sync::Once;

/// OneShotLatch runs its guarded action at most once, no matter how many threads try to trigger it
/// concurrently. Callers that arrive while the action is running block until it has finished.
#[derive(Debug)]
pub struct OneShotLatch {
    once: Once,
}

impl OneShotLatch {
    pub fn new() -> OneShotLatch {
        OneShotLatch { once: Once::new() }
    }

    /// The method executes action if the latch was not triggered before. It returns true for the
    /// (single) caller whose action was executed and false for all others.
    pub fn trigger<F: FnOnce()>(&self, action: F) -> bool {
        let mut executed = false;

        self.once.call_once(|| {
            action();
            executed = true;
        });

        executed
    }
}

impl Default for OneShotLatch {
    fn default() -> Self {
        OneShotLatch::new()
    }
}
