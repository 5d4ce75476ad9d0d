//! Command dispatch onto the vendor queue, plus the leading-edge throttle that
//! collapses bursts of page views into one dispatch per window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use talkable_core::clock::Clock;
use talkable_core::sink::CommandSink;
use talkable_core::types::VendorCommand;
use tracing::debug;

/// Matches the vendor script's own debounce for iframe injection.
pub const PAGE_VIEW_WINDOW_MS: i64 = 250;

/// Leading-edge throttle: the first call in a window is admitted, later calls
/// inside the window are dropped (not deferred).
pub struct Throttle {
    window: Duration,
    last_fired_at: Mutex<Option<DateTime<Utc>>>,
    clock: Arc<dyn Clock>,
}

impl Throttle {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            last_fired_at: Mutex::new(None),
            clock,
        }
    }

    /// Returns `true` if the caller may proceed, recording the call time.
    pub fn try_acquire(&self) -> bool {
        let now = self.clock.now();
        let mut last = self.last_fired_at.lock();
        match *last {
            Some(fired) if now - fired < self.window => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    pub fn reset(&self) {
        *self.last_fired_at.lock() = None;
    }

    pub fn last_fired_at(&self) -> Option<DateTime<Utc>> {
        *self.last_fired_at.lock()
    }
}

/// Pushes `[name, payload]` commands onto the vendor sink.
pub struct CommandDispatcher {
    sink: Arc<dyn CommandSink>,
    clock: Arc<dyn Clock>,
    page_view_throttle: Throttle,
}

impl CommandDispatcher {
    pub fn new(sink: Arc<dyn CommandSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sink,
            page_view_throttle: Throttle::new(
                Duration::milliseconds(PAGE_VIEW_WINDOW_MS),
                Arc::clone(&clock),
            ),
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Serialize `payload` and push it under `name`.
    pub fn dispatch<P: Serialize>(&self, name: &str, payload: &P) -> anyhow::Result<()> {
        let payload = serde_json::to_value(payload)?;
        debug!(command = name, "dispatching vendor command");
        self.sink.push(VendorCommand::new(name, payload));
        Ok(())
    }

    /// Push a zero-argument command.
    pub fn trigger(&self, name: &str) {
        debug!(command = name, "triggering vendor command");
        self.sink.push(VendorCommand::trigger(name));
    }

    /// Run the page-view path unless another page view was admitted within
    /// the current window. Returns `None` when the call was dropped.
    pub fn throttled_page_view<T>(&self, page_view: impl FnOnce(&Self) -> T) -> Option<T> {
        if !self.page_view_throttle.try_acquire() {
            debug!("page view dropped by throttle");
            return None;
        }
        Some(page_view(self))
    }

    /// Forget the last admitted page view. Called on (re-)initialization.
    pub fn reset_throttle(&self) {
        self.page_view_throttle.reset();
    }
}
