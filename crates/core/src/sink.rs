//! Command sinks: where vendor commands go once the mapping engine has
//! decided to emit them.
//!
//! The destination accepts an `Arc<dyn CommandSink>` instead of writing to a
//! process-global queue, so tests can swap in a [`CaptureSink`].

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::types::VendorCommand;

/// Receives vendor commands. Pushing is fire-and-forget.
pub trait CommandSink: Send + Sync {
    fn push(&self, command: VendorCommand);
}

/// Discards everything.
pub struct NoOpSink;

impl CommandSink for NoOpSink {
    fn push(&self, _command: VendorCommand) {}
}

/// In-memory sink that captures commands for testing.
#[derive(Default)]
pub struct CaptureSink {
    commands: Mutex<Vec<VendorCommand>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<VendorCommand> {
        self.commands.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.commands.lock().iter().filter(|c| c.name == name).count()
    }

    /// Most recent command with the given name.
    pub fn last_named(&self, name: &str) -> Option<VendorCommand> {
        self.commands
            .lock()
            .iter()
            .rev()
            .find(|c| c.name == name)
            .cloned()
    }

    pub fn clear(&self) {
        self.commands.lock().clear();
    }
}

impl CommandSink for CaptureSink {
    fn push(&self, command: VendorCommand) {
        self.commands.lock().push(command);
    }
}

/// Named command queues shared between the destination and whatever drains
/// them (the vendor bridge). A queue is created on its first push.
#[derive(Default)]
pub struct QueueRegistry {
    queues: DashMap<String, Vec<VendorCommand>>,
}

impl QueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, queue: &str, command: VendorCommand) {
        debug!(queue, command = %command.name, "command queued");
        self.queues.entry(queue.to_string()).or_default().push(command);
    }

    pub fn len(&self, queue: &str) -> usize {
        self.queues.get(queue).map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, queue: &str) -> bool {
        self.len(queue) == 0
    }

    pub fn contains(&self, queue: &str) -> bool {
        self.queues.contains_key(queue)
    }

    /// Take every pending command from a queue, oldest first.
    pub fn drain(&self, queue: &str) -> Vec<VendorCommand> {
        self.queues
            .get_mut(queue)
            .map(|mut q| std::mem::take(q.value_mut()))
            .unwrap_or_default()
    }

    /// Sink bound to one named queue of this registry.
    pub fn sink(self: &Arc<Self>, queue: impl Into<String>) -> Arc<dyn CommandSink> {
        Arc::new(NamedQueueSink {
            registry: Arc::clone(self),
            queue: queue.into(),
        })
    }
}

struct NamedQueueSink {
    registry: Arc<QueueRegistry>,
    queue: String,
}

impl CommandSink for NamedQueueSink {
    fn push(&self, command: VendorCommand) {
        self.registry.push(&self.queue, command);
    }
}

/// Convenience: create a no-op sink for callers that don't need output.
pub fn noop_sink() -> Arc<dyn CommandSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sink() {
        let sink = capture_sink();
        assert_eq!(sink.count(), 0);

        sink.push(VendorCommand::new("init", serde_json::json!({ "site_id": "s" })));
        sink.push(VendorCommand::trigger("register_affiliate_run"));

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.count_named("init"), 1);
        assert_eq!(
            sink.last_named("register_affiliate_run").unwrap().payload,
            None
        );

        sink.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_noop_sink() {
        let sink = noop_sink();
        sink.push(VendorCommand::trigger("anything"));
    }

    #[test]
    fn test_queue_created_on_first_push() {
        let registry = Arc::new(QueueRegistry::new());
        assert!(!registry.contains("_curebitq"));

        let sink = registry.sink("_curebitq");
        sink.push(VendorCommand::new("init", serde_json::json!({})));
        sink.push(VendorCommand::trigger("register_affiliate_run"));

        assert!(registry.contains("_curebitq"));
        assert_eq!(registry.len("_curebitq"), 2);
        assert!(registry.is_empty("other"));

        let drained = registry.drain("_curebitq");
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].name, "init");
        assert!(registry.is_empty("_curebitq"));
    }
}
