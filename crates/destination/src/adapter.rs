//! The destination as the host sees it: lifecycle hooks that route host events
//! through the configured vendor variant.
//!
//! Nothing here returns an error or panics to the host. Missing preconditions
//! skip the call and internal failures are logged and dropped, so one broken
//! destination never stops the host's fan-out to the others.

use std::sync::Arc;

use parking_lot::Mutex;
use talkable_core::clock::{system_clock, Clock};
use talkable_core::config::{AdapterConfig, VendorVariant};
use talkable_core::sink::{noop_sink, CommandSink};
use talkable_core::types::{Identity, IdentifyEvent, TrackEvent};
use tracing::{debug, info, warn};

use crate::dispatch::CommandDispatcher;
use crate::host::HostContext;
use crate::variants::{self, VendorAdapter};

pub const DESTINATION_NAME: &str = "Talkable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
}

pub struct TalkableDestination {
    vendor: Box<dyn VendorAdapter>,
    host: Arc<dyn HostContext>,
    sink: Arc<dyn CommandSink>,
    clock: Arc<dyn Clock>,
    dispatcher: CommandDispatcher,
    state: Mutex<LifecycleState>,
}

impl TalkableDestination {
    pub fn new(config: AdapterConfig, host: Arc<dyn HostContext>) -> Self {
        let sink = noop_sink();
        let clock = system_clock();
        Self {
            vendor: variants::for_config(config),
            host,
            dispatcher: CommandDispatcher::new(Arc::clone(&sink), Arc::clone(&clock)),
            sink,
            clock,
            state: Mutex::new(LifecycleState::Uninitialized),
        }
    }

    /// Attach the sink that receives vendor commands.
    pub fn with_sink(mut self, sink: Arc<dyn CommandSink>) -> Self {
        self.sink = sink;
        self.rebuild_dispatcher();
        self
    }

    /// Replace the wall clock (throttling and default order dates).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.rebuild_dispatcher();
        self
    }

    fn rebuild_dispatcher(&mut self) {
        self.dispatcher = CommandDispatcher::new(Arc::clone(&self.sink), Arc::clone(&self.clock));
    }

    pub fn name(&self) -> &'static str {
        DESTINATION_NAME
    }

    pub fn variant(&self) -> VendorVariant {
        self.vendor.variant()
    }

    pub fn config(&self) -> &AdapterConfig {
        self.vendor.config()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    /// Whether the vendor script has loaded on the host.
    pub fn is_loaded(&self) -> bool {
        self.vendor.is_loaded(self.host.as_ref())
    }

    /// Set up the vendor queue and request the script load. Re-initializing
    /// also resets the page-view throttle.
    pub fn initialize(&self) {
        self.dispatcher.reset_throttle();
        *self.state.lock() = LifecycleState::Initializing;
        info!(
            destination = DESTINATION_NAME,
            variant = ?self.vendor.variant(),
            "initializing destination"
        );
        absorb(
            "initialize",
            self.vendor.initialize(self.host.as_ref(), &self.dispatcher),
        );
    }

    /// Host signal that the vendor script finished loading.
    pub fn on_ready(&self) {
        let mut state = self.state.lock();
        if *state == LifecycleState::Uninitialized {
            debug!("ready signal before initialize, ignoring");
            return;
        }
        *state = LifecycleState::Ready;
        info!(destination = DESTINATION_NAME, "destination ready");
    }

    pub fn on_identify(&self, event: &IdentifyEvent) {
        if !self.ready("identify") {
            return;
        }
        let identity = Identity::from(event);
        absorb(
            "identify",
            self.vendor
                .identify(&identity, self.host.as_ref(), &self.dispatcher),
        );
    }

    /// Page view. Bursts inside the throttle window collapse to the first call.
    pub fn on_page_view(&self) {
        if !self.ready("page") {
            return;
        }
        let host = self.host.as_ref();
        if let Some(result) = self
            .dispatcher
            .throttled_page_view(|dispatcher| self.vendor.page_view(host, dispatcher))
        {
            absorb("page", result);
        }
    }

    pub fn on_order_completed(&self, event: &TrackEvent) {
        if !self.ready("order_completed") {
            return;
        }
        absorb(
            "order_completed",
            self.vendor
                .order_completed(event, self.host.as_ref(), &self.dispatcher),
        );
    }

    fn ready(&self, call: &str) -> bool {
        let state = self.state();
        if state != LifecycleState::Ready {
            debug!(call, state = ?state, "destination not ready, skipping");
            return false;
        }
        true
    }
}

fn absorb(call: &str, result: anyhow::Result<()>) {
    if let Err(e) = result {
        warn!(destination = DESTINATION_NAME, call, error = %e, "vendor call failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use std::collections::HashMap;
    use talkable_core::clock::ManualClock;
    use talkable_core::sink::{capture_sink, CaptureSink};

    struct Harness {
        destination: TalkableDestination,
        host: Arc<FakeHost>,
        sink: Arc<CaptureSink>,
        clock: Arc<ManualClock>,
    }

    fn harness(config: AdapterConfig) -> Harness {
        let host = Arc::new(FakeHost::at("/share"));
        let sink = capture_sink();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let destination = TalkableDestination::new(config, host.clone())
            .with_sink(sink.clone())
            .with_clock(clock.clone());
        Harness {
            destination,
            host,
            sink,
            clock,
        }
    }

    fn share_config() -> AdapterConfig {
        AdapterConfig {
            campaigns: HashMap::from([("/share".to_string(), "share,test".to_string())]),
            ..AdapterConfig::default()
        }
    }

    fn ready(h: &Harness) {
        h.destination.initialize();
        h.destination.on_ready();
        h.sink.clear();
    }

    #[test]
    fn test_lifecycle_transitions() {
        let h = harness(share_config());
        assert_eq!(h.destination.state(), LifecycleState::Uninitialized);

        h.destination.on_ready();
        assert_eq!(h.destination.state(), LifecycleState::Uninitialized);

        h.destination.initialize();
        assert_eq!(h.destination.state(), LifecycleState::Initializing);
        assert_eq!(h.sink.count_named("init"), 1);
        assert_eq!(h.host.scripts().len(), 1);

        h.destination.on_ready();
        assert_eq!(h.destination.state(), LifecycleState::Ready);
    }

    #[test]
    fn test_calls_before_ready_are_skipped() {
        let h = harness(share_config());
        h.destination.on_page_view();
        h.destination.initialize();
        h.sink.clear();
        h.destination.on_page_view();
        h.destination.on_order_completed(&TrackEvent::default());
        assert_eq!(h.sink.count(), 0);
    }

    #[test]
    fn test_page_view_burst_dispatches_once() {
        let h = harness(share_config());
        ready(&h);

        for _ in 0..5 {
            h.destination.on_page_view();
        }
        assert_eq!(h.sink.count_named("register_affiliate"), 1);

        h.clock.advance(Duration::milliseconds(250));
        h.destination.on_page_view();
        assert_eq!(h.sink.count_named("register_affiliate"), 2);
    }

    #[test]
    fn test_reinitialize_resets_throttle() {
        let h = harness(share_config());
        ready(&h);

        h.destination.on_page_view();
        h.destination.initialize();
        h.destination.on_ready();
        h.destination.on_page_view();
        assert_eq!(h.sink.count_named("register_affiliate"), 2);
    }

    #[test]
    fn test_non_matching_page_still_consumes_window() {
        let h = harness(share_config());
        ready(&h);

        h.host.set_path("/elsewhere");
        h.destination.on_page_view();
        h.host.set_path("/share");
        h.destination.on_page_view();
        assert_eq!(h.sink.count(), 0);
    }

    #[test]
    fn test_order_date_defaults_to_clock() {
        let h = harness(AdapterConfig::default());
        ready(&h);
        let event = TrackEvent {
            event: "Order Completed".into(),
            properties: json!({ "order_id": "o-1" }).as_object().cloned().unwrap(),
        };

        h.destination.on_order_completed(&event);

        let payload = h.sink.last_named("register_purchase").unwrap().payload.unwrap();
        let expected = h.clock.now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        assert_eq!(payload["order_date"], expected.as_str());
    }

    #[test]
    fn test_variant_selected_from_config() {
        let h = harness(AdapterConfig {
            variant: VendorVariant::Simplified,
            ..AdapterConfig::default()
        });
        assert_eq!(h.destination.variant(), VendorVariant::Simplified);
        assert_eq!(h.destination.name(), "Talkable");

        h.destination.initialize();
        assert_eq!(h.sink.count(), 0);
        assert!(!h.destination.is_loaded());
    }

    #[test]
    fn test_simplified_identify_after_load() {
        let h = harness(AdapterConfig {
            variant: VendorVariant::Simplified,
            ..AdapterConfig::default()
        });
        ready(&h);
        h.host.define_global("curebit");

        h.destination.on_identify(&IdentifyEvent {
            user_id: Some("u-9".into()),
            traits: json!({ "email": "u9@example.com" }).as_object().cloned().unwrap(),
        });

        assert_eq!(h.sink.count_named("identify"), 1);
    }
}
