//! Vendor API variants.
//!
//! Each variant implements [`VendorAdapter`] and maps host events onto the
//! commands its flavour of the vendor API understands. The destination picks
//! one from [`VendorVariant`] at construction time.

pub mod legacy;
pub mod simplified;

use anyhow::Result;
use talkable_core::config::{AdapterConfig, VendorVariant};
use talkable_core::types::{Identity, TrackEvent};

use crate::dispatch::CommandDispatcher;
use crate::host::HostContext;

pub use legacy::LegacyQueueAdapter;
pub use simplified::SimplifiedAdapter;

pub const CMD_INIT: &str = "init";
pub const CMD_IDENTIFY: &str = "identify";
pub const CMD_REGISTER_AFFILIATE: &str = "register_affiliate";
pub const CMD_REGISTER_AFFILIATE_RUN: &str = "register_affiliate_run";
pub const CMD_REGISTER_PURCHASE: &str = "register_purchase";

/// Strategy for one vendor API flavour.
pub trait VendorAdapter: Send + Sync {
    fn variant(&self) -> VendorVariant;

    fn config(&self) -> &AdapterConfig;

    /// Queue setup and script load request.
    fn initialize(&self, host: &dyn HostContext, dispatcher: &CommandDispatcher) -> Result<()>;

    /// Explicit identify call. Variants that rebuild identity on every event
    /// ignore it.
    fn identify(
        &self,
        _identity: &Identity,
        _host: &dyn HostContext,
        _dispatcher: &CommandDispatcher,
    ) -> Result<()> {
        Ok(())
    }

    /// Page view, already admitted by the page-view throttle.
    fn page_view(&self, host: &dyn HostContext, dispatcher: &CommandDispatcher) -> Result<()>;

    fn order_completed(
        &self,
        event: &TrackEvent,
        host: &dyn HostContext,
        dispatcher: &CommandDispatcher,
    ) -> Result<()>;

    /// Whether the vendor script has defined its global on the host.
    fn is_loaded(&self, host: &dyn HostContext) -> bool {
        host.global_defined(&self.config().vendor_global)
    }
}

/// Build the adapter for the configured variant.
pub fn for_config(config: AdapterConfig) -> Box<dyn VendorAdapter> {
    match config.variant {
        VendorVariant::Legacy => Box::new(LegacyQueueAdapter::new(config)),
        VendorVariant::Simplified => Box::new(SimplifiedAdapter::new(config)),
    }
}
