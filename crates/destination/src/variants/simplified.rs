//! Simplified vendor API: three bare global functions and no campaign or
//! iframe configuration. Every call is skipped until the vendor global is
//! defined, and purchases carry no customer identity.

use anyhow::Result;
use talkable_core::config::{AdapterConfig, VendorVariant};
use talkable_core::types::{Identity, TrackEvent};
use tracing::debug;

use super::{VendorAdapter, CMD_IDENTIFY, CMD_REGISTER_AFFILIATE_RUN, CMD_REGISTER_PURCHASE};
use crate::dispatch::CommandDispatcher;
use crate::extract::{extract_order, identity_fields};
use crate::host::HostContext;
use crate::payload::{customer_payload, purchase_payload};

pub struct SimplifiedAdapter {
    config: AdapterConfig,
}

impl SimplifiedAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    fn vendor_missing(&self, host: &dyn HostContext, call: &str) -> bool {
        let missing = !self.is_loaded(host);
        if missing {
            debug!(call, global = %self.config.vendor_global, "vendor global not defined, skipping");
        }
        missing
    }
}

impl VendorAdapter for SimplifiedAdapter {
    fn variant(&self) -> VendorVariant {
        VendorVariant::Simplified
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn initialize(&self, host: &dyn HostContext, _dispatcher: &CommandDispatcher) -> Result<()> {
        if let Some(src) = self.config.script_url() {
            host.load_script(src);
        }
        Ok(())
    }

    fn identify(
        &self,
        identity: &Identity,
        host: &dyn HostContext,
        dispatcher: &CommandDispatcher,
    ) -> Result<()> {
        if self.vendor_missing(host, CMD_IDENTIFY) {
            return Ok(());
        }
        let fields = identity_fields(identity);
        dispatcher.dispatch(CMD_IDENTIFY, &customer_payload(&fields))
    }

    fn page_view(&self, host: &dyn HostContext, dispatcher: &CommandDispatcher) -> Result<()> {
        if !self.vendor_missing(host, CMD_REGISTER_AFFILIATE_RUN) {
            dispatcher.trigger(CMD_REGISTER_AFFILIATE_RUN);
        }
        Ok(())
    }

    fn order_completed(
        &self,
        event: &TrackEvent,
        host: &dyn HostContext,
        dispatcher: &CommandDispatcher,
    ) -> Result<()> {
        if self.vendor_missing(host, CMD_REGISTER_PURCHASE) {
            return Ok(());
        }
        let order = extract_order(&event.properties, dispatcher.clock().now());
        dispatcher.dispatch(CMD_REGISTER_PURCHASE, &purchase_payload(&order, None))
    }
}
