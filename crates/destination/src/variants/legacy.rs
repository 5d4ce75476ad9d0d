//! Legacy queue-based vendor API: `init` on startup, campaign-gated
//! `register_affiliate` on page views, and `register_purchase` with the
//! customer's identity on completed orders.

use anyhow::Result;
use talkable_core::config::{AdapterConfig, VendorVariant};
use talkable_core::types::TrackEvent;
use tracing::debug;

use super::{VendorAdapter, CMD_INIT, CMD_REGISTER_AFFILIATE, CMD_REGISTER_PURCHASE};
use crate::campaign::match_campaign;
use crate::dispatch::CommandDispatcher;
use crate::extract::{extract_order, identity_fields};
use crate::host::HostContext;
use crate::payload::{affiliate_payload, init_payload, purchase_payload};

pub struct LegacyQueueAdapter {
    config: AdapterConfig,
}

impl LegacyQueueAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }
}

impl VendorAdapter for LegacyQueueAdapter {
    fn variant(&self) -> VendorVariant {
        VendorVariant::Legacy
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn initialize(&self, host: &dyn HostContext, dispatcher: &CommandDispatcher) -> Result<()> {
        dispatcher.dispatch(CMD_INIT, &init_payload(&self.config))?;
        if let Some(src) = self.config.script_url() {
            host.load_script(src);
        }
        Ok(())
    }

    fn page_view(&self, host: &dyn HostContext, dispatcher: &CommandDispatcher) -> Result<()> {
        let path = host.page_path();
        let Some(tags) = match_campaign(&path, &self.config.campaigns) else {
            debug!(path = %path, "page is not enrolled in a campaign");
            return Ok(());
        };

        let identity = identity_fields(&host.user());
        let payload = affiliate_payload(&self.config, tags, &identity);
        dispatcher.dispatch(CMD_REGISTER_AFFILIATE, &payload)
    }

    fn order_completed(
        &self,
        event: &TrackEvent,
        host: &dyn HostContext,
        dispatcher: &CommandDispatcher,
    ) -> Result<()> {
        let identity = identity_fields(&host.user());
        let order = extract_order(&event.properties, dispatcher.clock().now());
        debug!(
            order_id = ?order.order_id,
            items = order.items.len(),
            "registering purchase"
        );
        dispatcher.dispatch(CMD_REGISTER_PURCHASE, &purchase_payload(&order, Some(&identity)))
    }
}
