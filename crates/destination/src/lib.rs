//! Talkable destination: maps host analytics events (identify, page,
//! order completed) onto the Talkable/Curebit asynchronous command queue.
//!
//! # Modules
//!
//! - [`extract`]: Identity and order field extraction with fallbacks
//! - [`campaign`]: Page path to campaign tag matching
//! - [`payload`]: Vendor payload shapes and builders
//! - [`dispatch`]: Command dispatch and the page-view throttle
//! - [`variants`]: Legacy and simplified vendor API strategies
//! - [`adapter`]: Lifecycle hooks exposed to the host

pub mod adapter;
pub mod campaign;
pub mod dispatch;
pub mod extract;
pub mod host;
pub mod payload;
pub mod variants;

#[cfg(test)]
mod testing;

pub use adapter::{LifecycleState, TalkableDestination};
pub use dispatch::{CommandDispatcher, Throttle};
pub use host::HostContext;
pub use variants::{LegacyQueueAdapter, SimplifiedAdapter, VendorAdapter};
