//! Shared types for the Talkable destination: adapter configuration, the
//! normalized identity/order model, vendor command sinks and the clock.

pub mod clock;
pub mod config;
pub mod error;
pub mod sink;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AdapterConfig, VendorVariant};
pub use error::{DestinationError, DestinationResult};
pub use sink::{CaptureSink, CommandSink, QueueRegistry};
pub use types::{Identity, IdentifyEvent, LineItem, Order, Properties, TrackEvent, VendorCommand};
