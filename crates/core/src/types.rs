use serde::{Deserialize, Serialize};

/// Loosely-typed property bag as sent by the host (traits, event properties).
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// The current user as known to the host: an optional id plus free-form traits.
///
/// Rebuilt from host state for every page and order event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub traits: Properties,
}

impl Identity {
    pub fn new(user_id: Option<String>, traits: Properties) -> Self {
        Self { user_id, traits }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Host `identify` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifyEvent {
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub traits: Properties,
}

impl From<&IdentifyEvent> for Identity {
    fn from(event: &IdentifyEvent) -> Self {
        Identity::new(event.user_id.clone(), event.traits.clone())
    }
}

/// Host `track` call, e.g. "Order Completed".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackEvent {
    pub event: String,
    #[serde(default)]
    pub properties: Properties,
}

/// A single product line in a completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Option<String>,
    pub sku: Option<String>,
    pub quantity: u64,
    pub price: Option<f64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

/// A completed order, normalized from track properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Option<String>,
    pub coupon_code: Option<String>,
    pub subtotal: Option<f64>,
    /// ISO-8601 timestamp with millisecond precision.
    pub order_date: String,
    pub items: Vec<LineItem>,
}

/// One entry appended to the vendor's command queue: `[name, payload]`.
/// A `None` payload is a zero-argument trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCommand {
    pub name: String,
    pub payload: Option<serde_json::Value>,
}

impl VendorCommand {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload),
        }
    }

    pub fn trigger(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    /// Queue entry as the vendor script sees it.
    pub fn to_queue_entry(&self) -> serde_json::Value {
        match &self.payload {
            Some(payload) => serde_json::json!([self.name, payload]),
            None => serde_json::json!([self.name]),
        }
    }
}
