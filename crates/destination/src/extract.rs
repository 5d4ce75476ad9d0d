//! Field extraction: pulls normalized identity and commerce fields out of
//! loosely-structured traits and track properties.
//!
//! Lookups are key-format insensitive: `firstName`, `first_name` and
//! `First Name` resolve to the same trait. Missing or malformed values become
//! `None` (or a documented default); extraction never fails.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use talkable_core::types::{Identity, LineItem, Order, Properties};

/// Identity fields forwarded to the vendor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityFields {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub fn identity_fields(identity: &Identity) -> IdentityFields {
    IdentityFields {
        user_id: identity.user_id.clone(),
        email: email(identity),
        first_name: first_name(&identity.traits),
        last_name: last_name(&identity.traits),
    }
}

/// `traits.email`, else the user id when it is itself an email address.
pub fn email(identity: &Identity) -> Option<String> {
    text(&identity.traits, "email").or_else(|| {
        identity
            .user_id
            .as_deref()
            .filter(|id| looks_like_email(id))
            .map(str::to_string)
    })
}

pub fn first_name(traits: &Properties) -> Option<String> {
    if let Some(Value::String(first)) = lookup(traits, "firstName") {
        return Some(first.trim().to_string());
    }
    match lookup(traits, "name") {
        Some(Value::String(name)) => name.trim().split(' ').next().map(str::to_string),
        _ => None,
    }
}

pub fn last_name(traits: &Properties) -> Option<String> {
    if let Some(Value::String(last)) = lookup(traits, "lastName") {
        return Some(last.trim().to_string());
    }
    match lookup(traits, "name") {
        Some(Value::String(name)) => name
            .trim()
            .split_once(' ')
            .map(|(_, rest)| rest.trim().to_string()),
        _ => None,
    }
}

/// Normalize "Order Completed" properties. `now` is used when the event has
/// no usable `date`.
pub fn extract_order(properties: &Properties, now: DateTime<Utc>) -> Order {
    let order_date = lookup(properties, "date")
        .and_then(parse_date)
        .unwrap_or(now);

    let items = match lookup(properties, "products") {
        Some(Value::Array(products)) => products
            .iter()
            .filter_map(Value::as_object)
            .map(extract_line_item)
            .collect(),
        _ => Vec::new(),
    };

    Order {
        order_id: text(properties, "orderId"),
        coupon_code: text(properties, "coupon"),
        subtotal: number(properties, "total").or_else(|| number(properties, "revenue")),
        order_date: iso_timestamp(order_date),
        items,
    }
}

/// Normalize one entry of the `products` array.
pub fn extract_line_item(product: &Properties) -> LineItem {
    let sku = text(product, "sku");
    let product_id = text(product, "productId")
        .or_else(|| text(product, "id"))
        .or_else(|| sku.clone());

    LineItem {
        product_id,
        sku,
        quantity: quantity(product),
        price: number(product, "price"),
        title: text(product, "name"),
        url: text(product, "url"),
        image_url: text(product, "image"),
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Look up a key, falling back to a format-insensitive match.
pub fn lookup<'a>(props: &'a Properties, key: &str) -> Option<&'a Value> {
    if let Some(value) = props.get(key) {
        return Some(value);
    }
    let wanted = normalize_key(key);
    props
        .iter()
        .find(|(k, _)| normalize_key(k) == wanted)
        .map(|(_, v)| v)
}

/// Non-empty string value; numeric ids are stringified.
pub fn text(props: &Properties, key: &str) -> Option<String> {
    match lookup(props, key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric value; numeric strings are parsed.
pub fn number(props: &Properties, key: &str) -> Option<f64> {
    match lookup(props, key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn quantity(product: &Properties) -> u64 {
    match lookup(product, "quantity") {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|q| *q >= 0.0).map(|q| q as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .unwrap_or(1)
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn looks_like_email(candidate: &str) -> bool {
    match candidate.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
