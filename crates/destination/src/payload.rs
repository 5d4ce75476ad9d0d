//! Vendor payload shapes and the builders that assemble them from
//! configuration plus extracted identity/order fields.
//!
//! Builders only borrow their inputs; every call returns a fresh payload.

use serde::Serialize;
use talkable_core::config::AdapterConfig;
use talkable_core::types::{LineItem, Order};

use crate::extract::IdentityFields;

/// `init` command body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitPayload {
    pub site_id: String,
    pub server: String,
}

/// `register_affiliate` command body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffiliatePayload {
    pub responsive: bool,
    pub device: String,
    pub campaign_tags: Vec<String>,
    pub iframe: IframeSettings,
    /// Only present when the user has an email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_member: Option<AffiliateMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IframeSettings {
    pub width: String,
    pub height: String,
    pub id: String,
    pub frameborder: u32,
    pub container: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffiliateMember {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub customer_id: Option<String>,
}

/// `register_purchase` command body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchasePayload {
    pub order_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(flatten)]
    pub customer: Option<CustomerPayload>,
    pub items: Vec<PurchaseItem>,
}

/// Customer identity: flattened into the legacy purchase call and sent on
/// its own by the simplified `identify` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerPayload {
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub fn init_payload(config: &AdapterConfig) -> InitPayload {
    InitPayload {
        site_id: config.site_id.clone(),
        server: config.server.clone(),
    }
}

pub fn affiliate_payload(
    config: &AdapterConfig,
    campaign_tags: Vec<String>,
    identity: &IdentityFields,
) -> AffiliatePayload {
    let affiliate_member = identity
        .email
        .as_ref()
        .filter(|email| !email.is_empty())
        .map(|email| AffiliateMember {
            email: email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            customer_id: identity.user_id.clone(),
        });

    AffiliatePayload {
        responsive: config.responsive,
        device: config.device.clone(),
        campaign_tags,
        iframe: IframeSettings {
            width: config.iframe_width.clone(),
            height: config.iframe_height.clone(),
            id: config.iframe_id.clone(),
            frameborder: config.iframe_border,
            container: config.insert_into_id.clone(),
        },
        affiliate_member,
    }
}

/// Build the purchase payload. `customer` is `None` for API variants that do
/// not take identity in the purchase call.
pub fn purchase_payload(order: &Order, customer: Option<&IdentityFields>) -> PurchasePayload {
    PurchasePayload {
        order_date: order.order_date.clone(),
        order_number: order.order_id.clone(),
        coupon_code: order.coupon_code.clone(),
        subtotal: order.subtotal,
        customer: customer.map(customer_payload),
        items: order.items.iter().map(purchase_item).collect(),
    }
}

pub fn customer_payload(fields: &IdentityFields) -> CustomerPayload {
    CustomerPayload {
        customer_id: fields.user_id.clone(),
        first_name: fields.first_name.clone(),
        last_name: fields.last_name.clone(),
        email: fields.email.clone(),
    }
}

fn purchase_item(item: &LineItem) -> PurchaseItem {
    PurchaseItem {
        product_id: item.product_id.clone(),
        quantity: item.quantity,
        image_url: item.image_url.clone(),
        price: item.price,
        title: item.title.clone(),
        url: item.url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member() -> IdentityFields {
        IdentityFields {
            user_id: Some("id".into()),
            email: Some("name@example.com".into()),
            first_name: Some("first".into()),
            last_name: Some("last".into()),
        }
    }

    fn order() -> Order {
        Order {
            order_id: Some("ab535a52".into()),
            coupon_code: Some("save20".into()),
            subtotal: Some(647.92),
            order_date: "2026-10-18T12:00:00.000Z".into(),
            items: vec![LineItem {
                product_id: Some("yolo".into()),
                sku: Some("5be59f56".into()),
                quantity: 8,
                price: Some(80.99),
                title: Some("my-product".into()),
                url: Some("//products.io/my-product".into()),
                image_url: Some("//products.io/my-product.webp".into()),
            }],
        }
    }

    #[test]
    fn test_init_payload() {
        let config = AdapterConfig {
            site_id: "site-1".into(),
            ..AdapterConfig::default()
        };
        assert_eq!(
            serde_json::to_value(init_payload(&config)).unwrap(),
            json!({ "site_id": "site-1", "server": "https://www.curebit.com" })
        );
    }

    #[test]
    fn test_affiliate_payload_without_member() {
        let payload = affiliate_payload(
            &AdapterConfig::default(),
            vec!["share".into(), "test".into()],
            &IdentityFields::default(),
        );
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "responsive": true,
                "device": "",
                "campaign_tags": ["share", "test"],
                "iframe": {
                    "width": "100%",
                    "height": "480",
                    "id": "curebit_integration",
                    "frameborder": 0,
                    "container": ""
                }
            })
        );
    }

    #[test]
    fn test_affiliate_payload_with_member() {
        let payload = affiliate_payload(&AdapterConfig::default(), vec!["share".into()], &member());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["affiliate_member"],
            json!({
                "email": "name@example.com",
                "first_name": "first",
                "last_name": "last",
                "customer_id": "id"
            })
        );
    }

    #[test]
    fn test_empty_email_omits_member() {
        let identity = IdentityFields {
            email: Some(String::new()),
            ..member()
        };
        let payload = affiliate_payload(&AdapterConfig::default(), vec!["a".into()], &identity);
        assert!(payload.affiliate_member.is_none());
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("affiliate_member").is_none());
    }

    #[test]
    fn test_purchase_payload_with_anonymous_customer() {
        let payload = purchase_payload(&order(), Some(&IdentityFields::default()));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "order_date": "2026-10-18T12:00:00.000Z",
                "order_number": "ab535a52",
                "coupon_code": "save20",
                "subtotal": 647.92,
                "customer_id": null,
                "items": [{
                    "product_id": "yolo",
                    "quantity": 8,
                    "image_url": "//products.io/my-product.webp",
                    "price": 80.99,
                    "title": "my-product",
                    "url": "//products.io/my-product"
                }]
            })
        );
    }

    #[test]
    fn test_purchase_payload_without_customer_block() {
        let value = serde_json::to_value(purchase_payload(&order(), None)).unwrap();
        for key in ["customer_id", "first_name", "last_name", "email"] {
            assert!(value.get(key).is_none(), "{key} should be omitted");
        }
        assert_eq!(value["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_subtotal_and_coupon_round_trip() {
        let source = order();
        let value = serde_json::to_value(purchase_payload(&source, Some(&member()))).unwrap();
        assert_eq!(value["subtotal"].as_f64(), source.subtotal);
        assert_eq!(value["coupon_code"].as_str(), source.coupon_code.as_deref());
    }

    #[test]
    fn test_builder_leaves_inputs_untouched() {
        let source = order();
        let before = source.clone();
        let first = purchase_payload(&source, None);
        let second = purchase_payload(&source, None);
        assert_eq!(source, before);
        assert_eq!(first, second);
    }
}
