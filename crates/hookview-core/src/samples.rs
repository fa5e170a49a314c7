//! Bundled sample payloads for local test runs.
//!
//! A test run pushes one of these straight into a viewer's event buffer
//! without touching the network, so the viewer can be exercised before a
//! real store is wired up.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::events::CapturedEvent;

/// Marker stored in `event_source` of locally injected payloads.
pub const LOCAL_TEST_SOURCE: &str = "local_manual_test_run";

/// Id prefix of locally injected events.
pub const LOCAL_TEST_ID_PREFIX: &str = "local-test";

/// Kinds of sample events available for a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestEventKind {
    /// `orders/create`
    OrderCreated,
    /// `products/update`
    ProductUpdated,
    /// `orders/cancelled`
    OrderCancelled,
}

impl TestEventKind {
    /// All kinds in display order.
    pub const ALL: [TestEventKind; 3] = [
        TestEventKind::OrderCreated,
        TestEventKind::ProductUpdated,
        TestEventKind::OrderCancelled,
    ];

    /// Human-readable label, also stored as `event_type` in the payload.
    pub fn label(self) -> &'static str {
        match self {
            Self::OrderCreated => "Order Created",
            Self::ProductUpdated => "Product Updated",
            Self::OrderCancelled => "Order Cancelled",
        }
    }

    /// Upstream webhook topic for this kind.
    pub fn topic(self) -> &'static str {
        match self {
            Self::OrderCreated => "orders/create",
            Self::ProductUpdated => "products/update",
            Self::OrderCancelled => "orders/cancelled",
        }
    }

    /// The sample payload as the upstream platform would send it.
    pub fn payload(self) -> Value {
        match self {
            Self::OrderCreated => order_created(),
            Self::ProductUpdated => product_updated(),
            Self::OrderCancelled => order_cancelled(),
        }
    }

    /// Build a local test event for this kind received at `now`.
    ///
    /// The payload is annotated with `event_source` and `received_at` so a
    /// viewer can tell it apart from a relayed delivery.
    pub fn to_local_event(self, now: DateTime<Utc>) -> CapturedEvent {
        let mut payload = self.payload();
        if let Value::Object(map) = &mut payload {
            map.insert("event_source".to_string(), json!(LOCAL_TEST_SOURCE));
            map.insert("received_at".to_string(), json!(now.to_rfc3339()));
        }
        CapturedEvent::with_generated_id(LOCAL_TEST_ID_PREFIX, now, payload)
    }
}

impl fmt::Display for TestEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestEventKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' ', '/'], "_");
        match normalized.as_str() {
            "order_created" | "orders_create" => Ok(Self::OrderCreated),
            "product_updated" | "products_update" => Ok(Self::ProductUpdated),
            "order_cancelled" | "orders_cancelled" => Ok(Self::OrderCancelled),
            _ => Err(AppError::validation(format!("Unknown test event kind: {s}"))),
        }
    }
}

fn order_created() -> Value {
    json!({
        "event_type": TestEventKind::OrderCreated.label(),
        "id": 6011185955070u64,
        "admin_graphql_api_id": "gid://shopify/Order/6011185955070",
        "app_id": 580111,
        "browser_ip": "154.80.33.250",
        "buyer_accepts_marketing": false,
        "cancel_reason": null,
        "cancelled_at": null,
        "checkout_id": 36255044632830u64,
        "confirmation_number": "JFVBNM87U",
        "contact_email": "customer@example.com",
        "created_at": "2024-07-28T10:30:00-04:00",
        "currency": "USD",
        "current_total_price": "199.99",
        "line_items": [
            {
                "id": 1234567890123u64,
                "title": "Awesome T-Shirt",
                "quantity": 1,
                "sku": "TSHIRT-BLK-L",
                "price": "25.00",
                "vendor": "MyBrand"
            }
        ],
        "name": "#1001",
        "order_number": 1001,
        "processed_at": "2024-07-28T10:30:00-04:00",
        "shipping_address": {
            "first_name": "John",
            "last_name": "Doe",
            "address1": "123 Shopify Street",
            "city": "Ottawa",
            "province_code": "ON",
            "zip": "K1N 5T5",
            "country_code": "CA"
        },
        "tags": "new-customer, vip",
        "total_price": "199.99",
        "updated_at": "2024-07-28T10:30:00-04:00",
        "user_id": null
    })
}

fn product_updated() -> Value {
    json!({
        "event_type": TestEventKind::ProductUpdated.label(),
        "id": 801230450789u64,
        "admin_graphql_api_id": "gid://shopify/Product/801230450789",
        "title": "Updated Luxury Snowboard",
        "vendor": "SnowBeast Inc.",
        "product_type": "Snowboard",
        "created_at": "2024-07-01T10:00:00-04:00",
        "updated_at": "2024-07-29T11:00:00-04:00",
        "published_at": "2024-07-01T10:00:00-04:00",
        "status": "active",
        "tags": "snowboard, winter, pro-series",
        "variants": [
            {
                "id": 987654321098u64,
                "product_id": 801230450789u64,
                "title": "155cm",
                "price": "599.99",
                "sku": "SB-LUX-155",
                "inventory_quantity": 15,
                "old_inventory_quantity": 20
            },
            {
                "id": 987654321099u64,
                "product_id": 801230450789u64,
                "title": "160cm",
                "price": "609.99",
                "sku": "SB-LUX-160",
                "inventory_quantity": 10,
                "old_inventory_quantity": 10
            }
        ],
        "images": [
            { "id": 1001, "src": "https://example.com/images/snowboard_updated.jpg" }
        ]
    })
}

fn order_cancelled() -> Value {
    json!({
        "event_type": TestEventKind::OrderCancelled.label(),
        "id": 6011185955070u64,
        "admin_graphql_api_id": "gid://shopify/Order/6011185955070",
        "app_id": 580111,
        "cancel_reason": "customer",
        "cancelled_at": "2024-07-29T12:00:00-04:00",
        "currency": "USD",
        "email": "customer@example.com",
        "financial_status": "refunded",
        "name": "#1001",
        "order_number": 1001,
        "phone": null,
        "total_price": "199.99",
        "user_id": null,
        "note": "Customer requested cancellation."
    })
}
