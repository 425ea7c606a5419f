use std::fmt::Display;

use pedido_common::{Money, MoneyConversionError};
use pedido_order_engine::db_types::{Address, LineItem, NewOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//--------------------------------------  Order placement  ------------------------------------------------------------

/// One line item as sent by the storefront. Prices arrive as decimal major units and are converted
/// to cents at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPayload {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: String,
    pub items: Vec<ItemPayload>,
    /// Order total asserted by the storefront, in major units. Persisted verbatim.
    pub amount: f64,
    pub address: Address,
    #[serde(default)]
    pub phone: Option<String>,
}

impl PlaceOrderRequest {
    pub fn into_new_order(self) -> Result<NewOrder, MoneyConversionError> {
        let items = self
            .items
            .into_iter()
            .map(|i| Ok(LineItem { name: i.name, price: Money::from_major(i.price)?, quantity: i.quantity }))
            .collect::<Result<Vec<_>, MoneyConversionError>>()?;
        let amount = Money::from_major(self.amount)?;
        let mut order = NewOrder::new(self.user_id, items, amount, self.address);
        if let Some(phone) = self.phone {
            order = order.with_phone(phone);
        }
        Ok(order)
    }
}

/// The placement response. The storefront reads `payment_url` with that exact spelling, so the
/// field opts out of the camelCase convention the request DTOs follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub order_id: i64,
    /// Hosted checkout URL. Absent when the payment gateway is disabled.
    #[serde(rename = "payment_url", skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    pub message: String,
}

//--------------------------------------  Verify  ----------------------------------------------------------------------

/// The client-side verification callback. `success` is the literal string the checkout redirect
/// carried; only exactly `"true"` or `"false"` are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub order_id: i64,
    pub success: String,
}

impl VerifyRequest {
    pub fn success_flag(&self) -> Option<bool> {
        match self.success.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

//--------------------------------------  Webhook  ---------------------------------------------------------------------

/// A Mercado Pago webhook notification. Only the event type and the payment id are read; all
/// payment facts are re-fetched from the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    /// The provider sends this as a JSON number or a string depending on the notification channel.
    pub id: Option<serde_json::Value>,
}

impl WebhookEvent {
    pub fn is_payment(&self) -> bool {
        self.event_type.as_deref() == Some("payment")
    }

    pub fn payment_id(&self) -> Option<String> {
        match self.data.as_ref()?.id.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

//--------------------------------------  Admin & drivers  -------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub order_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDriverRequest {
    pub order_id: i64,
    pub driver_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDriverRequest {
    pub driver_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrdersRequest {
    pub user_id: String,
}
