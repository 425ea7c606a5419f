use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use pedido_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
pub use sqlx::types::Json;
use thiserror::Error;

/// Fallback contact number used when neither the request nor the delivery address carries one.
pub const DEFAULT_PHONE: &str = "0000000000";

//--------------------------------------    OrderStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order has been created and no payment outcome has been received.
    Pending,
    /// The payment provider confirmed an approved payment.
    Paid,
    /// The payment was rejected or cancelled by the provider. Terminal.
    Failed,
    /// The kitchen has started preparing the order.
    Preparing,
    /// The order is ready for pickup by a driver.
    Ready,
    /// A driver has collected the order.
    OutForDelivery,
    /// The order reached the customer. Terminal.
    Delivered,
    /// The order was cancelled by the customer or an admin. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses never revert.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Failed | OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Statuses that block driver deletion while any referencing order carries one.
    pub const ACTIVE: [OrderStatus; 5] =
        [OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::OutForDelivery];
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Failed => write!(f, "Failed"),
            OrderStatus::Preparing => write!(f, "Preparing"),
            OrderStatus::Ready => write!(f, "Ready"),
            OrderStatus::OutForDelivery => write!(f, "OutForDelivery"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(pub String);

impl FromStr for OrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            "Preparing" => Ok(Self::Preparing),
            "Ready" => Ok(Self::Ready),
            "OutForDelivery" => Ok(Self::OutForDelivery),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatus::Pending
        })
    }
}

//--------------------------------------      Address        ---------------------------------------------------------
/// Structured delivery address. An order is rejected before persistence unless street, number,
/// neighborhood and zone are all present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl Address {
    /// Names of the required fields that are missing or blank. Empty means the address is complete.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.street.trim().is_empty() {
            missing.push("street");
        }
        if self.number.trim().is_empty() {
            missing.push("number");
        }
        if self.neighborhood.trim().is_empty() {
            missing.push("neighborhood");
        }
        if self.zone.trim().is_empty() {
            missing.push("zone");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

//--------------------------------------      LineItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// Unit price in cents.
    pub price: Money,
    pub quantity: i64,
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: String,
    pub items: Json<Vec<LineItem>>,
    /// Caller-supplied total, in cents. Never recomputed from `items` server-side.
    pub amount: Money,
    pub address: Json<Address>,
    pub phone: String,
    pub status: OrderStatus,
    /// True only once a payment has been confirmed approved.
    pub payment: bool,
    /// Provider preference id at creation; overwritten with the concrete payment id by reconciliation.
    pub payment_ref: Option<String>,
    pub driver_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub items: Vec<LineItem>,
    /// Total charge as asserted by the caller. Persisted verbatim.
    pub amount: Money,
    pub address: Address,
    pub phone: Option<String>,
}

impl NewOrder {
    pub fn new(customer_id: String, items: Vec<LineItem>, amount: Money, address: Address) -> Self {
        Self { customer_id, items, amount, address, phone: None }
    }

    pub fn with_phone(mut self, phone: String) -> Self {
        self.phone = Some(phone);
        self
    }

    /// Explicit phone, falling back to the address phone, then to [`DEFAULT_PHONE`].
    pub fn resolved_phone(&self) -> String {
        self.phone
            .as_deref()
            .or(self.address.phone.as_deref())
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PHONE)
            .to_string()
    }
}

//--------------------------------------    PaymentEvent     ---------------------------------------------------------
/// Immutable audit row appended on every reconciliation write.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentEvent {
    pub id: i64,
    pub order_id: i64,
    pub payment_ref: String,
    pub provider_status: String,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------        Role         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "Customer"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Admin" => Role::Admin,
            _ => Role::Customer,
        }
    }
}

/// A user record, as far as the order subsystem cares: enough for admin checks and customer-name backfill.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub role: Role,
}
