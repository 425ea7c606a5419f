use pedido_common::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One line of a checkout preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub title: String,
    pub unit_price: Money,
    pub quantity: i64,
}

/// Everything the provider needs to host a checkout page for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub order_id: i64,
    pub items: Vec<CheckoutItem>,
    pub success_url: String,
    pub failure_url: String,
    pub pending_url: String,
    /// Where the provider delivers asynchronous payment notifications.
    pub notification_url: String,
}

/// The provider's answer to a preference request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub preference_id: String,
    /// Hosted checkout URL the customer is redirected to.
    pub redirect_url: String,
}

/// Provider payment status, normalised. Unknown values are carried verbatim so the reconciliation
/// flow can acknowledge them without guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderStatus {
    Approved,
    Rejected,
    Cancelled,
    Pending,
    InProcess,
    Other(String),
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStatus::Approved => write!(f, "approved"),
            ProviderStatus::Rejected => write!(f, "rejected"),
            ProviderStatus::Cancelled => write!(f, "cancelled"),
            ProviderStatus::Pending => write!(f, "pending"),
            ProviderStatus::InProcess => write!(f, "in_process"),
            ProviderStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Authoritative payment record as returned by a by-id lookup. Webhook bodies are never trusted for
/// these facts; they are always re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub payment_id: String,
    pub status: ProviderStatus,
    /// Our order id, echoed back by the provider.
    pub external_reference: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// No credentials are configured. Call sites treat this as "refuse to guess", not as a failure.
    #[error("The payment gateway is not configured")]
    Unconfigured,
    #[error("No payment exists with id {0}")]
    PaymentNotFound(String),
    #[error("Payment provider call failed: {0}")]
    CallFailed(String),
    #[error("Could not interpret the provider response: {0}")]
    InvalidResponse(String),
}

/// The capability the order flow needs from a payment provider: exchange line items for a hosted
/// checkout URL, and look payments up by id.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    async fn create_preference(&self, request: &CheckoutRequest) -> Result<CheckoutSession, GatewayError>;

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails, GatewayError>;
}
