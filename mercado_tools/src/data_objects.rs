use serde::{Deserialize, Serialize};

//--------------------------------------  Preference (checkout) -------------------------------------------------------

/// One line on the hosted checkout page. Prices are decimal major units on the wire, which is what the
/// Mercado Pago API expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceItem {
    pub title: String,
    pub unit_price: f64,
    pub quantity: i64,
    /// ISO currency code, e.g. "ARS".
    pub currency_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Body of `POST /checkout/preferences`. The `external_reference` carries our order id so that the
/// provider's webhook can be correlated back to a local order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub external_reference: String,
    pub notification_url: String,
}

/// The provider's response: `init_point` is the hosted checkout URL the customer is redirected to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    pub id: String,
    pub init_point: String,
}

//--------------------------------------  Payment lookup  -------------------------------------------------------------

/// The provider's payment status vocabulary. Anything we do not recognise lands in `Other` so that an
/// unknown status can be acknowledged without corrupting order state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderPaymentStatus {
    Approved,
    Rejected,
    Cancelled,
    Pending,
    InProcess,
    #[serde(untagged)]
    Other(String),
}

/// Authoritative payment record, fetched by id. Monetary and status facts are always re-fetched from
/// this record rather than trusted from webhook bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub status: ProviderPaymentStatus,
    pub external_reference: Option<String>,
}
