use std::time::Duration;

use log::*;
use pedido_common::Secret;

pub const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct MercadoConfig {
    /// Base URL of the Mercado Pago REST API. Overridable so tests can point the client at a local server.
    pub base_url: String,
    pub access_token: Secret<String>,
    /// Upper bound on every outbound request. A timed-out payment lookup is reported as a retryable
    /// failure rather than hanging the webhook request.
    pub timeout: Duration,
}

impl Default for MercadoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: Secret::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl MercadoConfig {
    pub fn new(access_token: Secret<String>) -> Self {
        Self { access_token, ..Default::default() }
    }

    /// Builds a configuration from `PEDIDO_MP_*` environment variables. Returns `None` when no access
    /// token is set, so the caller can fall back to a disabled gateway instead of sending doomed requests.
    pub fn try_from_env() -> Option<Self> {
        let access_token = match std::env::var("PEDIDO_MP_ACCESS_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Secret::new(token),
            _ => {
                warn!("PEDIDO_MP_ACCESS_TOKEN is not set. The payment gateway will run in disabled mode.");
                return None;
            },
        };
        let base_url = std::env::var("PEDIDO_MP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var("PEDIDO_MP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        Some(Self { base_url, access_token, timeout })
    }
}
