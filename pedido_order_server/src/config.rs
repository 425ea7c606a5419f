use std::env;

use log::*;
use mercado_tools::MercadoConfig;
use pedido_common::Money;
use pedido_order_engine::CheckoutConfig;

const DEFAULT_PEDIDO_HOST: &str = "127.0.0.1";
const DEFAULT_PEDIDO_PORT: u16 = 8380;
/// Flat delivery surcharge in cents, appended to every checkout preference.
const DEFAULT_DELIVERY_FEE: i64 = 200;
const DEFAULT_DELIVERY_LABEL: &str = "Delivery charge";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Public base URL of this deployment. The provider uses it to send customers back after
    /// checkout and to deliver webhooks, so it must be reachable from the outside.
    pub public_url: String,
    pub delivery_fee: Money,
    pub delivery_label: String,
    /// Payment provider credentials. `None` runs the server with the gateway disabled: orders can
    /// be placed and managed, but no payment path exists.
    pub mercado: Option<MercadoConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PEDIDO_HOST.to_string(),
            port: DEFAULT_PEDIDO_PORT,
            database_url: String::default(),
            public_url: format!("http://{DEFAULT_PEDIDO_HOST}:{DEFAULT_PEDIDO_PORT}"),
            delivery_fee: Money::from(DEFAULT_DELIVERY_FEE),
            delivery_label: DEFAULT_DELIVERY_LABEL.to_string(),
            mercado: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PEDIDO_HOST").ok().unwrap_or_else(|| DEFAULT_PEDIDO_HOST.into());
        let port = env::var("PEDIDO_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PEDIDO_PORT. {e} Using the default, {DEFAULT_PEDIDO_PORT}, \
                         instead."
                    );
                    DEFAULT_PEDIDO_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PEDIDO_PORT);
        let database_url = env::var("PEDIDO_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ PEDIDO_DATABASE_URL is not set. Please set it to the URL for the pedido database.");
            String::default()
        });
        let public_url = env::var("PEDIDO_PUBLIC_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ PEDIDO_PUBLIC_URL is not set. Checkout redirects and webhooks will point at {host}:{port}.");
            format!("http://{host}:{port}")
        });
        let delivery_fee = env::var("PEDIDO_DELIVERY_FEE")
            .ok()
            .and_then(|s| match Money::from_major(s.parse::<f64>().ok()?) {
                Ok(fee) => Some(fee),
                Err(e) => {
                    warn!("🪛️ Invalid configuration value for PEDIDO_DELIVERY_FEE. {e}");
                    None
                },
            })
            .unwrap_or(Money::from(DEFAULT_DELIVERY_FEE));
        let delivery_label =
            env::var("PEDIDO_DELIVERY_LABEL").ok().unwrap_or_else(|| DEFAULT_DELIVERY_LABEL.to_string());
        let mercado = MercadoConfig::try_from_env();
        if mercado.is_none() {
            warn!(
                "🪛️ No Mercado Pago credentials found. The server will start with the payment gateway disabled. Set \
                 PEDIDO_MP_ACCESS_TOKEN to enable it."
            );
        }
        Self { host, port, database_url, public_url, delivery_fee, delivery_label, mercado }
    }

    pub fn checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig {
            public_url: self.public_url.clone(),
            delivery_fee: self.delivery_fee,
            delivery_label: self.delivery_label.clone(),
        }
    }
}
