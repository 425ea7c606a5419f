use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::MercadoConfig,
    data_objects::{PaymentRecord, Preference, PreferenceRequest},
    MercadoApiError,
};

#[derive(Clone)]
pub struct MercadoApi {
    config: MercadoConfig,
    client: Arc<Client>,
}

impl MercadoApi {
    pub fn new(config: MercadoConfig) -> Result<Self, MercadoApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.access_token.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| MercadoApiError::Initialization(e.to_string()))?;
        headers.insert(AUTHORIZATION, val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MercadoApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, MercadoApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| MercadoApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| MercadoApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MercadoApiError::RestResponseError(e.to_string()))?;
            Err(MercadoApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Exchanges a preference request for a hosted checkout URL.
    pub async fn create_preference(&self, request: &PreferenceRequest) -> Result<Preference, MercadoApiError> {
        debug!("Creating payment preference for order {}", request.external_reference);
        let preference =
            self.rest_query::<Preference, _>(Method::POST, "/checkout/preferences", Some(request)).await?;
        info!("Created payment preference {} for order {}", preference.id, request.external_reference);
        Ok(preference)
    }

    /// Fetches the authoritative payment record for the given payment id.
    pub async fn get_payment(&self, payment_id: &str) -> Result<PaymentRecord, MercadoApiError> {
        let path = format!("/v1/payments/{payment_id}");
        debug!("Fetching payment {payment_id}");
        let result = self.rest_query::<PaymentRecord, ()>(Method::GET, &path, None).await;
        match result {
            Err(MercadoApiError::QueryError { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(MercadoApiError::PaymentNotFound(payment_id.to_string()))
            },
            other => other,
        }
    }
}
