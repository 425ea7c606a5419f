//! Adapts the Mercado Pago client to the payment gateway capability the order engine consumes.

use log::*;
use mercado_tools::{BackUrls, MercadoApi, MercadoApiError, MercadoConfig, PreferenceItem, PreferenceRequest, ProviderPaymentStatus};
use pedido_common::CURRENCY_CODE;
use pedido_order_engine::traits::{
    CheckoutRequest,
    CheckoutSession,
    GatewayError,
    PaymentDetails,
    PaymentGateway,
    ProviderStatus,
};

#[derive(Clone)]
pub struct MercadoGateway {
    api: MercadoApi,
}

impl MercadoGateway {
    pub fn new(config: MercadoConfig) -> Result<Self, MercadoApiError> {
        let api = MercadoApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentGateway for MercadoGateway {
    async fn create_preference(&self, request: &CheckoutRequest) -> Result<CheckoutSession, GatewayError> {
        let preference = preference_request(request);
        let preference = self.api.create_preference(&preference).await.map_err(to_gateway_error)?;
        Ok(CheckoutSession { preference_id: preference.id, redirect_url: preference.init_point })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails, GatewayError> {
        let record = self.api.get_payment(payment_id).await.map_err(to_gateway_error)?;
        Ok(PaymentDetails {
            payment_id: record.id.to_string(),
            status: provider_status(record.status),
            external_reference: record.external_reference,
        })
    }
}

fn preference_request(request: &CheckoutRequest) -> PreferenceRequest {
    let items = request
        .items
        .iter()
        .map(|i| PreferenceItem {
            title: i.title.clone(),
            unit_price: i.unit_price.to_major(),
            quantity: i.quantity,
            currency_id: CURRENCY_CODE.to_string(),
        })
        .collect();
    PreferenceRequest {
        items,
        back_urls: BackUrls {
            success: request.success_url.clone(),
            failure: request.failure_url.clone(),
            pending: request.pending_url.clone(),
        },
        auto_return: "approved".to_string(),
        external_reference: request.order_id.to_string(),
        notification_url: request.notification_url.clone(),
    }
}

fn provider_status(status: ProviderPaymentStatus) -> ProviderStatus {
    match status {
        ProviderPaymentStatus::Approved => ProviderStatus::Approved,
        ProviderPaymentStatus::Rejected => ProviderStatus::Rejected,
        ProviderPaymentStatus::Cancelled => ProviderStatus::Cancelled,
        ProviderPaymentStatus::Pending => ProviderStatus::Pending,
        ProviderPaymentStatus::InProcess => ProviderStatus::InProcess,
        ProviderPaymentStatus::Other(s) => ProviderStatus::Other(s),
    }
}

fn to_gateway_error(e: MercadoApiError) -> GatewayError {
    match e {
        MercadoApiError::PaymentNotFound(id) => GatewayError::PaymentNotFound(id),
        MercadoApiError::JsonError(s) => GatewayError::InvalidResponse(s),
        MercadoApiError::QueryError { status, message } => {
            GatewayError::CallFailed(format!("The provider answered {status}: {message}"))
        },
        e => GatewayError::CallFailed(e.to_string()),
    }
}

/// Stand-in gateway used when no Mercado Pago credentials are configured. Every call reports
/// [`GatewayError::Unconfigured`], which the order flow treats as "no payment path", not a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGateway;

impl PaymentGateway for DisabledGateway {
    async fn create_preference(&self, request: &CheckoutRequest) -> Result<CheckoutSession, GatewayError> {
        debug!("💻️ Preference request for order #{} ignored; the gateway is disabled", request.order_id);
        Err(GatewayError::Unconfigured)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails, GatewayError> {
        debug!("💻️ Payment lookup for {payment_id} ignored; the gateway is disabled");
        Err(GatewayError::Unconfigured)
    }
}
