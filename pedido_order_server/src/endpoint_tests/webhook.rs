use actix_web::{http::StatusCode, web, web::ServiceConfig};
use pedido_order_engine::{
    db_types::OrderStatus,
    traits::{GatewayError, PaymentDetails, ProviderStatus},
    OrderFlowApi,
};
use serde_json::json;

use super::{
    helpers::{order_fixture, post_request, test_checkout_config},
    mocks::{MockBackend, MockGateway},
};
use crate::routes::order_webhook;

fn register(cfg: &mut ServiceConfig, backend: MockBackend, gateway: MockGateway) {
    let api = OrderFlowApi::new(backend, gateway, test_checkout_config());
    cfg.app_data(web::Data::new(api))
        .route("/webhook", web::post().to(order_webhook::<MockBackend, MockGateway>));
}

fn payment(status: ProviderStatus, order_id: Option<i64>) -> PaymentDetails {
    PaymentDetails {
        payment_id: "909090".to_string(),
        status,
        external_reference: order_id.map(|id| id.to_string()),
    }
}

#[actix_web::test]
async fn non_payment_events_are_acknowledged_and_ignored() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        // No expectations. Touching the gateway or the database would fail the test.
        register(cfg, MockBackend::new(), MockGateway::new());
    }
    let body = json!({"type": "test", "action": "test.created", "data": {"id": 123}});
    let (status, body) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Event ignored"), "{body}");
}

#[actix_web::test]
async fn acknowledgements_are_plain_text_not_json() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|_| Ok(payment(ProviderStatus::Approved, Some(42))));
        let mut backend = MockBackend::new();
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Paid, true))));
        register(cfg, backend, gateway);
    }
    let body = json!({"type": "payment", "data": {"id": 909090}});
    let (status, body) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    // The provider only reads the status code; the body is a human-readable note, not an envelope.
    assert!(serde_json::from_str::<serde_json::Value>(&body).is_err(), "{body}");
}

#[actix_web::test]
async fn payment_event_without_id_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        register(cfg, MockBackend::new(), MockGateway::new());
    }
    let body = json!({"type": "payment", "data": {}});
    let (status, _) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn approved_payment_reconciles_the_order() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|_| Ok(payment(ProviderStatus::Approved, Some(42))));
        let mut backend = MockBackend::new();
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Pending, false))));
        backend
            .expect_apply_payment_update()
            .withf(|id, status, payment, payment_ref, provider_status| {
                *id == 42 &&
                    *status == OrderStatus::Paid &&
                    *payment &&
                    payment_ref == "909090" &&
                    provider_status == "approved"
            })
            .returning(|_, _, _, _, _| Ok(order_fixture(42, OrderStatus::Paid, true)));
        register(cfg, backend, gateway);
    }
    let body = json!({"type": "payment", "action": "payment.updated", "data": {"id": 909090}});
    let (status, body) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order #42 is now Paid"), "{body}");
}

#[actix_web::test]
async fn redelivered_approval_is_acknowledged_without_writing() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|_| Ok(payment(ProviderStatus::Approved, Some(42))));
        let mut backend = MockBackend::new();
        // Already paid. apply_payment_update has no expectation, so a write would panic.
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Paid, true))));
        register(cfg, backend, gateway);
    }
    let body = json!({"type": "payment", "data": {"id": "909090"}});
    let (status, body) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order #42 unchanged"), "{body}");
}

#[actix_web::test]
async fn stale_pending_after_approval_is_dropped() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|_| Ok(payment(ProviderStatus::Pending, Some(42))));
        let mut backend = MockBackend::new();
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Paid, true))));
        register(cfg, backend, gateway);
    }
    let body = json!({"type": "payment", "data": {"id": 909090}});
    let (status, body) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Stale event for order #42 dropped"), "{body}");
}

#[actix_web::test]
async fn unknown_provider_status_is_acknowledged_without_mutation() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get_payment()
            .returning(|_| Ok(payment(ProviderStatus::Other("charged_back".to_string()), Some(42))));
        let mut backend = MockBackend::new();
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Paid, true))));
        register(cfg, backend, gateway);
    }
    let body = json!({"type": "payment", "data": {"id": 909090}});
    let (status, body) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("charged_back"), "{body}");
}

#[actix_web::test]
async fn unknown_payment_is_not_found() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|id| Err(GatewayError::PaymentNotFound(id.to_string())));
        register(cfg, MockBackend::new(), gateway);
    }
    let body = json!({"type": "payment", "data": {"id": 909090}});
    let (status, _) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn payment_without_order_reference_is_not_found() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|_| Ok(payment(ProviderStatus::Approved, None)));
        register(cfg, MockBackend::new(), gateway);
    }
    let body = json!({"type": "payment", "data": {"id": 909090}});
    let (status, _) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn provider_outage_requests_redelivery() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|_| Err(GatewayError::CallFailed("timed out".to_string())));
        register(cfg, MockBackend::new(), gateway);
    }
    let body = json!({"type": "payment", "data": {"id": 909090}});
    let (status, _) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn disabled_gateway_acknowledges_notifications() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_get_payment().returning(|_| Err(GatewayError::Unconfigured));
        register(cfg, MockBackend::new(), gateway);
    }
    let body = json!({"type": "payment", "data": {"id": 909090}});
    let (status, body) = post_request(None, "/webhook", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Gateway disabled"), "{body}");
}
