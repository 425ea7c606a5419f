use actix_web::{http::StatusCode, web, web::ServiceConfig};
use pedido_order_engine::{
    db_types::{OrderStatus, Role, UserRecord},
    traits::{CheckoutSession, GatewayError},
    OrderFlowApi,
};
use serde_json::json;

use super::{
    helpers::{get_request, order_fixture, post_request, test_checkout_config},
    mocks::{MockBackend, MockGateway},
};
use crate::routes::{assign_driver, delete_driver, list_orders, place_order, update_status, user_orders, verify_order};

fn register(cfg: &mut ServiceConfig, backend: MockBackend, gateway: MockGateway) {
    let api = OrderFlowApi::new(backend, gateway, test_checkout_config());
    cfg.app_data(web::Data::new(api))
        .route("/place", web::post().to(place_order::<MockBackend, MockGateway>))
        .route("/verify", web::post().to(verify_order::<MockBackend, MockGateway>))
        .route("/status", web::post().to(update_status::<MockBackend, MockGateway>))
        .route("/assign-driver", web::post().to(assign_driver::<MockBackend, MockGateway>))
        .route("/delete-driver", web::post().to(delete_driver::<MockBackend, MockGateway>))
        .route("/list", web::get().to(list_orders::<MockBackend, MockGateway>))
        .route("/userorders", web::post().to(user_orders::<MockBackend, MockGateway>));
}

fn user(id: &str, role: Role) -> UserRecord {
    UserRecord { id: id.to_string(), name: "Ana García".to_string(), role }
}

fn place_body() -> serde_json::Value {
    json!({
        "userId": "user-1",
        "items": [{"name": "Pizza", "price": 20.0, "quantity": 2}],
        "amount": 42.0,
        "address": {"street": "Av. Rivadavia", "number": "742", "neighborhood": "Caballito", "zone": "Oeste"},
        "phone": "11-5555-0001"
    })
}

//--------------------------------------  Placement  -------------------------------------------------------------------

#[actix_web::test]
async fn place_order_returns_checkout_redirect() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        backend.expect_insert_order().returning(|_, _| Ok(order_fixture(42, OrderStatus::Pending, false)));
        backend.expect_clear_cart().returning(|_| Ok(()));
        backend
            .expect_set_payment_ref()
            .withf(|id, payment_ref| *id == 42 && payment_ref == "pref-42")
            .returning(|_, _| Ok(order_fixture(42, OrderStatus::Pending, false)));
        let mut gateway = MockGateway::new();
        gateway.expect_create_preference().returning(|_| {
            Ok(CheckoutSession {
                preference_id: "pref-42".to_string(),
                redirect_url: "https://mp.test/init/pref-42".to_string(),
            })
        });
        register(cfg, backend, gateway);
    }
    let (status, body) = post_request(Some("user-1"), "/place", place_body(), configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""orderId":42"#), "{body}");
    assert!(body.contains(r#""payment_url":"https://mp.test/init/pref-42""#), "{body}");
}

#[actix_web::test]
async fn place_order_with_incomplete_address_is_rejected() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        // Nothing may be persisted, so no expectations beyond the identity lookup.
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        register(cfg, backend, MockGateway::new());
    }
    let mut body = place_body();
    body["address"]["zone"] = json!("");
    let (status, body) = post_request(Some("user-1"), "/place", body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#""success":false"#), "{body}");
    assert!(body.contains("zone"), "{body}");
}

#[actix_web::test]
async fn place_order_requires_an_identity() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        register(cfg, MockBackend::new(), MockGateway::new());
    }
    let (status, _) = post_request(None, "/place", place_body(), configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn customers_cannot_place_orders_for_someone_else() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        register(cfg, backend, MockGateway::new());
    }
    let (status, _) = post_request(Some("user-2"), "/place", place_body(), configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn place_order_without_gateway_still_persists() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        backend.expect_insert_order().returning(|_, _| Ok(order_fixture(42, OrderStatus::Pending, false)));
        backend.expect_clear_cart().returning(|_| Ok(()));
        let mut gateway = MockGateway::new();
        gateway.expect_create_preference().returning(|_| Err(GatewayError::Unconfigured));
        register(cfg, backend, gateway);
    }
    let (status, body) = post_request(Some("user-1"), "/place", place_body(), configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":false"#), "{body}");
    assert!(body.contains("not configured"), "{body}");
    assert!(!body.contains("payment_url"), "{body}");
}

//--------------------------------------  Verify  ----------------------------------------------------------------------

#[actix_web::test]
async fn verify_rejects_anything_but_literal_true_or_false() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "success": "maybe"});
    let (status, _) = post_request(Some("user-1"), "/verify", body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn verify_failure_deletes_the_order() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Pending, false))));
        backend.expect_delete_order().withf(|id| *id == 42).returning(|_| Ok(true));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "success": "false"});
    let (status, body) = post_request(Some("user-1"), "/verify", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("deleted"), "{body}");
}

#[actix_web::test]
async fn customers_cannot_verify_someone_elses_order() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        // The fixture belongs to user-1. No delete expectation, so a deletion would panic.
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Pending, false))));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "success": "false"});
    let (status, _) = post_request(Some("user-2"), "/verify", body, configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

//--------------------------------------  Admin  -----------------------------------------------------------------------

#[actix_web::test]
async fn status_update_requires_an_identity() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        register(cfg, MockBackend::new(), MockGateway::new());
    }
    let body = json!({"orderId": 42, "status": "Preparing"});
    let (status, _) = post_request(None, "/status", body, configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn status_update_requires_the_admin_role() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "status": "Preparing"});
    let (status, _) = post_request(Some("user-1"), "/status", body, configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_moves_a_paid_order_to_preparing() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Admin))));
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Paid, true))));
        backend
            .expect_update_status()
            .withf(|id, status, payment| *id == 42 && *status == OrderStatus::Preparing && *payment)
            .returning(|_, _, _| Ok(order_fixture(42, OrderStatus::Preparing, true)));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "status": "Preparing"});
    let (status, body) = post_request(Some("admin-1"), "/status", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""status":"Preparing""#), "{body}");
}

#[actix_web::test]
async fn admin_cannot_skip_the_status_ladder() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Admin))));
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Pending, false))));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "status": "Delivered"});
    let (status, _) = post_request(Some("admin-1"), "/status", body, configure).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn unknown_status_names_are_rejected() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Admin))));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "status": "Shipped"});
    let (status, _) = post_request(Some("admin-1"), "/status", body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn admin_lists_all_orders_with_backfilled_names() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| match id {
            "admin-1" => Ok(Some(user(id, Role::Admin))),
            _ => Ok(Some(user(id, Role::Customer))),
        });
        backend.expect_fetch_all_orders().returning(|| {
            Ok(vec![order_fixture(1, OrderStatus::Paid, true), order_fixture(2, OrderStatus::Pending, false)])
        });
        register(cfg, backend, MockGateway::new());
    }
    let (status, body) = get_request(Some("admin-1"), "/list", configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""customer_name":"Ana García""#), "{body}");
}

//--------------------------------------  Drivers  ---------------------------------------------------------------------

#[actix_web::test]
async fn assigning_an_unknown_driver_is_not_found() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Admin))));
        backend.expect_fetch_order().returning(|_| Ok(Some(order_fixture(42, OrderStatus::Paid, true))));
        backend.expect_driver_exists().returning(|_| Ok(false));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"orderId": 42, "driverId": "ghost"});
    let (status, _) = post_request(Some("admin-1"), "/assign-driver", body, configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn deleting_a_driver_with_active_orders_conflicts() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Admin))));
        backend.expect_active_orders_for_driver().returning(|_| Ok(2));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"driverId": "drv-1"});
    let (status, body) = post_request(Some("admin-1"), "/delete-driver", body, configure).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("2 active orders"), "{body}");
}

//--------------------------------------  Customer  --------------------------------------------------------------------

#[actix_web::test]
async fn customers_list_their_own_orders() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        backend
            .expect_fetch_orders_for_customer()
            .withf(|id| id == "user-1")
            .returning(|_| Ok(vec![order_fixture(42, OrderStatus::Paid, true)]));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"userId": "user-1"});
    let (status, body) = post_request(Some("user-1"), "/userorders", body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""id":42"#), "{body}");
}

#[actix_web::test]
async fn customers_cannot_list_someone_elses_orders() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user().returning(|id| Ok(Some(user(id, Role::Customer))));
        register(cfg, backend, MockGateway::new());
    }
    let body = json!({"userId": "user-1"});
    let (status, _) = post_request(Some("user-2"), "/userorders", body, configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
