use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use pedido_common::Money;
use pedido_order_engine::{
    db_types::{Address, Json, LineItem, Order, OrderStatus},
    CheckoutConfig,
};
use serde_json::Value;

use crate::auth::USER_ID_HEADER;

pub fn test_checkout_config() -> CheckoutConfig {
    CheckoutConfig {
        public_url: "https://pedido.test".to_string(),
        delivery_fee: Money::from(200),
        delivery_label: "Delivery charge".to_string(),
    }
}

pub fn delivery_address() -> Address {
    Address {
        street: "Av. Rivadavia".into(),
        number: "742".into(),
        neighborhood: "Caballito".into(),
        zone: "Oeste".into(),
        phone: Some("11-5555-0001".into()),
        customer_name: None,
    }
}

pub fn order_fixture(id: i64, status: OrderStatus, payment: bool) -> Order {
    Order {
        id,
        customer_id: "user-1".to_string(),
        items: Json(vec![LineItem { name: "Pizza".into(), price: Money::from(2000), quantity: 2 }]),
        amount: Money::from(4200),
        address: Json(delivery_address()),
        phone: "11-5555-0001".to_string(),
        status,
        payment,
        payment_ref: Some("pref-42".to_string()),
        driver_id: None,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub async fn post_request(
    user: Option<&str>,
    path: &str,
    body: Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri(path).set_json(body);
    if let Some(user) = user {
        req = req.insert_header((USER_ID_HEADER, user));
    }
    send(req, configure).await
}

pub async fn get_request(user: Option<&str>, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let mut req = TestRequest::get().uri(path);
    if let Some(user) = user {
        req = req.insert_header((USER_ID_HEADER, user));
    }
    send(req, configure).await
}

async fn send(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::call_service(&service, req.to_request()).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
