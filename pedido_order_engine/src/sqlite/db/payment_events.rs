use sqlx::SqliteConnection;

use crate::{
    db_types::{OrderStatus, PaymentEvent},
    traits::OrderFlowError,
};

pub async fn insert_event(
    order_id: i64,
    payment_ref: &str,
    provider_status: &str,
    old_status: OrderStatus,
    new_status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<PaymentEvent, OrderFlowError> {
    let event = sqlx::query_as(
        r#"
            INSERT INTO payment_events (order_id, payment_ref, provider_status, old_status, new_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(payment_ref)
    .bind(provider_status)
    .bind(old_status.to_string())
    .bind(new_status.to_string())
    .fetch_one(conn)
    .await?;
    Ok(event)
}

pub async fn fetch_events_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentEvent>, sqlx::Error> {
    let events = sqlx::query_as("SELECT * FROM payment_events WHERE order_id = $1 ORDER BY created_at ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(events)
}
