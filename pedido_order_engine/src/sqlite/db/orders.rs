use log::{debug, trace};
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderStatus},
    traits::OrderFlowError,
};

pub async fn insert_order(
    order: &NewOrder,
    phone: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (customer_id, items, amount, address, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(&order.customer_id)
    .bind(Json(&order.items))
    .bind(order.amount.value())
    .bind(Json(&order.address))
    .bind(phone)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order #{} inserted for customer {}", order.id, order.customer_id);
    Ok(order)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// Resulting orders are ordered by `created_at` in ascending order.
pub async fn fetch_orders_for_customer(
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at ASC")
        .bind(customer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

pub async fn fetch_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders ORDER BY created_at ASC").fetch_all(conn).await?;
    trace!("Result of fetch_all_orders: {:?}", orders.len());
    Ok(orders)
}

pub async fn set_payment_ref(
    id: i64,
    payment_ref: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET payment_ref = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(payment_ref)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(OrderFlowError::OrderNotFound(id))
}

/// The single reconciliation write: status, payment flag and payment reference move together.
pub async fn update_payment_state(
    id: i64,
    status: OrderStatus,
    payment: bool,
    payment_ref: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = $1, payment = $2, payment_ref = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *
        "#,
    )
    .bind(status.to_string())
    .bind(payment)
    .bind(payment_ref)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(OrderFlowError::OrderNotFound(id))
}

pub async fn update_status(
    id: i64,
    status: OrderStatus,
    payment: bool,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderFlowError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET status = $1, payment = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3 RETURNING *",
    )
    .bind(status.to_string())
    .bind(payment)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(OrderFlowError::OrderNotFound(id))
}

pub async fn delete_order(id: i64, conn: &mut SqliteConnection) -> Result<bool, OrderFlowError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_driver(id: i64, driver_id: &str, conn: &mut SqliteConnection) -> Result<Order, OrderFlowError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET driver_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(driver_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(OrderFlowError::OrderNotFound(id))
}

/// Counts orders referencing the driver whose status still blocks driver deletion.
pub async fn active_orders_for_driver(driver_id: &str, conn: &mut SqliteConnection) -> Result<i64, OrderFlowError> {
    let statuses =
        OrderStatus::ACTIVE.iter().map(|s| format!("'{s}'")).collect::<Vec<_>>().join(",");
    let query = format!("SELECT COUNT(*) FROM orders WHERE driver_id = $1 AND status IN ({statuses})");
    let (count,): (i64,) = sqlx::query_as(&query).bind(driver_id).fetch_one(conn).await?;
    Ok(count)
}
