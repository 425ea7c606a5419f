//! Collaborator tables (users, carts, drivers). The order subsystem only consumes these; the
//! helpers to create rows exist for wiring and tests.

use sqlx::SqliteConnection;

use crate::{
    db_types::{Role, UserRecord},
    traits::OrderFlowError,
};

pub async fn fetch_user(user_id: &str, conn: &mut SqliteConnection) -> Result<Option<UserRecord>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn upsert_user(
    user_id: &str,
    name: &str,
    role: Role,
    conn: &mut SqliteConnection,
) -> Result<(), OrderFlowError> {
    sqlx::query(
        r#"
            INSERT INTO users (id, name, role) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name, role = excluded.role
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(role.to_string())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn clear_cart(customer_id: &str, conn: &mut SqliteConnection) -> Result<(), OrderFlowError> {
    sqlx::query("UPDATE carts SET items = '{}' WHERE customer_id = $1").bind(customer_id).execute(conn).await?;
    Ok(())
}

pub async fn set_cart(customer_id: &str, items: &str, conn: &mut SqliteConnection) -> Result<(), OrderFlowError> {
    sqlx::query(
        r#"
            INSERT INTO carts (customer_id, items) VALUES ($1, $2)
            ON CONFLICT (customer_id) DO UPDATE SET items = excluded.items
        "#,
    )
    .bind(customer_id)
    .bind(items)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_cart(customer_id: &str, conn: &mut SqliteConnection) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT items FROM carts WHERE customer_id = $1").bind(customer_id).fetch_optional(conn).await?;
    Ok(row.map(|(items,)| items))
}

pub async fn driver_exists(driver_id: &str, conn: &mut SqliteConnection) -> Result<bool, OrderFlowError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT id FROM drivers WHERE id = $1").bind(driver_id).fetch_optional(conn).await?;
    Ok(row.is_some())
}

pub async fn upsert_driver(driver_id: &str, name: &str, conn: &mut SqliteConnection) -> Result<(), OrderFlowError> {
    sqlx::query(
        r#"
            INSERT INTO drivers (id, name) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name
        "#,
    )
    .bind(driver_id)
    .bind(name)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete_driver(driver_id: &str, conn: &mut SqliteConnection) -> Result<bool, OrderFlowError> {
    let result = sqlx::query("DELETE FROM drivers WHERE id = $1").bind(driver_id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
