//! # SQLite Database methods
//!
//! "Low-level" SQLite interactions, kept as simple functions (rather than stateful structs) that
//! accept a `&mut SqliteConnection`. Callers can obtain a connection from a pool, or open a
//! transaction and pass `&mut *tx` when atomicity matters.
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod collaborators;
pub mod orders;
pub mod payment_events;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    apply_schema(&pool).await?;
    Ok(pool)
}

/// The engine owns its schema and applies it idempotently at connect time.
async fn apply_schema(pool: &SqlitePool) -> Result<(), SqlxError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id TEXT NOT NULL,
            items       TEXT NOT NULL,
            amount      INTEGER NOT NULL,
            address     TEXT NOT NULL,
            phone       TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'Pending',
            payment     BOOLEAN NOT NULL DEFAULT 0,
            payment_ref TEXT,
            driver_id   TEXT,
            created_at  TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at  TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payment_events (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id        INTEGER NOT NULL REFERENCES orders (id),
            payment_ref     TEXT NOT NULL,
            provider_status TEXT NOT NULL,
            old_status      TEXT NOT NULL,
            new_status      TEXT NOT NULL,
            created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id   TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'Customer'
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS carts (
            customer_id TEXT PRIMARY KEY,
            items       TEXT NOT NULL DEFAULT '{}'
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS drivers (
            id   TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
