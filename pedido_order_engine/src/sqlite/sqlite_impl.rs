//! `SqliteDatabase` is the concrete storage backend for the order engine. It implements the
//! [`OrderDatabase`] trait plus the collaborator store traits over a single connection pool.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{collaborators, new_pool, orders, payment_events};
use crate::{
    db_types::{NewOrder, Order, OrderStatus, PaymentEvent, Role, UserRecord},
    traits::{CartStore, DriverStore, OrderDatabase, OrderFlowError, UserStore},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, OrderFlowError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// In-memory instance for tests. Uses a single connection, since every pooled connection to
    /// `sqlite::memory:` would otherwise get its own private database.
    pub async fn new_in_memory() -> Result<Self, OrderFlowError> {
        Self::new_with_url("sqlite::memory:", 1).await
    }

    // Seeding helpers for the collaborator tables.
    pub async fn upsert_user(&self, user_id: &str, name: &str, role: Role) -> Result<(), OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        collaborators::upsert_user(user_id, name, role, &mut conn).await
    }

    pub async fn upsert_driver(&self, driver_id: &str, name: &str) -> Result<(), OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        collaborators::upsert_driver(driver_id, name, &mut conn).await
    }

    pub async fn set_cart(&self, customer_id: &str, items: &str) -> Result<(), OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        collaborators::set_cart(customer_id, items, &mut conn).await
    }

    pub async fn fetch_cart(&self, customer_id: &str) -> Result<Option<String>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(collaborators::fetch_cart(customer_id, &mut conn).await?)
    }
}

impl OrderDatabase for SqliteDatabase {
    async fn insert_order(&self, order: &NewOrder, phone: &str) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, phone, &mut conn).await
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order(id, &mut conn).await?)
    }

    async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_customer(customer_id, &mut conn).await?)
    }

    async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_all_orders(&mut conn).await?)
    }

    async fn set_payment_ref(&self, id: i64, payment_ref: &str) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_payment_ref(id, payment_ref, &mut conn).await
    }

    async fn apply_payment_update(
        &self,
        id: i64,
        status: OrderStatus,
        payment: bool,
        payment_ref: &str,
        provider_status: &str,
    ) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let old = orders::fetch_order(id, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        let updated = orders::update_payment_state(id, status, payment, payment_ref, &mut tx).await?;
        payment_events::insert_event(id, payment_ref, provider_status, old.status, status, &mut tx).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn update_status(&self, id: i64, status: OrderStatus, payment: bool) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_status(id, status, payment, &mut conn).await
    }

    async fn delete_order(&self, id: i64) -> Result<bool, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::delete_order(id, &mut conn).await
    }

    async fn set_driver(&self, id: i64, driver_id: &str) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_driver(id, driver_id, &mut conn).await
    }

    async fn active_orders_for_driver(&self, driver_id: &str) -> Result<i64, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        orders::active_orders_for_driver(driver_id, &mut conn).await
    }

    async fn fetch_payment_events(&self, order_id: i64) -> Result<Vec<PaymentEvent>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(payment_events::fetch_events_for_order(order_id, &mut conn).await?)
    }
}

impl UserStore for SqliteDatabase {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(collaborators::fetch_user(user_id, &mut conn).await?)
    }
}

impl CartStore for SqliteDatabase {
    async fn clear_cart(&self, customer_id: &str) -> Result<(), OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        collaborators::clear_cart(customer_id, &mut conn).await
    }
}

impl DriverStore for SqliteDatabase {
    async fn driver_exists(&self, driver_id: &str) -> Result<bool, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        collaborators::driver_exists(driver_id, &mut conn).await
    }

    async fn delete_driver(&self, driver_id: &str) -> Result<bool, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        collaborators::delete_driver(driver_id, &mut conn).await
    }
}
