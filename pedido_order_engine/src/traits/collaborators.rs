//! Contracts for the collaborators the order flow calls into. These are owned by other parts of the
//! platform; the order subsystem only consumes them.

use crate::{db_types::UserRecord, traits::OrderFlowError};

#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, OrderFlowError>;
}

#[allow(async_fn_in_trait)]
pub trait CartStore {
    /// Empties the customer's shopping cart. Called fire-and-forget after order placement; a failure
    /// here never rolls the order back.
    async fn clear_cart(&self, customer_id: &str) -> Result<(), OrderFlowError>;
}

#[allow(async_fn_in_trait)]
pub trait DriverStore {
    async fn driver_exists(&self, driver_id: &str) -> Result<bool, OrderFlowError>;

    /// Removes the driver record. Returns false if no such driver existed. The active-order guard
    /// lives in the order flow, not here.
    async fn delete_driver(&self, driver_id: &str) -> Result<bool, OrderFlowError>;
}
