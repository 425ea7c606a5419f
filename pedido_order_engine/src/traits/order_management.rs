use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderStatus, PaymentEvent},
    status::TransitionError,
    traits::GatewayError,
};

/// Storage contract for order records. All mutations are single-order; reconciliation writes the
/// status, payment flag and payment reference together with the audit row in one transaction.
#[allow(async_fn_in_trait)]
pub trait OrderDatabase {
    /// Persists a new order with status `Pending` and `payment = false`. `phone` is the already
    /// resolved contact number. Returns the stored record with its assigned id.
    async fn insert_order(&self, order: &NewOrder, phone: &str) -> Result<Order, OrderFlowError>;

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderFlowError>;

    /// Orders for one customer, oldest first.
    async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderFlowError>;

    /// All orders, oldest first.
    async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderFlowError>;

    /// Records the provider preference id issued for a freshly placed order.
    async fn set_payment_ref(&self, id: i64, payment_ref: &str) -> Result<Order, OrderFlowError>;

    /// Applies a reconciliation result: updates `{status, payment, payment_ref}` as one UPDATE and
    /// appends the corresponding [`PaymentEvent`] row, atomically. Re-applying the same update is an
    /// idempotent overwrite.
    async fn apply_payment_update(
        &self,
        id: i64,
        status: OrderStatus,
        payment: bool,
        payment_ref: &str,
        provider_status: &str,
    ) -> Result<Order, OrderFlowError>;

    /// Writes a validated status (and payment flag). Callers must have run the transition table.
    async fn update_status(&self, id: i64, status: OrderStatus, payment: bool) -> Result<Order, OrderFlowError>;

    /// Hard-deletes an order. Returns false if no such order existed. Only the abandoned-checkout
    /// rollback path uses this.
    async fn delete_order(&self, id: i64) -> Result<bool, OrderFlowError>;

    async fn set_driver(&self, id: i64, driver_id: &str) -> Result<Order, OrderFlowError>;

    /// Number of orders referencing the driver whose status is in [`OrderStatus::ACTIVE`].
    async fn active_orders_for_driver(&self, driver_id: &str) -> Result<i64, OrderFlowError>;

    /// Audit trail for one order, oldest first.
    async fn fetch_payment_events(&self, order_id: i64) -> Result<Vec<PaymentEvent>, OrderFlowError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("We have an internal database engine error: {0}")]
    DatabaseError(String),
    #[error("Invalid order: {0}")]
    Validation(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("The provider has no payment with id {0}")]
    PaymentNotFound(String),
    #[error("Payment {0} is not linked to any order")]
    UnlinkedPayment(String),
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    Transition(#[from] TransitionError),
    #[error("The requested driver {0} does not exist")]
    DriverNotFound(String),
    #[error("Driver {driver_id} still has {count} active orders")]
    DriverHasActiveOrders { driver_id: String, count: i64 },
    #[error("Order #{0} is in a terminal state and cannot be modified")]
    TerminalOrder(i64),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}
