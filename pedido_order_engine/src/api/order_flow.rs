use std::fmt::Debug;

use log::*;
use pedido_common::Money;

use crate::{
    db_types::{NewOrder, Order, OrderStatus, PaymentEvent},
    status::{transition, OrderEvent, Transition, TransitionError},
    traits::{
        CartStore,
        CheckoutItem,
        CheckoutRequest,
        DriverStore,
        GatewayError,
        OrderDatabase,
        OrderFlowError,
        PaymentGateway,
        ProviderStatus,
        UserStore,
    },
};

/// Checkout wiring that is configuration, not behaviour: where the provider should send the customer
/// back to, where webhooks land, and the fixed delivery surcharge appended to every preference.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Public base URL of this deployment, e.g. `https://pedido.example.com`.
    pub public_url: String,
    pub delivery_fee: Money,
    pub delivery_label: String,
}

impl CheckoutConfig {
    pub fn checkout_request(&self, order: &Order) -> CheckoutRequest {
        let mut items = order
            .items
            .iter()
            .map(|i| CheckoutItem { title: i.name.clone(), unit_price: i.price, quantity: i.quantity })
            .collect::<Vec<_>>();
        items.push(CheckoutItem { title: self.delivery_label.clone(), unit_price: self.delivery_fee, quantity: 1 });
        let id = order.id;
        CheckoutRequest {
            order_id: id,
            items,
            success_url: format!("{}/checkout/result?success=true&orderId={id}", self.public_url),
            failure_url: format!("{}/checkout/result?success=false&orderId={id}", self.public_url),
            pending_url: format!("{}/checkout/result?success=pending&orderId={id}", self.public_url),
            notification_url: format!("{}/api/order/webhook", self.public_url),
        }
    }
}

/// Result of placing an order: the persisted record plus what the customer should do next.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub checkout: CheckoutOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Send the customer to the provider's hosted checkout.
    Redirect(String),
    /// No gateway credentials are configured. The order is persisted and waiting; there is no
    /// payment path until an operator supplies credentials.
    GatewayDisabled,
}

#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    /// The order was confirmed (or already was) as paid.
    Confirmed(Order),
    /// The abandoned order was deleted as a compensating rollback.
    Deleted,
}

/// What a webhook delivery did to local state. Every variant is acknowledged with 200 upstream;
/// retryable failures travel as errors instead.
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    Updated(Order),
    /// Idempotent re-delivery; state already matched.
    Unchanged(Order),
    /// The event conflicts with a state the order has already moved past. Logged and dropped.
    Stale(Order),
    /// The provider reported a status outside our vocabulary. No mutation.
    UnknownStatus { order: Order, status: String },
    /// Cannot verify anything without credentials; acknowledged without action.
    GatewayDisabled,
}

/// `OrderFlowApi` is the primary API for the order lifecycle: placement with payment-preference
/// creation, webhook-driven reconciliation, client-side verification, admin status changes and
/// driver assignment.
pub struct OrderFlowApi<B, G> {
    db: B,
    gateway: G,
    config: CheckoutConfig,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, gateway: G, config: CheckoutConfig) -> Self {
        Self { db, gateway, config }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    /// Places a new order.
    ///
    /// The address must be structurally complete, otherwise nothing is persisted. The order is
    /// stored as `Pending/unpaid`, the customer's cart is cleared best-effort, and a payment
    /// preference is requested from the gateway. The caller-supplied total is persisted verbatim;
    /// it is deliberately not recomputed from the line items.
    ///
    /// A gateway failure after persistence leaves the order in place and is reported as an error;
    /// an unconfigured gateway is reported as [`CheckoutOutcome::GatewayDisabled`].
    pub async fn place_order(&self, new_order: NewOrder) -> Result<PlacedOrder, OrderFlowError> {
        let missing = new_order.address.missing_fields();
        if !missing.is_empty() {
            return Err(OrderFlowError::Validation(format!(
                "address is missing required fields: {}",
                missing.join(", ")
            )));
        }
        let phone = new_order.resolved_phone();
        let order = self.db.insert_order(&new_order, &phone).await?;
        debug!("🛒️ Order #{} created for customer {} ({})", order.id, order.customer_id, order.amount);
        if let Err(e) = self.db.clear_cart(&order.customer_id).await {
            warn!("🛒️ Could not clear cart for customer {}. The order stands. {e}", order.customer_id);
        }
        let request = self.config.checkout_request(&order);
        match self.gateway.create_preference(&request).await {
            Ok(session) => {
                let order = self.db.set_payment_ref(order.id, &session.preference_id).await?;
                info!("🛒️ Order #{} awaiting payment via preference {}", order.id, session.preference_id);
                Ok(PlacedOrder { order, checkout: CheckoutOutcome::Redirect(session.redirect_url) })
            },
            Err(GatewayError::Unconfigured) => {
                warn!("🛒️ Order #{} placed but the payment gateway is not configured.", order.id);
                Ok(PlacedOrder { order, checkout: CheckoutOutcome::GatewayDisabled })
            },
            Err(e) => {
                // The order is not rolled back. It stays Pending with no payment path, and the
                // error is surfaced so support tooling can find it.
                error!("🛒️ Preference creation failed for order #{}. {e}", order.id);
                Err(OrderFlowError::Gateway(e))
            },
        }
    }

    /// The synchronous verify path, called when the customer lands back from the checkout redirect.
    ///
    /// A success assertion confirms the order as paid through the regular transition table, so it
    /// can never resurrect a failed or cancelled order. A failure assertion deletes the
    /// just-created order outright as a compensating rollback for an abandoned checkout.
    pub async fn verify_order(&self, order_id: i64, success: bool) -> Result<VerifyOutcome, OrderFlowError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        if !success {
            info!("🔁️ Order #{order_id} verification failed client-side. Deleting the abandoned order.");
            self.db.delete_order(order_id).await?;
            return Ok(VerifyOutcome::Deleted);
        }
        match transition(order.status, order.payment, &OrderEvent::ClientConfirmed)? {
            Transition::Apply { status, payment } => {
                let updated = self.db.update_status(order.id, status, payment).await?;
                info!("🔁️ Order #{order_id} confirmed as paid by client verification.");
                Ok(VerifyOutcome::Confirmed(updated))
            },
            Transition::Unchanged => Ok(VerifyOutcome::Confirmed(order)),
        }
    }

    /// The authoritative reconciliation path, driven by provider webhooks.
    ///
    /// The webhook body is only trusted for the payment id; status and order linkage are re-fetched
    /// from the provider. Retryable failures (provider unreachable, timeouts) surface as
    /// [`OrderFlowError::Gateway`] so the HTTP layer can answer 500 and lean on the provider's
    /// at-least-once retry policy. Everything else resolves to a [`ReconcileOutcome`] that is
    /// acknowledged with 200.
    pub async fn handle_payment_update(&self, payment_id: &str) -> Result<ReconcileOutcome, OrderFlowError> {
        let details = match self.gateway.get_payment(payment_id).await {
            Ok(details) => details,
            Err(GatewayError::Unconfigured) => {
                warn!("🔁️ Payment notification for {payment_id} received, but no gateway is configured. Ignoring.");
                return Ok(ReconcileOutcome::GatewayDisabled);
            },
            Err(GatewayError::PaymentNotFound(id)) => return Err(OrderFlowError::PaymentNotFound(id)),
            Err(e) => {
                warn!("🔁️ Could not fetch payment {payment_id} from the provider. Requesting redelivery. {e}");
                return Err(OrderFlowError::Gateway(e));
            },
        };
        let order_id = details
            .external_reference
            .as_deref()
            .and_then(|r| r.parse::<i64>().ok())
            .ok_or_else(|| OrderFlowError::UnlinkedPayment(payment_id.to_string()))?;
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        let event = match &details.status {
            ProviderStatus::Approved => OrderEvent::PaymentApproved,
            ProviderStatus::Rejected | ProviderStatus::Cancelled => OrderEvent::PaymentRejected,
            ProviderStatus::Pending | ProviderStatus::InProcess => OrderEvent::PaymentPending,
            ProviderStatus::Other(s) => {
                warn!("🔁️ Payment {payment_id} reports unknown status '{s}'. Leaving order #{order_id} untouched.");
                return Ok(ReconcileOutcome::UnknownStatus { order, status: s.clone() });
            },
        };
        let provider_status = details.status.to_string();
        match transition(order.status, order.payment, &event) {
            Ok(Transition::Apply { status, payment }) => {
                let updated =
                    self.db.apply_payment_update(order.id, status, payment, payment_id, &provider_status).await?;
                info!("🔁️ Order #{order_id} reconciled to {status} (payment={payment}) via payment {payment_id}");
                Ok(ReconcileOutcome::Updated(updated))
            },
            Ok(Transition::Unchanged) => {
                debug!("🔁️ Payment {payment_id} re-affirmed order #{order_id} in status {}", order.status);
                Ok(ReconcileOutcome::Unchanged(order))
            },
            Err(e @ TransitionError::Stale(..)) => {
                warn!("🔁️ Dropping stale payment event for order #{order_id}: {e}");
                Ok(ReconcileOutcome::Stale(order))
            },
            Err(e) => Err(e.into()),
        }
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<Order, OrderFlowError> {
        self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))
    }

    pub async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderFlowError> {
        self.db.fetch_orders_for_customer(customer_id).await
    }

    /// All orders, with a best-effort backfill of missing customer names from the user store.
    /// Lookup failures are swallowed; the field simply stays absent in the response.
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderFlowError> {
        let mut orders = self.db.fetch_all_orders().await?;
        for order in orders.iter_mut().filter(|o| o.address.customer_name.is_none()) {
            match self.db.fetch_user(&order.customer_id).await {
                Ok(Some(user)) => order.address.customer_name = Some(user.name),
                Ok(None) => {},
                Err(e) => debug!("🛒️ Could not backfill customer name for order #{}. {e}", order.id),
            }
        }
        Ok(orders)
    }

    /// Admin status change, validated against the transition table. Setting `Delivered` straight
    /// from `Pending` is rejected here rather than silently applied.
    pub async fn update_status(&self, order_id: i64, new_status: OrderStatus) -> Result<Order, OrderFlowError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        match transition(order.status, order.payment, &OrderEvent::AdminSet(new_status))? {
            Transition::Apply { status, payment } => {
                let updated = self.db.update_status(order.id, status, payment).await?;
                info!("🛒️ Order #{order_id} moved {} → {status} by admin", order.status);
                Ok(updated)
            },
            Transition::Unchanged => Ok(order),
        }
    }

    /// Attaches a driver to an active order. Terminal orders cannot be assigned.
    pub async fn assign_driver(&self, order_id: i64, driver_id: &str) -> Result<Order, OrderFlowError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        if order.status.is_terminal() {
            return Err(OrderFlowError::TerminalOrder(order_id));
        }
        if !self.db.driver_exists(driver_id).await? {
            return Err(OrderFlowError::DriverNotFound(driver_id.to_string()));
        }
        let updated = self.db.set_driver(order_id, driver_id).await?;
        info!("🛒️ Driver {driver_id} assigned to order #{order_id}");
        Ok(updated)
    }

    /// Deletes a driver, refusing while any order referencing them is still active.
    pub async fn delete_driver(&self, driver_id: &str) -> Result<(), OrderFlowError> {
        let count = self.db.active_orders_for_driver(driver_id).await?;
        if count > 0 {
            return Err(OrderFlowError::DriverHasActiveOrders { driver_id: driver_id.to_string(), count });
        }
        if self.db.delete_driver(driver_id).await? {
            info!("🛒️ Driver {driver_id} deleted");
            Ok(())
        } else {
            Err(OrderFlowError::DriverNotFound(driver_id.to_string()))
        }
    }

    pub async fn payment_events(&self, order_id: i64) -> Result<Vec<PaymentEvent>, OrderFlowError> {
        self.db.fetch_payment_events(order_id).await
    }
}
