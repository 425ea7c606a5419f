//! The order status machine.
//!
//! Status is never assigned ad hoc: the admin status update, the client-side verify call and the
//! webhook reconciliation path all go through [`transition`], so illegal and backward moves are
//! rejected in one place. Payment-driven statuses carry a rank; a stale `pending` notification
//! arriving after an `approved` one can therefore never undo a paid order.

use thiserror::Error;

use crate::db_types::OrderStatus;

/// An event that may change an order's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    /// The provider reported the payment as approved.
    PaymentApproved,
    /// The provider reported the payment as rejected or cancelled.
    PaymentRejected,
    /// The provider re-affirmed that the payment is still pending or in process.
    PaymentPending,
    /// The customer returned from the checkout redirect asserting success.
    ClientConfirmed,
    /// An admin requested an explicit status.
    AdminSet(OrderStatus),
}

/// Outcome of a legal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Write the new status and payment flag.
    Apply { status: OrderStatus, payment: bool },
    /// The event re-affirms the current state. Nothing to write; safe to acknowledge.
    Unchanged,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("The transition from {from} to {to} is forbidden")]
    Forbidden { from: OrderStatus, to: OrderStatus },
    #[error("A {0:?} event cannot be applied to an order in status {1}")]
    Stale(OrderEvent, OrderStatus),
    #[error("The requested status change is a no-op")]
    NoOp,
}

/// Computes the effect of `event` on an order currently in `(current, payment)`.
pub fn transition(current: OrderStatus, payment: bool, event: &OrderEvent) -> Result<Transition, TransitionError> {
    use OrderStatus::*;
    match event {
        OrderEvent::PaymentApproved | OrderEvent::ClientConfirmed => match current {
            Pending => Ok(Transition::Apply { status: Paid, payment: true }),
            // Re-delivery of an approval the order already absorbed.
            Paid | Preparing | Ready | OutForDelivery | Delivered => Ok(Transition::Unchanged),
            Failed | Cancelled => Err(TransitionError::Stale(event.clone(), current)),
        },
        OrderEvent::PaymentRejected => match current {
            Pending => Ok(Transition::Apply { status: Failed, payment: false }),
            Failed => Ok(Transition::Unchanged),
            _ => Err(TransitionError::Stale(event.clone(), current)),
        },
        OrderEvent::PaymentPending => match current {
            Pending => Ok(Transition::Unchanged),
            _ => Err(TransitionError::Stale(event.clone(), current)),
        },
        OrderEvent::AdminSet(new) => admin_transition(current, payment, *new),
    }
}

/// The admin ladder: `Pending → Paid → Preparing → Ready → OutForDelivery → Delivered`, one step at a
/// time, plus cancellation from any non-terminal state. `Pending → Paid` is the manual-reconciliation
/// escape hatch and sets the payment flag.
fn admin_transition(current: OrderStatus, payment: bool, new: OrderStatus) -> Result<Transition, TransitionError> {
    use OrderStatus::*;
    if current == new {
        return Err(TransitionError::NoOp);
    }
    match (current, new) {
        (Pending, Paid) => Ok(Transition::Apply { status: Paid, payment: true }),
        (Paid, Preparing) | (Preparing, Ready) | (Ready, OutForDelivery) | (OutForDelivery, Delivered) => {
            Ok(Transition::Apply { status: new, payment })
        },
        (from, Cancelled) if !from.is_terminal() => Ok(Transition::Apply { status: Cancelled, payment }),
        // Covers terminal sources, backward moves and ladder skips alike.
        (from, to) => Err(TransitionError::Forbidden { from, to }),
    }
}
