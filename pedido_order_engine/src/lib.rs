//! Pedido Order Engine
//!
//! Core logic for the order lifecycle and payment-reconciliation subsystem of the pedido
//! food-delivery backend. The crate is split into:
//! 1. Database types and access ([`db_types`], the `sqlite` backend). Callers should not reach for
//!    the database directly; use the public API and let a backend implement the [`traits`].
//! 2. The public API ([`OrderFlowApi`]): order placement, webhook reconciliation, client-side
//!    verification, admin status changes and driver assignment. It is generic over the storage
//!    backend and the payment gateway, so both can be replaced with test doubles.
//! 3. The status machine ([`status`]): one transition table shared by every mutation site.

mod api;
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
pub mod status;
pub mod traits;

pub use api::{CheckoutConfig, CheckoutOutcome, OrderFlowApi, PlacedOrder, ReconcileOutcome, VerifyOutcome};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::OrderFlowError;
