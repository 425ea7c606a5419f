//! # Pedido order server
//!
//! The HTTP surface for the order lifecycle and payment reconciliation subsystem. It is
//! responsible for:
//! * accepting order placements from the storefront and handing customers off to the payment
//!   provider's hosted checkout,
//! * receiving payment webhooks and reconciling them against local order state,
//! * the admin endpoints for status changes and driver assignment.
//!
//! ## Configuration
//! The server is configured via `PEDIDO_*` environment variables. See [config] for the full list.
//!
//! ## Routes
//! All order routes live under `/api/order`; see [routes] for the handlers. A `/health` route
//! answers 200 for liveness probes.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
