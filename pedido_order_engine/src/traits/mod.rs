//! Behaviour contracts for the order engine.
//!
//! Backends (currently SQLite) implement [`OrderDatabase`] and the collaborator stores; payment
//! providers implement [`PaymentGateway`]. The `OrderFlowApi` is generic over both, which is what
//! makes the endpoint tests possible without a database or a network.

mod collaborators;
mod order_management;
mod payment_gateway;

pub use collaborators::{CartStore, DriverStore, UserStore};
pub use order_management::{OrderDatabase, OrderFlowError};
pub use payment_gateway::{
    CheckoutItem,
    CheckoutRequest,
    CheckoutSession,
    GatewayError,
    PaymentDetails,
    PaymentGateway,
    ProviderStatus,
};
