mod order_flow;

pub use order_flow::{CheckoutConfig, CheckoutOutcome, OrderFlowApi, PlacedOrder, ReconcileOutcome, VerifyOutcome};
