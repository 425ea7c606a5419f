mod money;

pub mod op;
mod secret;

pub use money::{Money, MoneyConversionError, CURRENCY_CODE};
pub use secret::Secret;
