mod api;
mod config;
mod error;

mod data_objects;

pub use api::MercadoApi;
pub use config::MercadoConfig;
pub use data_objects::{
    BackUrls,
    PaymentRecord,
    Preference,
    PreferenceItem,
    PreferenceRequest,
    ProviderPaymentStatus,
};
pub use error::MercadoApiError;
