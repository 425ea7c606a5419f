mod mercado;

pub use mercado::{DisabledGateway, MercadoGateway};
