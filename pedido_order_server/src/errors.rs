use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use pedido_order_engine::OrderFlowError;
use thiserror::Error;

use crate::data_objects::JsonResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The request conflicts with the current order state. {0}")]
    Conflict(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The payment provider is unavailable. {0}")]
    GatewayUnavailable(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Failures wear the same `{success, message}` envelope as the happy paths, so storefront code
    // can branch on `success` alone.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(JsonResponse::failure(self.to_string()))
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::Validation(_) => Self::InvalidRequestBody(e.to_string()),
            OrderFlowError::OrderNotFound(_) |
            OrderFlowError::PaymentNotFound(_) |
            OrderFlowError::UnlinkedPayment(_) |
            OrderFlowError::DriverNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::Transition(_) |
            OrderFlowError::TerminalOrder(_) |
            OrderFlowError::DriverHasActiveOrders { .. } => Self::Conflict(e.to_string()),
            OrderFlowError::Gateway(_) => Self::GatewayUnavailable(e.to_string()),
            OrderFlowError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}
