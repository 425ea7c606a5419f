//! Identity checks for the order endpoints.
//!
//! The server sits behind the main pedido API gateway, which terminates sessions and forwards the
//! authenticated user id in the `x-user-id` header. This module resolves that header against the
//! user store and enforces the admin role where required.

use actix_web::HttpRequest;
use log::*;
use pedido_order_engine::{
    db_types::{Role, UserRecord},
    traits::UserStore,
};

use crate::errors::ServerError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolves the calling user from the forwarded identity header.
pub async fn identify<S: UserStore>(req: &HttpRequest, store: &S) -> Result<UserRecord, ServerError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ServerError::InsufficientPermissions("No user identity was provided.".to_string()))?;
    store
        .fetch_user(user_id)
        .await
        .map_err(|e| ServerError::BackendError(e.to_string()))?
        .ok_or_else(|| ServerError::InsufficientPermissions(format!("Unknown user {user_id}.")))
}

pub async fn require_admin<S: UserStore>(req: &HttpRequest, store: &S) -> Result<UserRecord, ServerError> {
    let user = identify(req, store).await?;
    if user.role != Role::Admin {
        debug!("💻️ User {} tried to access an admin endpoint without the Admin role", user.id);
        return Err(ServerError::InsufficientPermissions("This endpoint requires the Admin role.".to_string()));
    }
    Ok(user)
}
