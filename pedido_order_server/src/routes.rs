//! Request handler definitions.
//!
//! Handlers are generic over the storage backend and the payment gateway so that endpoint tests can
//! swap in mocks. Registration happens in [`crate::server`] with the concrete types filled in.
//!
//! Handlers must never block the worker thread: anything non-trivial (database access, provider
//! calls) goes through the async [`OrderFlowApi`].

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use pedido_order_engine::{
    db_types::{OrderStatus, Role},
    traits::{CartStore, DriverStore, OrderDatabase, PaymentGateway, UserStore},
    CheckoutOutcome,
    OrderFlowApi,
    OrderFlowError,
    ReconcileOutcome,
    VerifyOutcome,
};

use crate::{
    auth::{identify, require_admin},
    data_objects::{
        AssignDriverRequest,
        DeleteDriverRequest,
        JsonResponse,
        PlaceOrderRequest,
        PlaceOrderResponse,
        StatusUpdateRequest,
        UserOrdersRequest,
        VerifyRequest,
        WebhookEvent,
    },
    errors::ServerError,
};

// ----------------------------------------------   Health  -----------------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Placement  --------------------------------------------------------

/// `POST /api/order/place`
///
/// Persists a new order and asks the payment provider for a hosted checkout URL. Customers may only
/// place orders for themselves. The order is stored even when the gateway is disabled; the response
/// then carries no payment URL and flags the failure.
pub async fn place_order<B, G>(
    req: HttpRequest,
    body: web::Json<PlaceOrderRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    trace!("💻️ Received place order request");
    let caller = identify(&req, api.db()).await?;
    if caller.id != body.user_id && caller.role != Role::Admin {
        return Err(ServerError::InsufficientPermissions("You may only place orders for yourself.".to_string()));
    }
    let new_order = body.into_inner().into_new_order().map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    let placed = api.place_order(new_order).await?;
    let response = match placed.checkout {
        CheckoutOutcome::Redirect(url) => PlaceOrderResponse {
            success: true,
            order_id: placed.order.id,
            payment_url: Some(url),
            message: "Order placed. Redirect the customer to complete payment.".to_string(),
        },
        CheckoutOutcome::GatewayDisabled => PlaceOrderResponse {
            success: false,
            order_id: placed.order.id,
            payment_url: None,
            message: "Order placed, but the payment system is not configured.".to_string(),
        },
    };
    Ok(HttpResponse::Ok().json(response))
}

// ----------------------------------------------   Verify  -----------------------------------------------------------

/// `POST /api/order/verify`
///
/// The client-side callback after the checkout redirect. Only the customer who placed the order
/// (or an admin) may verify it. `success` must be exactly `"true"` or `"false"`; anything else is a
/// bad request. A `"false"` deletes the abandoned order.
pub async fn verify_order<B, G>(
    req: HttpRequest,
    body: web::Json<VerifyRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    let caller = identify(&req, api.db()).await?;
    let success = body
        .success_flag()
        .ok_or_else(|| ServerError::InvalidRequestBody("success must be 'true' or 'false'".to_string()))?;
    let order = api.fetch_order(body.order_id).await?;
    if order.customer_id != caller.id && caller.role != Role::Admin {
        return Err(ServerError::InsufficientPermissions("You may only verify your own orders.".to_string()));
    }
    match api.verify_order(body.order_id, success).await? {
        VerifyOutcome::Confirmed(order) => {
            Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order #{} confirmed as paid", order.id))))
        },
        VerifyOutcome::Deleted => {
            Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order #{} deleted", body.order_id))))
        },
    }
}

// ----------------------------------------------   Webhook  ----------------------------------------------------------

/// `POST /api/order/webhook`
///
/// The authoritative reconciliation path, driven by provider notifications. The provider only looks
/// at the status code, so acknowledgements are plain text rather than the JSON envelope the
/// customer-facing endpoints use. The contract with the provider's at-least-once retry policy:
/// * non-payment events are acknowledged with 200 and ignored,
/// * a payment event without a payment id is a 400,
/// * stale, duplicate and unknown-status events are acknowledged with 200 without mutating state,
/// * a provider outage answers 500 so the notification is redelivered.
pub async fn order_webhook<B, G>(
    body: web::Json<WebhookEvent>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    if !body.is_payment() {
        debug!("💻️ Ignoring webhook event of type {:?}", body.event_type);
        return Ok(HttpResponse::Ok().body("Event ignored\n"));
    }
    let payment_id = body
        .payment_id()
        .ok_or_else(|| ServerError::InvalidRequestBody("Payment notification carries no payment id".to_string()))?;
    debug!("💻️ Payment notification received for payment {payment_id} (action: {:?})", body.action);
    match api.handle_payment_update(&payment_id).await {
        Ok(ReconcileOutcome::Updated(order)) => {
            Ok(HttpResponse::Ok().body(format!("Order #{} is now {}\n", order.id, order.status)))
        },
        Ok(ReconcileOutcome::Unchanged(order)) => {
            Ok(HttpResponse::Ok().body(format!("Order #{} unchanged\n", order.id)))
        },
        Ok(ReconcileOutcome::Stale(order)) => {
            Ok(HttpResponse::Ok().body(format!("Stale event for order #{} dropped\n", order.id)))
        },
        Ok(ReconcileOutcome::UnknownStatus { order, status }) => {
            Ok(HttpResponse::Ok().body(format!("Status '{status}' not handled; order #{} untouched\n", order.id)))
        },
        Ok(ReconcileOutcome::GatewayDisabled) => {
            Ok(HttpResponse::Ok().body("Gateway disabled; notification ignored\n"))
        },
        // A 5xx answer makes the provider redeliver, so only genuinely retryable failures go here.
        Err(OrderFlowError::Gateway(e)) => Err(ServerError::BackendError(e.to_string())),
        Err(e) => Err(e.into()),
    }
}

// ----------------------------------------------   Admin  ------------------------------------------------------------

/// `POST /api/order/status`. Admin-only. The new status must be a legal single step from the
/// current one.
pub async fn update_status<B, G>(
    req: HttpRequest,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    let admin = require_admin(&req, api.db()).await?;
    let status = body
        .status
        .parse::<OrderStatus>()
        .map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    let order = api.update_status(body.order_id, status).await?;
    info!("💻️ Admin {} set order #{} to {}", admin.id, order.id, order.status);
    Ok(HttpResponse::Ok().json(order))
}

/// `POST /api/order/assign-driver`. Admin-only.
pub async fn assign_driver<B, G>(
    req: HttpRequest,
    body: web::Json<AssignDriverRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    require_admin(&req, api.db()).await?;
    let order = api.assign_driver(body.order_id, &body.driver_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// `POST /api/order/delete-driver`. Admin-only. Refused with 409 while the driver still has active
/// orders.
pub async fn delete_driver<B, G>(
    req: HttpRequest,
    body: web::Json<DeleteDriverRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    require_admin(&req, api.db()).await?;
    api.delete_driver(&body.driver_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Driver {} deleted", body.driver_id))))
}

/// `GET /api/order/list`. Admin-only. All orders, with customer names backfilled where known.
pub async fn list_orders<B, G>(
    req: HttpRequest,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    require_admin(&req, api.db()).await?;
    let orders = api.all_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// `GET /api/order/events/{order_id}`. Admin-only audit trail of reconciliation writes.
pub async fn payment_events<B, G>(
    req: HttpRequest,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    require_admin(&req, api.db()).await?;
    let order_id = path.into_inner();
    let events = api.payment_events(order_id).await?;
    Ok(HttpResponse::Ok().json(events))
}

// ----------------------------------------------   Customer  ---------------------------------------------------------

/// `POST /api/order/userorders`. Customers may only list their own orders; admins may list anyone's.
pub async fn user_orders<B, G>(
    req: HttpRequest,
    body: web::Json<UserOrdersRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderDatabase + UserStore + CartStore + DriverStore,
    G: PaymentGateway,
{
    let user = identify(&req, api.db()).await?;
    if user.id != body.user_id && user.role != Role::Admin {
        return Err(ServerError::InsufficientPermissions("You may only list your own orders.".to_string()));
    }
    let orders = api.orders_for_customer(&body.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}
