use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use pedido_order_engine::{traits::PaymentGateway, OrderFlowApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{DisabledGateway, MercadoGateway},
    routes,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = match config.mercado.clone() {
        Some(mercado) => {
            let gateway = MercadoGateway::new(mercado).map_err(|e| ServerError::InitializeError(e.to_string()))?;
            info!("🚀️ Payment gateway is live.");
            create_server_instance(config, db, gateway)?
        },
        None => {
            warn!("🚀️ Starting with the payment gateway disabled. Orders can be placed, but not paid.");
            create_server_instance(config, db, DisabledGateway)?
        },
    };
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<G>(config: ServerConfig, db: SqliteDatabase, gateway: G) -> Result<Server, ServerError>
where G: PaymentGateway + Clone + Send + 'static {
    let host = config.host.clone();
    let port = config.port;
    let checkout = config.checkout_config();
    let srv = HttpServer::new(move || {
        let api = OrderFlowApi::new(db.clone(), gateway.clone(), checkout.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("pedido::access_log"))
            .app_data(web::Data::new(api))
            .service(routes::health)
            .service(
                web::scope("/api/order")
                    .route("/place", web::post().to(routes::place_order::<SqliteDatabase, G>))
                    .route("/verify", web::post().to(routes::verify_order::<SqliteDatabase, G>))
                    .route("/webhook", web::post().to(routes::order_webhook::<SqliteDatabase, G>))
                    .route("/status", web::post().to(routes::update_status::<SqliteDatabase, G>))
                    .route("/assign-driver", web::post().to(routes::assign_driver::<SqliteDatabase, G>))
                    .route("/delete-driver", web::post().to(routes::delete_driver::<SqliteDatabase, G>))
                    .route("/list", web::get().to(routes::list_orders::<SqliteDatabase, G>))
                    .route("/userorders", web::post().to(routes::user_orders::<SqliteDatabase, G>))
                    .route("/events/{order_id}", web::get().to(routes::payment_events::<SqliteDatabase, G>)),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
