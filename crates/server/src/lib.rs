//! Backend Server
//!
//! Combines the invite validation API and WebSocket session hosting
//! into a single actix-web server.
//!
//! ## Submodules
//!
//! - [`handlers`] — HTTP and WebSocket upgrade endpoints
//! - [`bridge`] — Per-connection pump between socket and parlor

mod bridge;
mod handlers;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use wb_database::Store;
use wb_gameroom::Parlor;

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let store = Store::connect().await;
    let parlor = web::Data::new(Parlor::new(store));
    parlor.reload().await;
    log::info!("starting backend server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(parlor.clone())
            .route("/api/health", web::get().to(handlers::health))
            .route("/api/game/{code}", web::get().to(handlers::invite))
            .route("/ws", web::get().to(handlers::connect))
    })
    .workers(6)
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
