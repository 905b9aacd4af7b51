//! # Quire API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quire API Server on {}:{} (blog path: /{})",
        config.host,
        config.port,
        config.blog.public_blog_path
    );

    let state = AppState::new(
        config.database.as_ref(),
        config.run_migrations,
        config.blog.clone(),
    )
    .await;

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(observability::request_id))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
