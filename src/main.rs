use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod analyzer;
mod api;
mod app;
mod extractor;
mod model;
mod rules;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).expect("Failed to initialize application state");

    let service_data = web::Data::from(state.analysis_service.clone());
    let config_data = web::Data::new(state.config.clone());

    tracing::info!("Starting listing-intel server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .app_data(config_data.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                api::ApiError::InvalidRequest(err.to_string()).into()
            }))
            .configure(api::analysis::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
