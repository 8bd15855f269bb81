mod config;
mod model;
mod pipeline;
mod share;
mod web;

use std::sync::Arc;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};

use config::Config;
use model::OpenAiOracle;
use pipeline::{Orchestrator, PipelineConfig};
use share::InMemoryShareStore;
use web::cors::cors_layer;
use web::routes;

// App state structure
pub struct AppState {
    pub orchestrator: Orchestrator,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting code generation assistant");

    // A missing credential stops us before anything is bound
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let oracle = Arc::new(OpenAiOracle::new(&config));
    let store = Arc::new(InMemoryShareStore::new());
    let orchestrator = Orchestrator::new(oracle, store, PipelineConfig::from(&config))
        .context("failed to load prompt templates")?;

    // Create app state
    let app_state = Data::new(AppState { orchestrator });

    let cors_origins = config.cors_allowed_origins.clone();

    info!("Listening on {}:{}", config.host, config.port);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .wrap(cors_layer(cors_origins.as_deref()))
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("server terminated with an error")
}
