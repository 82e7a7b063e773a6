//! # Narrative Site Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use narrative_core::DomainError;
use narrative_infra::{Argon2PasswordService, JwtTokenService, SystemClock};

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;
mod templates;
mod views;

use config::{AdminAccount, AppConfig};
use observability::RequestIdMiddleware;
use state::{AppState, Stores};
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Narrative site server on {}:{}",
        config.host,
        config.port
    );

    let stores = Stores::connect(config.database.as_ref())
        .await
        .map_err(std::io::Error::other)?;
    let clock = Arc::new(SystemClock);
    let state = AppState::new(
        stores,
        Arc::new(JwtTokenService::from_env()),
        Arc::new(Argon2PasswordService::new()),
        clock,
        config.site.clone(),
    );

    if let Some(admin) = &config.admin {
        ensure_admin(&state, admin).await;
    }

    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Create the configured admin account unless it already exists.
async fn ensure_admin(state: &AppState, admin: &AdminAccount) {
    match state
        .accounts
        .register(&admin.username, &admin.password, state.clock.now())
        .await
    {
        Ok(user) => tracing::info!(username = %user.username, "Admin account created"),
        Err(DomainError::Duplicate(_)) => {
            tracing::debug!(username = %admin.username, "Admin account already exists")
        }
        Err(e) => tracing::error!("Failed to create admin account: {}", e),
    }
}
