mod backends;
mod config;
mod db;
mod delivery;
mod error;
mod models;
mod platform;
mod routes;
mod store;
#[cfg(test)]
mod testutil;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use serde::Serialize;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::backends::PlatformRegistry;
use crate::backends::agent::AgentBackend;
use crate::config::{Command, Config};
use crate::delivery::DeliveryService;
use crate::platform::Platform;
use crate::routes::AppState;
use crate::store::PgConfigStore;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(pool: PgPool) -> impl IntoResponse {
    let result: Result<(i32,), _> = sqlx::query_as("SELECT 1").fetch_one(&pool).await;
    match result {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready"),
    }
}

/// Register one agent-backed backend per known platform.
fn build_registry(config: &Config) -> anyhow::Result<PlatformRegistry> {
    let timeout = Duration::from_secs(config.agent_timeout);
    let mut builder = PlatformRegistry::builder();
    for platform in Platform::ALL {
        let backend = AgentBackend::new(platform, &config.agent_url, timeout)?;
        builder = builder.register(platform, Arc::new(backend));
    }
    Ok(builder.build())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("getjobs=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations complete");
    }

    let registry = build_registry(&config)?;
    let delivery = DeliveryService::new(registry, Arc::new(PgConfigStore::new(pool.clone())));

    match config.resolved_command() {
        Command::Serve { listen_addr } => {
            let readyz_pool = pool.clone();
            let app = Router::new()
                .route("/healthz", get(healthz))
                .route("/readyz", get(move || readyz(readyz_pool.clone())))
                .merge(routes::api::router(AppState { pool, delivery }))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive());

            let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
            tracing::info!("Listening on {listen_addr}");
            axum::serve(listener, app).await?;
        }
        Command::Deliver { platform } => {
            let parsed = Platform::from_code(&platform);
            if parsed.is_none() {
                tracing::warn!("Unknown platform code '{platform}'");
            }
            let result = delivery.execute_quick_delivery(parsed).await;
            print_json(&result)?;
        }
        Command::DeliverAll { concurrent } => {
            let outcome = if concurrent {
                delivery
                    .execute_all_platforms_quick_delivery_concurrent()
                    .await
            } else {
                delivery.execute_all_platforms_quick_delivery().await
            };
            print_json(&outcome)?;
        }
    }

    Ok(())
}
