pub mod api;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::delivery::DeliveryService;

/// Shared state for every HTTP handler.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: PgPool,
    pub delivery: DeliveryService,
}
