pub mod configs;
pub mod delivery;
pub mod platforms;

use axum::Router;
use axum::routing::{get, post};

use crate::routes::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Platforms
        .route("/platforms", get(platforms::list))
        // Configs
        .route("/configs", get(configs::list))
        .route("/configs/{code}", get(configs::get).put(configs::update))
        // Delivery
        .route("/delivery", post(delivery::run_all))
        .route("/delivery/{code}", post(delivery::run_one))
        .with_state(state);

    Router::new().nest("/api/v1", api)
}
