use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::delivery::DeliveryService;
use crate::models::delivery::{BatchOutcome, DeliveryResult};
use crate::platform::Platform;

#[derive(Debug, Default, Deserialize)]
pub struct BatchParams {
    #[serde(default)]
    pub concurrent: bool,
}

/// POST /api/v1/delivery/{code}
///
/// Runs quick delivery for one platform and blocks until it finishes. An
/// unknown code is reported in the result body, not as an HTTP error.
pub async fn run_one(
    State(delivery): State<DeliveryService>,
    Path(code): Path<String>,
) -> Json<DeliveryResult> {
    let result = delivery
        .execute_quick_delivery(Platform::from_code(&code))
        .await;
    Json(result)
}

/// POST /api/v1/delivery
///
/// Runs quick delivery for every platform.
pub async fn run_all(
    State(delivery): State<DeliveryService>,
    Query(params): Query<BatchParams>,
) -> Json<BatchOutcome> {
    let outcome = if params.concurrent {
        delivery
            .execute_all_platforms_quick_delivery_concurrent()
            .await
    } else {
        delivery.execute_all_platforms_quick_delivery().await
    };
    Json(outcome)
}
