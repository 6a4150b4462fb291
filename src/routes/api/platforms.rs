use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::delivery::DeliveryService;
use crate::platform::Platform;

#[derive(Debug, Serialize)]
pub struct PlatformInfo {
    pub code: &'static str,
    pub name: &'static str,
    /// Whether a backend is registered for this platform.
    pub registered: bool,
}

pub async fn list(State(delivery): State<DeliveryService>) -> Json<Vec<PlatformInfo>> {
    let platforms = Platform::ALL
        .into_iter()
        .map(|p| PlatformInfo {
            code: p.code(),
            name: p.display_name(),
            registered: delivery.registry().is_registered(p),
        })
        .collect();
    Json(platforms)
}
