use axum::Json;
use axum::extract::{Path, State};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::platform_config::{ConfigEntity, UpdateConfig};
use crate::platform::Platform;

fn parse_platform(code: &str) -> Result<Platform, AppError> {
    Platform::from_code(code).ok_or_else(|| AppError::BadRequest(format!("Unknown platform '{code}'")))
}

pub async fn list(State(pool): State<PgPool>) -> Result<Json<Vec<ConfigEntity>>, AppError> {
    let configs = ConfigEntity::list(&pool).await?;
    Ok(Json(configs))
}

pub async fn get(
    State(pool): State<PgPool>,
    Path(code): Path<String>,
) -> Result<Json<ConfigEntity>, AppError> {
    let platform = parse_platform(&code)?;
    let config = ConfigEntity::get_by_code(&pool, platform.code()).await?;
    Ok(Json(config))
}

pub async fn update(
    State(pool): State<PgPool>,
    Path(code): Path<String>,
    Json(input): Json<UpdateConfig>,
) -> Result<Json<ConfigEntity>, AppError> {
    let platform = parse_platform(&code)?;
    if !input.config.is_object() {
        return Err(AppError::BadRequest("config must be a JSON object".to_string()));
    }
    let config = ConfigEntity::upsert(&pool, platform.code(), input).await?;
    tracing::info!(platform = platform.code(), "Updated {platform} config");
    Ok(Json(config))
}
