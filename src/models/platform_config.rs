use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;

/// Raw configuration row as stored, keyed by platform code.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConfigEntity {
    pub platform_code: String,
    pub config: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfig {
    pub config: serde_json::Value,
}

/// Structured settings for one platform, produced by its backend from a
/// [`ConfigEntity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Run the secondary "recommended jobs" collection pass.
    #[serde(default, alias = "recommendJobs")]
    pub recommend_jobs: bool,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default, alias = "maxDeliveries")]
    pub max_deliveries: Option<u32>,
    /// Backend-specific keys this struct does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PlatformConfig {
    /// Interpret a stored JSON document. A `null` document reads as defaults.
    pub fn from_entity(entity: &ConfigEntity) -> Result<Self, serde_json::Error> {
        if entity.config.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(entity.config.clone())
    }
}

impl ConfigEntity {
    pub async fn list(pool: &PgPool) -> Result<Vec<ConfigEntity>, AppError> {
        let configs = sqlx::query_as::<_, ConfigEntity>(
            "SELECT * FROM platform_configs ORDER BY platform_code",
        )
        .fetch_all(pool)
        .await?;
        Ok(configs)
    }

    pub async fn find_by_code(
        pool: &PgPool,
        platform_code: &str,
    ) -> Result<Option<ConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, ConfigEntity>(
            "SELECT * FROM platform_configs WHERE platform_code = $1",
        )
        .bind(platform_code)
        .fetch_optional(pool)
        .await
    }

    pub async fn get_by_code(pool: &PgPool, platform_code: &str) -> Result<ConfigEntity, AppError> {
        Self::find_by_code(pool, platform_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No config stored for '{platform_code}'")))
    }

    pub async fn upsert(
        pool: &PgPool,
        platform_code: &str,
        input: UpdateConfig,
    ) -> Result<ConfigEntity, AppError> {
        let entity = sqlx::query_as::<_, ConfigEntity>(
            "INSERT INTO platform_configs (platform_code, config, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (platform_code)
             DO UPDATE SET config = EXCLUDED.config, updated_at = NOW()
             RETURNING *",
        )
        .bind(platform_code)
        .bind(input.config)
        .fetch_one(pool)
        .await?;
        Ok(entity)
    }
}
