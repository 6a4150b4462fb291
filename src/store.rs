use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::platform_config::ConfigEntity;

/// Source of raw per-platform configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load_by_platform_code(&self, code: &str) -> Result<Option<ConfigEntity>, StoreError>;
}

/// Config store backed by the `platform_configs` table.
#[derive(Clone)]
pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn load_by_platform_code(&self, code: &str) -> Result<Option<ConfigEntity>, StoreError> {
        Ok(ConfigEntity::find_by_code(&self.pool, code).await?)
    }
}
