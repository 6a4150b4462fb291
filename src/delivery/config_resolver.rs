use std::sync::Arc;

use crate::backends::RecruitmentBackend;
use crate::models::platform_config::PlatformConfig;
use crate::platform::Platform;
use crate::store::ConfigStore;

/// Produces a platform's structured config by loading the stored entity and
/// letting the platform's backend interpret it.
///
/// Never fails: a missing row, a store error or a conversion error all
/// resolve to `None` after being logged.
#[derive(Clone)]
pub struct ConfigResolver {
    store: Arc<dyn ConfigStore>,
}

impl ConfigResolver {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(
        &self,
        platform: Platform,
        backend: &dyn RecruitmentBackend,
    ) -> Option<PlatformConfig> {
        let entity = match self.store.load_by_platform_code(platform.code()).await {
            Ok(Some(entity)) => entity,
            Ok(None) => {
                tracing::warn!(platform = platform.code(), "No stored config for {platform}");
                return None;
            }
            Err(e) => {
                tracing::error!(platform = platform.code(), "Failed to load config for {platform}: {e}");
                return None;
            }
        };

        match backend.convert_config(&entity) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::error!(platform = platform.code(), "Failed to convert config for {platform}: {e}");
                None
            }
        }
    }
}
