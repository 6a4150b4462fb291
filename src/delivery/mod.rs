//! One-click delivery: resolve a platform's backend and config, then run the
//! login → collect → filter → deliver pipeline and report what happened.

mod batch;
mod config_resolver;
mod pipeline;

use std::sync::Arc;

use chrono::Utc;

use crate::backends::PlatformRegistry;
use crate::models::delivery::{DeliveryResult, FailureKind, Tally};
use crate::platform::Platform;
use crate::store::ConfigStore;

use config_resolver::ConfigResolver;
use pipeline::Pipeline;

/// Entry point for single-platform and all-platform quick delivery.
///
/// Holds no per-run state, so one instance can serve any number of runs.
/// Cloning is cheap.
#[derive(Clone)]
pub struct DeliveryService {
    registry: Arc<PlatformRegistry>,
    resolver: ConfigResolver,
}

impl DeliveryService {
    pub fn new(registry: PlatformRegistry, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            registry: Arc::new(registry),
            resolver: ConfigResolver::new(store),
        }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Run quick delivery for one platform.
    ///
    /// Always returns a result; every failure is reported through it.
    pub async fn execute_quick_delivery(&self, platform: Option<Platform>) -> DeliveryResult {
        let Some(platform) = platform else {
            tracing::error!("Quick delivery requested without a platform");
            return DeliveryResult::rejected(
                None,
                FailureKind::InvalidArgument,
                "platform must not be empty".to_string(),
            );
        };
        let code = platform.code();

        tracing::info!(platform = code, "========== Starting {platform} quick delivery ==========");

        let Some(backend) = self.registry.resolve(platform) else {
            let message = format!("unsupported platform: {platform}");
            tracing::error!(platform = code, "{message}");
            return DeliveryResult::rejected(
                Some(platform),
                FailureKind::UnsupportedPlatform,
                message,
            );
        };

        let Some(config) = self.resolver.resolve(platform, backend.as_ref()).await else {
            let message = format!("no configuration found for platform: {platform}");
            tracing::warn!(platform = code, "{message}");
            return DeliveryResult::rejected(Some(platform), FailureKind::ConfigNotFound, message);
        };

        let pipeline = Pipeline {
            platform,
            backend: backend.as_ref(),
            config: &config,
        };
        let start = Utc::now();
        let mut tally = Tally::default();
        let terminal = pipeline.run(&mut tally).await;
        let result = DeliveryResult::finish(Some(platform), terminal, tally, start, Utc::now());

        tracing::info!(
            platform = code,
            success = result.success,
            scanned = result.total_scanned.unwrap_or(0),
            skipped = result.skipped_count.unwrap_or(0),
            delivered = result.success_count.unwrap_or(0),
            failed = result.failed_count.unwrap_or(0),
            "========== {platform} quick delivery finished in {} ==========",
            result.formatted_execution_time()
        );

        result
    }
}
