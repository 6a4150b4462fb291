use tokio::task::{JoinError, JoinHandle};

use super::DeliveryService;
use crate::models::delivery::{BatchOutcome, DeliveryResult, FailureKind};
use crate::platform::Platform;

impl DeliveryService {
    /// Run quick delivery for every platform, one after another, in
    /// declaration order.
    ///
    /// A run that panics is recorded as a failure for its platform only.
    pub async fn execute_all_platforms_quick_delivery(&self) -> BatchOutcome {
        tracing::info!("========== Starting quick delivery for all platforms ==========");

        let mut results = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            let joined = self.spawn_run(platform).await;
            results.push((platform, settle(platform, joined)));
        }

        summarize(results)
    }

    /// Like [`execute_all_platforms_quick_delivery`](Self::execute_all_platforms_quick_delivery),
    /// but runs every platform at once.
    ///
    /// Each task owns exactly one slot; totals are summed once every slot
    /// has been joined.
    pub async fn execute_all_platforms_quick_delivery_concurrent(&self) -> BatchOutcome {
        tracing::info!("========== Starting concurrent quick delivery for all platforms ==========");

        let handles: Vec<(Platform, JoinHandle<DeliveryResult>)> = Platform::ALL
            .into_iter()
            .map(|platform| (platform, self.spawn_run(platform)))
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (platform, handle) in handles {
            results.push((platform, settle(platform, handle.await)));
        }

        summarize(results)
    }

    fn spawn_run(&self, platform: Platform) -> JoinHandle<DeliveryResult> {
        let service = self.clone();
        tokio::spawn(async move { service.execute_quick_delivery(Some(platform)).await })
    }
}

/// Turn a joined task into a result, converting an escaped panic into a
/// failure for that platform.
fn settle(platform: Platform, joined: Result<DeliveryResult, JoinError>) -> DeliveryResult {
    match joined {
        Ok(result) => result,
        Err(e) => {
            let reason = if e.is_panic() {
                let payload = e.into_panic();
                payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "backend panicked".to_string())
            } else {
                "task cancelled".to_string()
            };
            tracing::error!(platform = platform.code(), "Quick delivery for {platform} aborted: {reason}");
            DeliveryResult::rejected(
                Some(platform),
                FailureKind::BackendFault,
                format!("execution failed: {reason}"),
            )
        }
    }
}

fn summarize(results: Vec<(Platform, DeliveryResult)>) -> BatchOutcome {
    let outcome = BatchOutcome::from_results(results);
    tracing::info!(
        total_success = outcome.total_success,
        total_failed = outcome.total_failed,
        total_skipped = outcome.total_skipped,
        "========== Quick delivery for all platforms finished =========="
    );
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::backends::PlatformRegistry;
    use crate::testutil::{MockBackend, MockConfigStore, jobs};

    /// Boss delivers 2 of 3, zhilian panics in login, job51 has no backend,
    /// liepin fails to log in.
    fn mixed_service() -> DeliveryService {
        let registry = PlatformRegistry::builder()
            .register(
                Platform::BossZhipin,
                Arc::new(
                    MockBackend::new()
                        .search_jobs(jobs(&["A", "B", "C", "D"]))
                        .keep_ids(&["A", "B", "C"])
                        .delivered(2),
                ),
            )
            .register(
                Platform::ZhilianZhaopin,
                Arc::new(MockBackend::new().panic_on_login("session store poisoned")),
            )
            .register(
                Platform::Liepin,
                Arc::new(MockBackend::new().login_result(false)),
            )
            .build();

        let store = Platform::ALL
            .into_iter()
            .fold(MockConfigStore::new(), |store, p| store.with_config(p, json!({})));

        DeliveryService::new(registry, Arc::new(store))
    }

    fn assert_mixed_outcome(outcome: &BatchOutcome) {
        let order: Vec<Platform> = outcome.results.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, Platform::ALL.to_vec());

        let boss = outcome.get(Platform::BossZhipin).unwrap();
        assert!(boss.success);
        assert_eq!(boss.success_count, Some(2));

        let zhilian = outcome.get(Platform::ZhilianZhaopin).unwrap();
        assert!(!zhilian.success);
        assert_eq!(zhilian.failure, Some(FailureKind::BackendFault));
        assert_eq!(
            zhilian.error_message.as_deref(),
            Some("execution failed: session store poisoned")
        );

        let job51 = outcome.get(Platform::Job51).unwrap();
        assert_eq!(job51.failure, Some(FailureKind::UnsupportedPlatform));

        let liepin = outcome.get(Platform::Liepin).unwrap();
        assert_eq!(liepin.failure, Some(FailureKind::LoginFailed));

        assert_eq!(outcome.total_success, 2);
        assert_eq!(outcome.total_failed, 1);
        assert_eq!(outcome.total_skipped, 1);
    }

    #[tokio::test]
    async fn sequential_batch_isolates_faults_and_keeps_order() {
        let outcome = mixed_service().execute_all_platforms_quick_delivery().await;
        assert_mixed_outcome(&outcome);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_batch_matches_sequential_semantics() {
        let outcome = mixed_service()
            .execute_all_platforms_quick_delivery_concurrent()
            .await;
        assert_mixed_outcome(&outcome);
    }

    #[tokio::test]
    async fn totals_equal_sum_of_platform_counts() {
        let registry = Platform::ALL
            .into_iter()
            .fold(PlatformRegistry::builder(), |builder, p| {
                builder.register(
                    p,
                    Arc::new(
                        MockBackend::new()
                            .search_jobs(jobs(&["A", "B", "C"]))
                            .keep_ids(&["A", "C"])
                            .delivered(1),
                    ),
                )
            })
            .build();
        let store = Platform::ALL
            .into_iter()
            .fold(MockConfigStore::new(), |store, p| store.with_config(p, json!({})));
        let service = DeliveryService::new(registry, Arc::new(store));

        let outcome = service.execute_all_platforms_quick_delivery().await;

        assert_eq!(outcome.results.len(), Platform::ALL.len());
        let sum = |f: fn(&DeliveryResult) -> Option<usize>| -> usize {
            outcome.results.iter().map(|(_, r)| f(r).unwrap_or(0)).sum()
        };
        assert_eq!(outcome.total_success, sum(|r| r.success_count));
        assert_eq!(outcome.total_failed, sum(|r| r.failed_count));
        assert_eq!(outcome.total_skipped, sum(|r| r.skipped_count));
        assert_eq!(outcome.total_success, 4);
        assert_eq!(outcome.total_skipped, 4);
    }

    #[tokio::test]
    async fn empty_registry_still_reports_every_platform() {
        let service = DeliveryService::new(
            PlatformRegistry::builder().build(),
            Arc::new(MockConfigStore::new()),
        );

        let outcome = service.execute_all_platforms_quick_delivery().await;

        assert_eq!(outcome.results.len(), Platform::ALL.len());
        assert!(outcome.results.iter().all(|(_, r)| !r.success));
        assert_eq!(outcome.total_success, 0);
    }
}
