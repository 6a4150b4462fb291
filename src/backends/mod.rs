// Platform backends: the automation units the delivery pipeline drives.

pub mod agent;
pub mod registry;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::job::JobPosting;
use crate::models::platform_config::{ConfigEntity, PlatformConfig};

pub use registry::PlatformRegistry;

/// Trait that every recruitment platform backend must implement.
///
/// Each call may drive a live browser session against the platform and take
/// minutes; the pipeline awaits them one after another and never cancels one.
#[async_trait]
pub trait RecruitmentBackend: Send + Sync {
    /// Ensure an authenticated session. `Ok(false)` means the user must log in.
    async fn login(&self) -> Result<bool, BackendError>;

    /// Collect postings from the configured searches.
    async fn collect_jobs(&self) -> Result<Vec<JobPosting>, BackendError>;

    /// Collect postings from the platform's recommendation feed.
    async fn collect_recommend_jobs(&self) -> Result<Vec<JobPosting>, BackendError>;

    /// Drop postings that should not be applied to. Survivors keep their
    /// relative order.
    async fn filter_jobs(&self, jobs: Vec<JobPosting>) -> Result<Vec<JobPosting>, BackendError>;

    /// Apply to every posting and return how many were confirmed.
    async fn deliver_jobs(&self, jobs: Vec<JobPosting>) -> Result<usize, BackendError>;

    /// Interpret the raw stored configuration for this platform.
    fn convert_config(&self, entity: &ConfigEntity) -> Result<PlatformConfig, BackendError>;
}
