use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backends::RecruitmentBackend;
use crate::error::BackendError;
use crate::models::job::JobPosting;
use crate::models::platform_config::{ConfigEntity, PlatformConfig};
use crate::platform::Platform;

const USER_AGENT: &str = concat!("getjobs/", env!("CARGO_PKG_VERSION"));

/// Backend that delegates every stage to an external browser-automation
/// agent speaking JSON over HTTP, one route prefix per platform.
///
/// The most recently converted [`PlatformConfig`] is forwarded with every
/// collect, filter and deliver request, so the agent searches with the stored
/// keywords, cities and delivery cap.
pub struct AgentBackend {
    platform: Platform,
    base_url: String,
    client: reqwest::Client,
    settings: RwLock<Option<PlatformConfig>>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    logged_in: bool,
}

#[derive(Debug, Deserialize)]
struct DeliverResponse {
    delivered: usize,
}

#[derive(Debug, Serialize)]
struct SettingsRequest {
    config: Option<PlatformConfig>,
}

#[derive(Debug, Serialize)]
struct JobsRequest<'a> {
    jobs: &'a [JobPosting],
    config: Option<PlatformConfig>,
}

impl AgentBackend {
    pub fn new(platform: Platform, base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            platform,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            settings: RwLock::new(None),
        })
    }

    fn settings(&self) -> Option<PlatformConfig> {
        self.settings.read().ok().and_then(|s| s.clone())
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/platforms/{}/{action}", self.base_url, self.platform.code())
    }

    async fn call<B, T>(&self, action: &str, body: Option<&B>) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(action);
        tracing::debug!(platform = self.platform.code(), %url, "Calling automation agent");

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl RecruitmentBackend for AgentBackend {
    async fn login(&self) -> Result<bool, BackendError> {
        let resp: LoginResponse = self.call::<(), _>("login", None).await?;
        Ok(resp.logged_in)
    }

    async fn collect_jobs(&self) -> Result<Vec<JobPosting>, BackendError> {
        let body = SettingsRequest {
            config: self.settings(),
        };
        self.call("collect", Some(&body)).await
    }

    async fn collect_recommend_jobs(&self) -> Result<Vec<JobPosting>, BackendError> {
        let body = SettingsRequest {
            config: self.settings(),
        };
        self.call("collect-recommend", Some(&body)).await
    }

    async fn filter_jobs(&self, jobs: Vec<JobPosting>) -> Result<Vec<JobPosting>, BackendError> {
        let body = JobsRequest {
            jobs: &jobs,
            config: self.settings(),
        };
        self.call("filter", Some(&body)).await
    }

    async fn deliver_jobs(&self, jobs: Vec<JobPosting>) -> Result<usize, BackendError> {
        let body = JobsRequest {
            jobs: &jobs,
            config: self.settings(),
        };
        let resp: DeliverResponse = self.call("deliver", Some(&body)).await?;
        Ok(resp.delivered)
    }

    fn convert_config(&self, entity: &ConfigEntity) -> Result<PlatformConfig, BackendError> {
        let config = PlatformConfig::from_entity(entity)?;
        if let Ok(mut settings) = self.settings.write() {
            *settings = Some(config.clone());
        }
        Ok(config)
    }
}
