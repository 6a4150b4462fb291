//! Test utilities: hand-written mocks for backends and the config store.
//!
//! Mocks share their state through `Arc<Mutex<_>>`, so a clone handed to the
//! service can be inspected afterwards.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::backends::RecruitmentBackend;
use crate::error::{BackendError, StoreError};
use crate::models::job::JobPosting;
use crate::models::platform_config::{ConfigEntity, PlatformConfig};
use crate::platform::Platform;
use crate::store::ConfigStore;

pub fn job(id: &str) -> JobPosting {
    JobPosting::new(id, format!("Job {id}"))
}

pub fn jobs(ids: &[&str]) -> Vec<JobPosting> {
    ids.iter().map(|id| job(id)).collect()
}

fn ids(jobs: &[JobPosting]) -> Vec<String> {
    jobs.iter().map(|j| j.id.clone()).collect()
}

// ---------------------------------------------------------------------------
// MockBackend
// ---------------------------------------------------------------------------

enum FilterScript {
    KeepAll,
    KeepIds(Vec<String>),
    Return(Vec<JobPosting>),
    Fail(String),
}

struct Script {
    login: Result<bool, String>,
    panic_on_login: Option<String>,
    search: Result<Vec<JobPosting>, String>,
    recommend: Result<Vec<JobPosting>, String>,
    filter: FilterScript,
    deliver: Option<Result<usize, String>>,
    convert_error: Option<String>,
}

#[derive(Default)]
struct Recorded {
    calls: Vec<&'static str>,
    filtered: Vec<String>,
    delivered: Vec<String>,
}

/// Scriptable backend. Defaults: logs in, collects nothing, keeps every job,
/// confirms every delivery.
#[derive(Clone)]
pub struct MockBackend {
    script: Arc<Mutex<Script>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                login: Ok(true),
                panic_on_login: None,
                search: Ok(vec![]),
                recommend: Ok(vec![]),
                filter: FilterScript::KeepAll,
                deliver: None,
                convert_error: None,
            })),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    fn edit(self, f: impl FnOnce(&mut Script)) -> Self {
        f(&mut self.script.lock().unwrap());
        self
    }

    pub fn login_result(self, logged_in: bool) -> Self {
        self.edit(|s| s.login = Ok(logged_in))
    }

    pub fn login_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|s| s.login = Err(message))
    }

    pub fn panic_on_login(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|s| s.panic_on_login = Some(message))
    }

    pub fn search_jobs(self, jobs: Vec<JobPosting>) -> Self {
        self.edit(|s| s.search = Ok(jobs))
    }

    pub fn search_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|s| s.search = Err(message))
    }

    pub fn recommend_jobs(self, jobs: Vec<JobPosting>) -> Self {
        self.edit(|s| s.recommend = Ok(jobs))
    }

    pub fn recommend_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|s| s.recommend = Err(message))
    }

    pub fn keep_ids(self, keep: &[&str]) -> Self {
        let keep = keep.iter().map(|id| id.to_string()).collect();
        self.edit(|s| s.filter = FilterScript::KeepIds(keep))
    }

    pub fn filter_returns(self, jobs: Vec<JobPosting>) -> Self {
        self.edit(|s| s.filter = FilterScript::Return(jobs))
    }

    pub fn filter_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|s| s.filter = FilterScript::Fail(message))
    }

    pub fn delivered(self, count: usize) -> Self {
        self.edit(|s| s.deliver = Some(Ok(count)))
    }

    pub fn deliver_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|s| s.deliver = Some(Err(message)))
    }

    pub fn convert_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.edit(|s| s.convert_error = Some(message))
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.recorded.lock().unwrap().calls.clone()
    }

    /// Ids of the jobs handed to `filter_jobs`, in order.
    pub fn filtered_ids(&self) -> Vec<String> {
        self.recorded.lock().unwrap().filtered.clone()
    }

    /// Ids of the jobs handed to `deliver_jobs`, in order.
    pub fn delivered_ids(&self) -> Vec<String> {
        self.recorded.lock().unwrap().delivered.clone()
    }

    fn record(&self, call: &'static str) {
        self.recorded.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RecruitmentBackend for MockBackend {
    async fn login(&self) -> Result<bool, BackendError> {
        self.record("login");
        let (login, panic_message) = {
            let script = self.script.lock().unwrap();
            (script.login.clone(), script.panic_on_login.clone())
        };
        if let Some(message) = panic_message {
            panic!("{message}");
        }
        login.map_err(BackendError::Other)
    }

    async fn collect_jobs(&self) -> Result<Vec<JobPosting>, BackendError> {
        self.record("collect_jobs");
        self.script.lock().unwrap().search.clone().map_err(BackendError::Other)
    }

    async fn collect_recommend_jobs(&self) -> Result<Vec<JobPosting>, BackendError> {
        self.record("collect_recommend_jobs");
        self.script.lock().unwrap().recommend.clone().map_err(BackendError::Other)
    }

    async fn filter_jobs(&self, jobs: Vec<JobPosting>) -> Result<Vec<JobPosting>, BackendError> {
        self.record("filter_jobs");
        self.recorded.lock().unwrap().filtered = ids(&jobs);
        match &self.script.lock().unwrap().filter {
            FilterScript::KeepAll => Ok(jobs),
            FilterScript::KeepIds(keep) => Ok(jobs.into_iter().filter(|j| keep.contains(&j.id)).collect()),
            FilterScript::Return(out) => Ok(out.clone()),
            FilterScript::Fail(message) => Err(BackendError::Other(message.clone())),
        }
    }

    async fn deliver_jobs(&self, jobs: Vec<JobPosting>) -> Result<usize, BackendError> {
        self.record("deliver_jobs");
        self.recorded.lock().unwrap().delivered = ids(&jobs);
        match self.script.lock().unwrap().deliver.clone() {
            None => Ok(jobs.len()),
            Some(result) => result.map_err(BackendError::Other),
        }
    }

    fn convert_config(&self, entity: &ConfigEntity) -> Result<PlatformConfig, BackendError> {
        self.record("convert_config");
        if let Some(message) = self.script.lock().unwrap().convert_error.clone() {
            return Err(BackendError::Other(message));
        }
        Ok(PlatformConfig::from_entity(entity)?)
    }
}

// ---------------------------------------------------------------------------
// MockConfigStore
// ---------------------------------------------------------------------------

/// In-memory config store keyed by platform code.
#[derive(Clone, Default)]
pub struct MockConfigStore {
    entities: Arc<Mutex<HashMap<String, ConfigEntity>>>,
    error: Option<String>,
    loaded: Arc<Mutex<Vec<String>>>,
}

impl MockConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every load fails.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_config(self, platform: Platform, config: serde_json::Value) -> Self {
        self.entities.lock().unwrap().insert(
            platform.code().to_string(),
            ConfigEntity {
                platform_code: platform.code().to_string(),
                config,
                updated_at: Utc::now(),
            },
        );
        self
    }

    pub fn loaded_codes(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigStore for MockConfigStore {
    async fn load_by_platform_code(&self, code: &str) -> Result<Option<ConfigEntity>, StoreError> {
        self.loaded.lock().unwrap().push(code.to_string());
        if let Some(message) = &self.error {
            return Err(StoreError::Unavailable(message.clone()));
        }
        Ok(self.entities.lock().unwrap().get(code).cloned())
    }
}
