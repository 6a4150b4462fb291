use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::RecruitmentBackend;
use crate::platform::Platform;

/// Fixed mapping from platform to the backend that automates it.
///
/// Built once at startup; there is no way to add or remove a backend later.
#[derive(Clone, Default)]
pub struct PlatformRegistry {
    backends: HashMap<Platform, Arc<dyn RecruitmentBackend>>,
}

impl PlatformRegistry {
    pub fn builder() -> PlatformRegistryBuilder {
        PlatformRegistryBuilder::default()
    }

    pub fn resolve(&self, platform: Platform) -> Option<Arc<dyn RecruitmentBackend>> {
        self.backends.get(&platform).cloned()
    }

    pub fn is_registered(&self, platform: Platform) -> bool {
        self.backends.contains_key(&platform)
    }
}

#[derive(Default)]
pub struct PlatformRegistryBuilder {
    backends: HashMap<Platform, Arc<dyn RecruitmentBackend>>,
}

impl PlatformRegistryBuilder {
    /// Register `backend` for `platform`, replacing any earlier registration.
    pub fn register(mut self, platform: Platform, backend: Arc<dyn RecruitmentBackend>) -> Self {
        if self.backends.insert(platform, backend).is_some() {
            tracing::warn!(platform = platform.code(), "Backend registered twice, keeping the last");
        }
        self
    }

    pub fn build(self) -> PlatformRegistry {
        PlatformRegistry {
            backends: self.backends,
        }
    }
}
