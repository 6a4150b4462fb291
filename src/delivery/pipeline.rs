use std::fmt;

use crate::backends::RecruitmentBackend;
use crate::error::BackendError;
use crate::models::delivery::{FailureKind, Tally, Terminal};
use crate::models::platform_config::PlatformConfig;
use crate::platform::Platform;

pub const NO_JOBS_COLLECTED: &str = "no jobs collected";
pub const NO_DELIVERABLE_JOBS: &str = "no deliverable jobs after filtering";

/// The backend call a run was making when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Login,
    Collect,
    Filter,
    Deliver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Login => "login",
            Stage::Collect => "collect",
            Stage::Filter => "filter",
            Stage::Deliver => "deliver",
        })
    }
}

/// Why a run left the happy path before `Done`.
#[derive(Debug)]
enum Halt {
    LoginFailed,
    Fault(Stage, BackendError),
}

impl Halt {
    fn at(stage: Stage) -> impl FnOnce(BackendError) -> Halt {
        move |e| Halt::Fault(stage, e)
    }
}

/// One pass of login → collect → filter → deliver for a single platform.
pub(super) struct Pipeline<'a> {
    pub platform: Platform,
    pub backend: &'a dyn RecruitmentBackend,
    pub config: &'a PlatformConfig,
}

impl Pipeline<'_> {
    /// Drive the stages to a terminal state, recording counters in `tally`
    /// as each stage completes.
    pub async fn run(&self, tally: &mut Tally) -> Terminal {
        match self.advance(tally).await {
            Ok(remark) => Terminal::Done { remark },
            Err(Halt::LoginFailed) => {
                let message = format!("{} login failed, please log in first", self.platform);
                tracing::error!(platform = self.platform.code(), "{message}");
                Terminal::Failed {
                    kind: FailureKind::LoginFailed,
                    message,
                }
            }
            Err(Halt::Fault(stage, e)) => {
                tracing::error!(
                    platform = self.platform.code(),
                    %stage,
                    "Quick delivery for {} failed: {e}",
                    self.platform
                );
                Terminal::Failed {
                    kind: FailureKind::BackendFault,
                    message: format!("execution failed during {stage}: {e}"),
                }
            }
        }
    }

    async fn advance(&self, tally: &mut Tally) -> Result<String, Halt> {
        let platform = self.platform;
        let code = platform.code();

        // Init -> Authenticated
        tracing::info!(platform = code, "Step 1: checking {platform} login state");
        if !self.backend.login().await.map_err(Halt::at(Stage::Login))? {
            return Err(Halt::LoginFailed);
        }
        tracing::info!(platform = code, "Logged in to {platform}");

        // Authenticated -> Collected
        tracing::info!(platform = code, "Step 2: collecting {platform} jobs");
        let mut scanned = self
            .backend
            .collect_jobs()
            .await
            .map_err(Halt::at(Stage::Collect))?;
        if self.config.recommend_jobs {
            let recommended = self
                .backend
                .collect_recommend_jobs()
                .await
                .map_err(Halt::at(Stage::Collect))?;
            scanned.extend(recommended);
        }
        let total_scanned = scanned.len();
        tally.scanned = Some(total_scanned);
        tracing::info!(platform = code, total_scanned, "Collected {total_scanned} {platform} jobs");

        if scanned.is_empty() {
            tracing::warn!(platform = code, "No jobs collected, ending delivery");
            tally.survivors = Some(0);
            tally.delivered = Some(0);
            return Ok(NO_JOBS_COLLECTED.to_string());
        }

        // Collected -> Filtered
        tracing::info!(platform = code, "Step 3: filtering {platform} jobs");
        let survivors = self
            .backend
            .filter_jobs(scanned)
            .await
            .map_err(Halt::at(Stage::Filter))?;
        let filtered = survivors.len();
        if filtered > total_scanned {
            return Err(Halt::Fault(
                Stage::Filter,
                BackendError::Contract(format!(
                    "filter returned {filtered} jobs from {total_scanned} scanned"
                )),
            ));
        }
        tally.survivors = Some(filtered);
        tracing::info!(
            platform = code,
            filtered,
            skipped = total_scanned - filtered,
            "Filtered {platform} jobs"
        );

        if survivors.is_empty() {
            tracing::warn!(platform = code, "No deliverable jobs after filtering, ending delivery");
            tally.delivered = Some(0);
            return Ok(NO_DELIVERABLE_JOBS.to_string());
        }

        // Filtered -> Done
        tracing::info!(platform = code, "Step 4: delivering {filtered} {platform} jobs");
        let delivered = self
            .backend
            .deliver_jobs(survivors)
            .await
            .map_err(Halt::at(Stage::Deliver))?;
        if delivered > filtered {
            return Err(Halt::Fault(
                Stage::Deliver,
                BackendError::Contract(format!(
                    "deliver confirmed {delivered} of {filtered} submitted jobs"
                )),
            ));
        }
        tally.delivered = Some(delivered);
        tracing::info!(
            platform = code,
            delivered,
            failed = filtered - delivered,
            "Delivered {platform} jobs"
        );

        Ok(format!("delivered {delivered} jobs"))
    }
}
