use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::platform::Platform;

/// Why a pipeline run did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidArgument,
    UnsupportedPlatform,
    ConfigNotFound,
    LoginFailed,
    BackendFault,
}

/// Counters accumulated while a run moves through its stages.
///
/// A field stays `None` until the stage that produces it has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub scanned: Option<usize>,
    pub survivors: Option<usize>,
    pub delivered: Option<usize>,
}

/// The terminal state a run reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Done { remark: String },
    Failed { kind: FailureKind, message: String },
}

/// Outcome of one quick-delivery run for one platform.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResult {
    pub platform: Option<Platform>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub execution_time_millis: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_scanned: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl DeliveryResult {
    /// Assemble the record for a run that reached `terminal`.
    ///
    /// Derived counts are computed from the tally with saturating arithmetic,
    /// so callers must have validated `delivered <= survivors <= scanned`.
    /// `end` earlier than `start` is clamped to `start`.
    pub fn finish(
        platform: Option<Platform>,
        terminal: Terminal,
        tally: Tally,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let end = end.max(start);
        let execution_time_millis = (end - start).num_milliseconds().max(0) as u64;

        let skipped_count = match (tally.scanned, tally.survivors) {
            (Some(scanned), Some(survivors)) => Some(scanned.saturating_sub(survivors)),
            _ => None,
        };
        let failed_count = match (tally.survivors, tally.delivered) {
            (Some(survivors), Some(delivered)) => Some(survivors.saturating_sub(delivered)),
            _ => None,
        };

        let (success, failure, error_message, remark) = match terminal {
            Terminal::Done { remark } => (true, None, None, Some(remark)),
            Terminal::Failed { kind, message } => (false, Some(kind), Some(message), None),
        };

        Self {
            platform,
            start_time: start,
            end_time: end,
            execution_time_millis,
            success,
            total_scanned: tally.scanned,
            skipped_count,
            success_count: tally.delivered,
            failed_count,
            failure,
            error_message,
            remark,
        }
    }

    /// A failed record for a run that never got past its preconditions.
    pub fn rejected(platform: Option<Platform>, kind: FailureKind, message: String) -> Self {
        let now = Utc::now();
        Self::finish(
            platform,
            Terminal::Failed { kind, message },
            Tally::default(),
            now,
            now,
        )
    }

    /// Execution time rendered for humans: `850ms`, `12.3s`, `2m 5s`.
    pub fn formatted_execution_time(&self) -> String {
        let millis = self.execution_time_millis;
        if millis < 1_000 {
            format!("{millis}ms")
        } else if millis < 60_000 {
            format!("{:.1}s", millis as f64 / 1_000.0)
        } else {
            let secs = millis / 1_000;
            format!("{}m {}s", secs / 60, secs % 60)
        }
    }
}

/// Results of a run across every platform, in platform declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    #[serde(serialize_with = "serialize_by_platform_code")]
    pub results: Vec<(Platform, DeliveryResult)>,
    pub total_success: usize,
    pub total_failed: usize,
    pub total_skipped: usize,
}

impl BatchOutcome {
    /// Sum the per-platform counts. Counts a run never reached add zero.
    pub fn from_results(results: Vec<(Platform, DeliveryResult)>) -> Self {
        let (total_success, total_failed, total_skipped) =
            results
                .iter()
                .fold((0, 0, 0), |(success, failed, skipped), (_, result)| {
                    (
                        success + result.success_count.unwrap_or(0),
                        failed + result.failed_count.unwrap_or(0),
                        skipped + result.skipped_count.unwrap_or(0),
                    )
                });

        Self {
            results,
            total_success,
            total_failed,
            total_skipped,
        }
    }

    pub fn get(&self, platform: Platform) -> Option<&DeliveryResult> {
        self.results
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, result)| result)
    }
}

/// Serialize as a JSON object keyed by platform code, keeping entry order.
fn serialize_by_platform_code<S: Serializer>(
    results: &[(Platform, DeliveryResult)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(results.iter().map(|(platform, result)| (platform.code(), result)))
}
