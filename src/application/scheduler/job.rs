//! Job records and the work they run.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ConfigError, Result};

/// Unit of recurring work.
///
/// Returns a short human-readable summary on success.
#[async_trait]
pub trait Task: Send + Sync + 'static {
    async fn run(&self) -> Result<String>;
}

/// When a job becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Due when this much time has passed since the last settlement.
    Every(Duration),
    /// Due once, then removed.
    Once,
}

impl Cadence {
    /// Decode the configuration form: `-1` means once, positive values are
    /// milliseconds between runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero or other negative values.
    #[allow(clippy::result_large_err)]
    pub fn from_millis(field: &'static str, millis: i64) -> std::result::Result<Self, ConfigError> {
        match millis {
            -1 => Ok(Self::Once),
            ms if ms > 0 => Ok(Self::Every(Duration::from_millis(ms.unsigned_abs()))),
            _ => Err(ConfigError::InvalidValue {
                field,
                reason: "must be -1 (run once) or greater than 0".to_string(),
            }),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Every(d) => write!(f, "every {}ms", d.as_millis()),
            Self::Once => f.write_str("once"),
        }
    }
}

/// Mutable run state shared between the registry and the in-flight execution.
#[derive(Debug, Default)]
pub(super) struct JobState {
    running: AtomicBool,
    last_executed: Mutex<Option<Instant>>,
    runs: AtomicU64,
    failures: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl JobState {
    pub(super) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(super) fn last_executed(&self) -> Option<Instant> {
        *self.last_executed.lock()
    }

    /// Claim the job. Returns false if it was already running.
    pub(super) fn start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Record settlement; the timestamp is written before the flag clears so
    /// an idle job always carries its latest settlement time.
    pub(super) fn finish(&self, at: Instant, error: Option<String>) {
        *self.last_executed.lock() = Some(at);
        self.runs.fetch_add(1, Ordering::Relaxed);
        if error.is_some() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        *self.last_error.lock() = error;
        self.running.store(false, Ordering::Release);
    }
}

/// A registered job.
pub(super) struct Job {
    pub(super) name: String,
    pub(super) cadence: Cadence,
    pub(super) task: Arc<dyn Task>,
    pub(super) state: Arc<JobState>,
}

impl Job {
    pub(super) fn is_due(&self, now: Instant) -> bool {
        if self.state.is_running() {
            return false;
        }
        match (self.cadence, self.state.last_executed()) {
            (_, None) => true,
            (Cadence::Once, Some(_)) => false,
            (Cadence::Every(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
        }
    }

    /// One-shot job that has run and settled.
    pub(super) fn is_spent(&self) -> bool {
        self.cadence == Cadence::Once
            && !self.state.is_running()
            && self.state.last_executed().is_some()
    }

    pub(super) fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            name: self.name.clone(),
            cadence: self.cadence,
            is_running: self.state.is_running(),
            last_executed_at: self.state.last_executed(),
            runs: self.state.runs.load(Ordering::Relaxed),
            failures: self.state.failures.load(Ordering::Relaxed),
            last_error: self.state.last_error.lock().clone(),
        }
    }
}

/// Point-in-time view of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub name: String,
    pub cadence: Cadence,
    pub is_running: bool,
    pub last_executed_at: Option<Instant>,
    /// Settled executions, successful or not.
    pub runs: u64,
    pub failures: u64,
    /// Message of the most recent execution if it failed.
    pub last_error: Option<String>,
}

/// Terminal status reported by an execution.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed {
        job: String,
        summary: String,
        elapsed: Duration,
    },
    Failed {
        job: String,
        message: String,
        elapsed: Duration,
    },
}

impl JobOutcome {
    #[must_use]
    pub fn job(&self) -> &str {
        match self {
            Self::Completed { job, .. } | Self::Failed { job, .. } => job,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}
