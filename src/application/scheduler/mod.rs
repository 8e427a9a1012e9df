//! Overlap-free job scheduler.
//!
//! Jobs are registered by name. A periodic [`Scheduler::tick`] dispatches every
//! due, idle job onto its own task; a job is never dispatched again until its
//! previous execution has settled. One-shot jobs are dropped once they settle.

mod job;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use job::{Cadence, JobOutcome, JobSnapshot, Task};
use job::{Job, JobState};

/// Named-job scheduler.
#[derive(Default)]
pub struct Scheduler {
    jobs: Mutex<HashMap<String, Job>>,
    outcomes: Option<mpsc::UnboundedSender<JobOutcome>>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler that also reports every settled execution on a channel.
    #[must_use]
    pub fn with_outcomes() -> (Self, mpsc::UnboundedReceiver<JobOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            jobs: Mutex::new(HashMap::new()),
            outcomes: Some(tx),
        };
        (scheduler, rx)
    }

    /// Register a job. Returns false, leaving the existing job untouched, if
    /// the name is taken.
    pub fn add_job(&self, name: impl Into<String>, cadence: Cadence, task: Arc<dyn Task>) -> bool {
        let name = name.into();
        let mut jobs = self.jobs.lock();
        if jobs.contains_key(&name) {
            warn!(job = %name, "Job already registered, ignoring");
            return false;
        }
        info!(job = %name, %cadence, "Job registered");
        jobs.insert(
            name.clone(),
            Job {
                name,
                cadence,
                task,
                state: Arc::new(JobState::default()),
            },
        );
        true
    }

    /// Unregister a job. An in-flight execution is left to finish.
    pub fn remove_job(&self, name: &str) -> bool {
        self.jobs.lock().remove(name).is_some()
    }

    /// Dispatch every due job. Returns the names dispatched.
    pub fn tick(&self) -> Vec<String> {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) against an explicit clock reading.
    pub fn tick_at(&self, now: Instant) -> Vec<String> {
        let mut jobs = self.jobs.lock();

        jobs.retain(|name, job| {
            let spent = job.is_spent();
            if spent {
                debug!(job = %name, "One-shot job settled, removing");
            }
            !spent
        });

        let mut dispatched = Vec::new();
        for job in jobs.values() {
            if job.is_due(now) && job.state.start() {
                self.dispatch(job);
                dispatched.push(job.name.clone());
            }
        }
        dispatched.sort();
        dispatched
    }

    fn dispatch(&self, job: &Job) {
        let name = job.name.clone();
        let task = Arc::clone(&job.task);
        let state = Arc::clone(&job.state);
        let outcomes = self.outcomes.clone();

        debug!(job = %name, "Dispatching job");
        tokio::spawn(async move {
            let started = Instant::now();
            let result = tokio::spawn(async move { task.run().await }).await;
            let elapsed = started.elapsed();

            let outcome = match result {
                Ok(Ok(summary)) => {
                    debug!(job = %name, ?elapsed, %summary, "Job completed");
                    JobOutcome::Completed { job: name, summary, elapsed }
                }
                Ok(Err(e)) => {
                    warn!(job = %name, ?elapsed, error = %e, "Job failed");
                    JobOutcome::Failed { job: name, message: e.to_string(), elapsed }
                }
                Err(e) => {
                    let message = panic_message(e);
                    warn!(job = %name, ?elapsed, %message, "Job aborted");
                    JobOutcome::Failed { job: name, message, elapsed }
                }
            };

            let error = match &outcome {
                JobOutcome::Completed { .. } => None,
                JobOutcome::Failed { message, .. } => Some(message.clone()),
            };
            state.finish(Instant::now(), error);

            if let Some(tx) = outcomes {
                let _ = tx.send(outcome);
            }
        });
    }

    /// Snapshot of one job.
    #[must_use]
    pub fn job(&self, name: &str) -> Option<JobSnapshot> {
        self.jobs.lock().get(name).map(Job::snapshot)
    }

    /// Snapshots of every job, ordered by name.
    #[must_use]
    pub fn jobs(&self) -> Vec<JobSnapshot> {
        let mut all: Vec<_> = self.jobs.lock().values().map(Job::snapshot).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

fn panic_message(err: tokio::task::JoinError) -> String {
    if err.is_cancelled() {
        return "task cancelled".to_string();
    }
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
