use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Deferred side effects the game can request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Job {
    FirstSolverComment { post_id: String, username: String },
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Job::FirstSolverComment { .. } => "FIRST_SOLVER_COMMENT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJob {
    pub id: Uuid,
    pub job: Job,
    pub run_at: DateTime<Utc>,
}

impl ScheduledJob {
    pub fn new(job: Job, run_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job,
            run_at,
        }
    }

    pub fn after(job: Job, delay: Duration) -> Self {
        let delay = TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero());
        Self::new(job, Utc::now() + delay)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("job {job_id} rejected: {reason}")]
    Rejected { job_id: Uuid, reason: String },
}

/// Accepts jobs for later execution. Acceptance is the only confirmation;
/// callers never learn whether the job eventually ran.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn schedule(&self, job: ScheduledJob) -> Result<(), SchedulerError>;
}

#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, job: Job) -> anyhow::Result<()>;
}

/// Runs each job on its own tokio task once `run_at` has passed.
/// Jobs are held in memory only and are not retried.
pub struct TokioScheduler {
    runner: Arc<dyn JobRunner>,
}

impl TokioScheduler {
    pub fn new(runner: Arc<dyn JobRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn schedule(&self, scheduled: ScheduledJob) -> Result<(), SchedulerError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            SchedulerError::Rejected {
                job_id: scheduled.id,
                reason: e.to_string(),
            }
        })?;

        let delay = (scheduled.run_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let runner = self.runner.clone();

        debug!(
            "Scheduled job {} ({}) to run in {}s",
            scheduled.id,
            scheduled.job.name(),
            delay.as_secs()
        );

        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let name = scheduled.job.name();
            match runner.run(scheduled.job).await {
                Ok(()) => info!("Job {} ({}) completed", scheduled.id, name),
                Err(e) => warn!("Job {} ({}) failed: {:#}", scheduled.id, name, e),
            }
        });

        Ok(())
    }
}

/// Drops every job. For deployments without a content API.
#[derive(Debug, Default)]
pub struct NoopScheduler;

#[async_trait]
impl Scheduler for NoopScheduler {
    async fn schedule(&self, job: ScheduledJob) -> Result<(), SchedulerError> {
        debug!("Dropping job {} ({})", job.id, job.job.name());
        Ok(())
    }
}
