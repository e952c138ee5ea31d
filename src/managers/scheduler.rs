//! In-process cron scheduler
//!
//! Fires registered actions on independent recurring cadences, evaluated
//! in one fixed timezone, for the lifetime of the process. A tick whose
//! action is still running from a previous tick is skipped rather than run
//! concurrently with itself; registering two actions with one shared lock
//! additionally serializes them against each other.

use crate::utils::cron;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// A unit of scheduled work
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self) -> Result<()>;
}

/// Run an action behind its run-lock
///
/// Returns `false` when a previous run still holds the lock and this tick
/// is skipped. A failed run is logged and swallowed here so the timer
/// keeps ticking regardless of any single run's outcome.
pub async fn run_guarded(lock: &Mutex<()>, action: &dyn Action) -> bool {
    let _guard = match lock.try_lock() {
        Ok(guard) => guard,
        Err(_) => {
            warn!(
                "Previous '{}' run still in progress, skipping this tick",
                action.name()
            );
            return false;
        }
    };

    info!("Running scheduled action: {}", action.name());
    if let Err(e) = action.execute().await {
        error!("Scheduled action '{}' failed: {:#}", action.name(), e);
    }
    true
}

struct Job {
    expression: String,
    lock: Arc<Mutex<()>>,
    action: Arc<dyn Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Triggers registered actions on their cron cadences
pub struct Scheduler {
    timezone: Tz,
    run_on_startup: bool,
    jobs: Vec<Job>,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(timezone: Tz, run_on_startup: bool) -> Self {
        Self {
            timezone,
            run_on_startup,
            jobs: Vec::new(),
            state: SchedulerState::Stopped,
        }
    }

    /// Register an action on a recurring cron cadence
    ///
    /// Each action normally gets its own lock; passing one shared lock to
    /// two registrations makes them mutually exclusive across actions.
    pub fn register(&mut self, expression: &str, lock: Arc<Mutex<()>>, action: Arc<dyn Action>) {
        info!(
            "Registered schedule '{}' for action '{}'",
            expression,
            action.name()
        );
        self.jobs.push(Job {
            expression: expression.to_string(),
            lock,
            action,
        });
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run all registered schedules until the process terminates
    ///
    /// The only state transition is Stopped -> Running; interrupting the
    /// process is the only way in-flight work ends.
    pub async fn run(mut self) -> Result<()> {
        self.state = SchedulerState::Running;
        info!(
            "Scheduler running with {} schedule(s) in {}",
            self.jobs.len(),
            self.timezone
        );

        let timezone = self.timezone;
        let run_on_startup = self.run_on_startup;

        let mut handles = Vec::new();
        for job in self.jobs {
            handles.push(tokio::spawn(job.run_loop(timezone, run_on_startup)));
        }

        for handle in handles {
            handle.await??;
        }

        Ok(())
    }
}

impl Job {
    /// Timer loop for one schedule: an optional priming run, then sleep
    /// until each next cron fire time and spawn the action
    async fn run_loop(self, timezone: Tz, run_on_startup: bool) -> Result<()> {
        if run_on_startup {
            self.fire();
        }

        loop {
            let now = Utc::now().with_timezone(&timezone);
            let next = cron::next_fire(&self.expression, &now)?;
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

            debug!("Next '{}' run at {}", self.action.name(), next);
            tokio::time::sleep(wait).await;

            self.fire();
        }
    }

    /// Spawn one invocation without blocking the timer
    fn fire(&self) {
        let lock = Arc::clone(&self.lock);
        let action = Arc::clone(&self.action);
        tokio::spawn(async move {
            run_guarded(&lock, action.as_ref()).await;
        });
    }
}
