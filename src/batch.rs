//! Run independent per-row tasks through a bounded worker pool
//!
//! Rows never depend on each other, so a stage can run several external commands at once.
//! The pool is bounded to avoid flooding the scheduler, and results always come back in input
//! order: row N of an output file corresponds to row N of its input.

use std::future::Future;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Semaphore;

use crate::shell::runner::CommandRunner;

/// Result of processing one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome<T> {
    Done(T),
    Failed(String),
}

impl<T> RowOutcome<T> {
    pub fn done(self) -> Option<T> {
        match self {
            RowOutcome::Done(value) => Some(value),
            RowOutcome::Failed(_) => None,
        }
    }
}

/// How many rows of a stage succeeded and failed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_outcomes<T>(outcomes: &[RowOutcome<T>]) -> Summary {
        let succeeded = outcomes.iter().filter(|o| matches!(o, RowOutcome::Done(_))).count();
        Summary { succeeded, failed: outcomes.len() - succeeded }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn log(&self, what: &str) {
        info!("=== Summary ===");
        info!("Succeeded: {} {}", self.succeeded, what);
        match self.failed {
            0 => info!("Failed: 0 {}", what),
            n => warn!("Failed: {} {}", n, what),
        }
    }
}

/// Hands each row's task a runner and limits how many run at once
#[derive(Clone)]
pub struct Executor {
    runner: Arc<dyn CommandRunner>,
    workers: usize,
}

impl Executor {
    /// `workers` of 1 runs rows one at a time, in order
    pub fn new(runner: Arc<dyn CommandRunner>, workers: usize) -> Executor {
        Executor { runner, workers: workers.max(1) }
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Run `task` for every row and collect the outcomes in row order
    ///
    /// Tasks start in row order; a panicking task fails its own row only.
    pub async fn each<I, T, F, Fut>(&self, rows: Vec<I>, task: F) -> Vec<RowOutcome<T>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(Arc<dyn CommandRunner>, I) -> Fut,
        Fut: Future<Output = RowOutcome<T>> + Send + 'static,
    {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(rows.len());

        for row in rows {
            let permit = match Arc::clone(&permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    handles.push(Err(err.to_string()));
                    continue;
                }
            };
            let work = task(Arc::clone(&self.runner), row);
            handles.push(Ok(tokio::spawn(async move {
                let outcome = work.await;
                drop(permit);
                outcome
            })));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = match handle {
                Ok(handle) => handle.await
                    .unwrap_or_else(|err| RowOutcome::Failed(format!("Worker task failed: {}", err))),
                Err(reason) => RowOutcome::Failed(reason),
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
