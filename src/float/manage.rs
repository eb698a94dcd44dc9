use log::{error, info};

use crate::batch::{Executor, RowOutcome, Summary};
use crate::float::action::Action;
use crate::shell::invocation::Invocation;
use crate::shell::runner::CommandRunner;

/// `float <action> -j <job_id>`, with `-f` when the action is forced
pub fn action_invocation(action: Action, job_id: &str) -> Invocation {
    let invocation = Invocation::new("float").args([action.to_string().as_str(), "-j", job_id]);
    match action.forced() {
        true => invocation.arg("-f"),
        false => invocation,
    }
}

/// Apply `action` to every job, independently and without retries
pub async fn manage(executor: &Executor, action: Action, job_ids: Vec<String>) -> Summary {
    info!("Performing {} on {} jobs", action, job_ids.len());
    let outcomes = executor.each(job_ids, move |runner, job_id| async move {
        apply(runner.as_ref(), action, &job_id).await
    }).await;

    let summary = Summary::from_outcomes(&outcomes);
    summary.log(&format!("jobs ({})", action));
    summary
}

async fn apply(runner: &dyn CommandRunner, action: Action, job_id: &str) -> RowOutcome<()> {
    match runner.run(&action_invocation(action, job_id)).await {
        Ok(output) if output.success() => {
            info!("Performed {} on job ID: {}", action, job_id);
            RowOutcome::Done(())
        }
        Ok(output) => {
            let reason = output.failure_reason();
            error!("Failed to perform {} on job ID: {}. Error: {}", action, job_id, reason);
            RowOutcome::Failed(reason)
        }
        Err(err) => {
            error!("Failed to perform {} on job ID: {}. Error: {}", action, job_id, err);
            RowOutcome::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspend_and_cancel_are_forced() {
        assert_eq!(action_invocation(Action::Suspend, "job-42").to_string(), "float suspend -j job-42 -f");
        assert_eq!(action_invocation(Action::Cancel, "job-42").to_string(), "float cancel -j job-42 -f");
    }

    #[test]
    fn resume_is_not_forced() {
        let invocation = action_invocation(Action::Resume, "job-42");
        assert_eq!(invocation.args, vec!["resume", "-j", "job-42"]);
    }
}
