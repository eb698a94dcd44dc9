use log::{error, info};

use crate::batch::{Executor, RowOutcome, Summary};
use crate::roster::entry::RosterEntry;
use crate::shell::invocation::Invocation;
use crate::shell::runner::CommandRunner;
use crate::storage::StorageTarget;

/// `aws s3 cp - s3://<path>/.keep` fed an empty stdin
pub fn marker_invocation(path: &str, region: &str) -> Invocation {
    let marker = format!("s3://{}/.keep", path);
    Invocation::new("aws")
        .args(["s3", "cp", "-", marker.as_str(), "--region", region])
        .stdin("")
}

/// Create `<base>/<username>` for every student, carrying on past failures
pub async fn provision(executor: &Executor, target: &StorageTarget, roster: Vec<RosterEntry>) -> Summary {
    info!("Creating student directories under: s3://{}", target.base_path);
    let outcomes = executor.each(roster, |runner, entry| {
        let target = target.clone();
        async move { create_directory(runner.as_ref(), &target, &entry).await }
    }).await;

    let summary = Summary::from_outcomes(&outcomes);
    summary.log("directories created");
    summary
}

async fn create_directory(runner: &dyn CommandRunner, target: &StorageTarget, entry: &RosterEntry) -> RowOutcome<String> {
    let username = entry.username();
    let path = target.student_path(&username);
    info!("Creating directory for {} (username: {})", entry.name, username);

    match runner.run(&marker_invocation(&path, &target.region)).await {
        Ok(output) if output.success() => {
            info!("Created directory: s3://{}", path);
            RowOutcome::Done(path)
        }
        Ok(output) => {
            let reason = output.failure_reason();
            error!("Failed to create s3://{}: {}", path, reason);
            RowOutcome::Failed(reason)
        }
        Err(err) => {
            error!("Error creating s3://{}: {}", path, err);
            RowOutcome::Failed(err.to_string())
        }
    }
}
