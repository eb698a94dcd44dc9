use std::fmt;

use anyhow::Result;
use log::{debug, error, info, warn};

use crate::batch::{Executor, RowOutcome, Summary};
use crate::float::command::render_submit;
use crate::float::parse::extract_job_id;
use crate::profile::SubmitProfile;
use crate::roster::entry::{JobRecord, RosterEntry};
use crate::shell::invocation::Invocation;
use crate::shell::runner::CommandRunner;

/// Bucket keys handed to every session
///
/// Only ever placed in the child environment, never on a command line.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Credentials { .. }")
    }
}

/// Submit one session per student
///
/// Students whose job ID can't be found in the CLI output are logged and left out of the
/// returned records, so the output file only holds jobs that can be queried later.
pub async fn submit(executor: &Executor, profile: &SubmitProfile, credentials: &Credentials, roster: Vec<RosterEntry>) -> Result<(Vec<JobRecord>, Summary)> {
    info!("Submitting {} jobs with image {}", roster.len(), profile.image_ref());

    // render everything up front: a broken profile should fail before anything is submitted
    let mut requests = Vec::with_capacity(roster.len());
    for entry in roster {
        let command = render_submit(profile, &entry)?;
        let invocation = Invocation::shell(&command)
            .env("BUCKET_ACCESS_KEY", &credentials.access_key)
            .env("BUCKET_SECRET_KEY", &credentials.secret_key);
        requests.push((entry, invocation));
    }

    let outcomes = executor.each(requests, |runner, (entry, invocation)| async move {
        submit_one(runner.as_ref(), &entry, &invocation).await
    }).await;

    let summary = Summary::from_outcomes(&outcomes);
    let jobs: Vec<JobRecord> = outcomes.into_iter().filter_map(RowOutcome::done).collect();
    summary.log("jobs submitted");
    Ok((jobs, summary))
}

async fn submit_one(runner: &dyn CommandRunner, entry: &RosterEntry, invocation: &Invocation) -> RowOutcome<JobRecord> {
    info!("Submitting job {} for {}", entry.job_name(), entry.name);
    debug!("{}", invocation);

    let output = match runner.run(invocation).await {
        Ok(output) => output,
        Err(err) => {
            error!("Failed to submit job for {}: {}", entry.name, err);
            return RowOutcome::Failed(err.to_string());
        }
    };
    if !output.success() {
        warn!("float submit for {} exited with {:?}", entry.name, output.code);
    }

    let text = output.combined();
    match extract_job_id(&text) {
        Some(job_id) => {
            info!("Submitted job for {} with Job ID: {}", entry.name, job_id);
            RowOutcome::Done(JobRecord { name: entry.name.clone(), job_id })
        }
        None => {
            error!("No job ID in float output for {}, leaving them out of the output file", entry.name);
            debug!("float output was: {}", text);
            RowOutcome::Failed(format!("no job ID for {}", entry.name))
        }
    }
}
