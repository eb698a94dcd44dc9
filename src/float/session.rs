use anyhow::{Context, Result};
use log::{error, info};
use url::Url;

use crate::batch::{Executor, RowOutcome, Summary};
use crate::float::parse::{compose_url, extract_host, extract_lab_path, token_line};
use crate::roster::entry::{JobRecord, PublishedRecord, RosterEntry, SessionRecord};
use crate::shell::invocation::Invocation;
use crate::shell::runner::CommandRunner;

/// Log file the notebook server's startup banner is captured in
const SERVER_LOG: &str = "stderr.autosave";

/// Work out the browser URL of every job
///
/// Needs two queries per job: `float show` for the public address, and the job log for the
/// notebook server's access token. Jobs missing either are logged and left out.
pub async fn resolve_urls(executor: &Executor, jobs: Vec<JobRecord>) -> (Vec<SessionRecord>, Summary) {
    info!("Resolving URLs for {} jobs", jobs.len());
    let outcomes = executor.each(jobs, |runner, job| async move {
        match resolve(runner.as_ref(), &job).await {
            Ok(session) => {
                info!("Retrieved URL for {}: {}", session.name, session.url);
                RowOutcome::Done(session)
            }
            Err(err) => {
                error!("Can't resolve URL for {} (job {}): {:#}", job.name, job.job_id, err);
                RowOutcome::Failed(format!("{:#}", err))
            }
        }
    }).await;

    let summary = Summary::from_outcomes(&outcomes);
    summary.log("URLs resolved");
    (outcomes.into_iter().filter_map(RowOutcome::done).collect(), summary)
}

async fn resolve(runner: &dyn CommandRunner, job: &JobRecord) -> Result<SessionRecord> {
    let show = Invocation::new("float").args(["show", "-j", job.job_id.as_str()]);
    let shown = runner.run(&show).await?;
    let host = extract_host(&shown.stdout)
        .with_context(|| format!("no host after portMappings in `{}` output", show))?;

    let tail = Invocation::new("float").args(["log", "-j", job.job_id.as_str(), "cat", SERVER_LOG]);
    let logged = runner.run(&tail).await?;
    let text = logged.combined();
    let line = token_line(&text)
        .with_context(|| format!("no token= line in `{}` output", tail))?;
    let lab_path = extract_lab_path(line)
        .with_context(|| format!("no lab?token= URL in log line: {}", line.trim()))?;

    let url = compose_url(&host, &lab_path)
        .with_context(|| format!("bad session URL for host {}", host))?;
    Ok(SessionRecord { name: job.name.clone(), url, job_id: job.job_id.clone() })
}

/// Static URLs following the course site convention, `<base>/<username>`
pub fn published_records(base: &Url, sessions: &[SessionRecord]) -> Result<Vec<PublishedRecord>> {
    let base = base.as_str().trim_end_matches('/');
    sessions.iter()
        .filter_map(|session| RosterEntry::new(&session.name))
        .map(|entry| -> Result<PublishedRecord> {
            let url = Url::parse(&format!("{}/{}", base, entry.username()))
                .with_context(|| format!("bad published URL for {}", entry.name))?;
            Ok(PublishedRecord { name: entry.name, url: url.to_string() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(name: &str) -> SessionRecord {
        SessionRecord { name: name.into(), url: "http://1.2.3.4/lab?token=a".into(), job_id: "job".into() }
    }

    #[test]
    fn published_urls_use_username() {
        let base = Url::parse("https://course.example.org/labs/").unwrap();
        let published = published_records(&base, &[session("Alice Wu"), session("Bo Chen")]).unwrap();
        assert_eq!(published, vec![
            PublishedRecord { name: "Alice Wu".into(), url: "https://course.example.org/labs/alice_wu".into() },
            PublishedRecord { name: "Bo Chen".into(), url: "https://course.example.org/labs/bo_chen".into() },
        ]);
    }

    #[test]
    fn published_base_without_trailing_slash() {
        let base = Url::parse("https://course.example.org/labs").unwrap();
        let published = published_records(&base, &[session("Alice Wu")]).unwrap();
        assert_eq!(published[0].url, "https://course.example.org/labs/alice_wu");
    }
}
