use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use serde::Serialize;

use labfleet::batch::{Executor, Summary};
use labfleet::cli::{Cli, Command, GetUrlArgs, ManageArgs, ProvisionArgs, SubmitArgs};
use labfleet::float::manage::manage;
use labfleet::float::session::{published_records, resolve_urls};
use labfleet::float::submit::{submit, Credentials};
use labfleet::profile::SubmitProfile;
use labfleet::roster::read::{read_job_ids, read_job_records, read_roster, Column};
use labfleet::roster::write::write_records;
use labfleet::shell::runner::{tool_available, CommandRunner, DryRunRunner, ProcessRunner};
use labfleet::storage::list::list_existing;
use labfleet::storage::provision::provision;
use labfleet::storage::StorageTarget;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let runner: Arc<dyn CommandRunner> = match cli.dry_run {
        true => {
            info!("--dry-run set, external commands will only be logged");
            Arc::new(DryRunRunner)
        }
        false => Arc::new(ProcessRunner::new(cli.command_timeout())),
    };
    let executor = Executor::new(runner, cli.jobs);

    let result = match cli.command {
        Command::Provision(args) => run_provision(&executor, args).await,
        Command::Submit(args) => run_submit(&executor, args, cli.dry_run).await,
        Command::GetUrl(args) => run_get_url(&executor, args, cli.dry_run).await,
        Command::Manage(args) => run_manage(&executor, args).await,
    };

    match result {
        Ok(summary) if summary.all_succeeded() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run_provision(executor: &Executor, args: ProvisionArgs) -> Result<Summary> {
    let target = StorageTarget::new(&args.base_path, &args.region);
    require_tool(executor, "aws", &[
        "Installation: https://docs.aws.amazon.com/cli/latest/userguide/install-cliv2.html",
        "Configuration: aws configure",
    ]).await?;

    if args.list_existing {
        list_existing(executor.runner(), &target).await?;
        return Ok(Summary::default());
    }

    let roster_path = args.roster.context("A roster file is required unless --list-existing is set")?;
    let roster = read_roster(&roster_path, Column::Last)?;
    let summary = provision(executor, &target, roster).await;
    match summary.all_succeeded() {
        true => info!("All student directories created successfully!"),
        false => warn!("Some directories failed to create. Please check AWS credentials and permissions."),
    }
    Ok(summary)
}

async fn run_submit(executor: &Executor, args: SubmitArgs, dry_run: bool) -> Result<Summary> {
    let profile = match &args.profile {
        Some(path) => SubmitProfile::load(path)?,
        None => SubmitProfile::builtin()?,
    }.with_overrides(args.image.clone(), args.gateway.clone(), args.security_group.clone());

    let roster = read_roster(&args.input, args.name_column())?;
    require_float(executor).await?;

    let credentials = Credentials { access_key: args.bucket_access_key, secret_key: args.bucket_secret_key };
    let (jobs, summary) = submit(executor, &profile, &credentials, roster).await?;
    save(&args.output, &jobs, false, dry_run)?;
    Ok(summary)
}

async fn run_get_url(executor: &Executor, args: GetUrlArgs, dry_run: bool) -> Result<Summary> {
    let jobs = read_job_records(&args.input)?;
    require_float(executor).await?;

    let (sessions, summary) = resolve_urls(executor, jobs).await;
    save(&args.output, &sessions, args.trailing_blank_row, dry_run)?;

    if let (Some(path), Some(base)) = (&args.published, &args.published_base_url) {
        let published = published_records(base, &sessions)?;
        save(path, &published, false, dry_run)?;
    }
    Ok(summary)
}

async fn run_manage(executor: &Executor, args: ManageArgs) -> Result<Summary> {
    let job_ids = read_job_ids(&args.csv_file)?;
    require_float(executor).await?;
    Ok(manage(executor, args.action, job_ids).await)
}

/// Write stage output, except on a dry run where nothing real was produced
fn save<T: Serialize>(path: &Path, records: &[T], trailing_blank_row: bool, dry_run: bool) -> Result<()> {
    if dry_run {
        info!("--dry-run set, leaving {} untouched ({} rows)", path.display(), records.len());
        return Ok(());
    }
    write_records(path, records, trailing_blank_row)
}

async fn require_float(executor: &Executor) -> Result<()> {
    require_tool(executor, "float", &[
        "Install the float CLI from your MMCloud operation center and log in with: float login",
    ]).await
}

async fn require_tool(executor: &Executor, tool: &str, guidance: &[&str]) -> Result<()> {
    if tool_available(executor.runner(), tool).await {
        return Ok(());
    }
    error!("{} CLI is not available. Please install and configure it first.", tool);
    for line in guidance {
        error!("{}", line);
    }
    bail!("{} not found on PATH", tool)
}
