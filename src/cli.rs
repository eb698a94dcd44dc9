//! Command line interface

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::float::action::Action;
use crate::roster::read::Column;

#[derive(Parser, Debug)]
#[command(name = "labfleet", version)]
#[command(about = "Provision student storage, submit notebook sessions and manage them with the float CLI")]
pub struct Cli {
    /// How many external commands may run at once (1 runs rows in order)
    #[arg(long, global = true, default_value_t = 1)]
    pub jobs: usize,

    /// Seconds to wait for each external command before killing it (0 waits forever)
    #[arg(long, global = true, default_value_t = 300)]
    pub timeout: u64,

    /// Log external commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a storage directory for each student in a roster
    Provision(ProvisionArgs),
    /// Submit jobs and generate job IDs
    Submit(SubmitArgs),
    /// Retrieve URLs for submitted jobs
    #[command(name = "get_url")]
    GetUrl(GetUrlArgs),
    /// Manage jobs (suspend, resume, or cancel)
    Manage(ManageArgs),
}

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// CSV file with student names in the last column
    #[arg(required_unless_present = "list_existing")]
    pub roster: Option<PathBuf>,

    /// Base S3 path for student directories
    #[arg(long = "base-path", alias = "base_path", default_value = "rockefeller-course/advstatgen_2025")]
    pub base_path: String,

    /// AWS region passed to every storage command
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// List existing directories instead of creating any
    #[arg(long = "list-existing", alias = "list_existing")]
    pub list_existing: bool,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Input CSV file with student names
    pub input: PathBuf,

    /// Output CSV file with names and job IDs
    pub output: PathBuf,

    /// Submit profile (JSON), replaces the built-in course profile
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Docker image name
    #[arg(long)]
    pub image: Option<String>,

    /// Gateway ID
    #[arg(long)]
    pub gateway: Option<String>,

    /// Security group ID
    #[arg(long = "security_group", alias = "security-group")]
    pub security_group: Option<String>,

    /// Column holding student names, counted from 0 (default: last column)
    #[arg(long = "name-column")]
    pub name_column: Option<usize>,

    /// Bucket access key
    #[arg(long = "bucket_access_key", alias = "bucket-access-key", env = "BUCKET_ACCESS_KEY", hide_env_values = true)]
    pub bucket_access_key: String,

    /// Bucket secret key
    #[arg(long = "bucket_secret_key", alias = "bucket-secret-key", env = "BUCKET_SECRET_KEY", hide_env_values = true)]
    pub bucket_secret_key: String,
}

impl SubmitArgs {
    pub fn name_column(&self) -> Column {
        self.name_column.map_or(Column::Last, Column::Index)
    }
}

#[derive(Args, Debug)]
pub struct GetUrlArgs {
    /// Input CSV file from the submit command
    pub input: PathBuf,

    /// Output CSV file with names, URLs, and job IDs
    pub output: PathBuf,

    /// Also write `name,<published-base-url>/<username>` rows to this file
    #[arg(long, requires = "published_base_url")]
    pub published: Option<PathBuf>,

    /// Site the published URLs live under
    #[arg(long = "published-base-url", requires = "published")]
    pub published_base_url: Option<Url>,

    /// End the output with an empty row, so cohort files can be concatenated
    #[arg(long = "trailing-blank-row")]
    pub trailing_blank_row: bool,
}

#[derive(Args, Debug)]
pub struct ManageArgs {
    /// Action to perform on jobs
    #[arg(value_enum)]
    pub action: Action,

    /// CSV file with job IDs in the last column
    pub csv_file: PathBuf,
}
