use anyhow::{bail, Result};
use log::info;

use crate::shell::invocation::Invocation;
use crate::shell::runner::CommandRunner;
use crate::storage::StorageTarget;

/// Names of the directories under the base path
pub async fn list_existing(runner: &dyn CommandRunner, target: &StorageTarget) -> Result<Vec<String>> {
    let prefix = format!("s3://{}/", target.base_path);
    let invocation = Invocation::new("aws")
        .args(["s3", "ls", prefix.as_str(), "--region", target.region.as_str()]);
    let output = runner.run(&invocation).await?;
    if !output.success() {
        bail!("Failed to list directories: {}", output.failure_reason());
    }

    let directories = parse_listing(&output.stdout);
    match directories.is_empty() {
        true => info!("No existing student directories found"),
        false => {
            info!("Existing student directories:");
            for name in &directories {
                info!("  - {}", name);
            }
        }
    }
    Ok(directories)
}

/// `aws s3 ls` marks common prefixes (directories) with `PRE`
pub fn parse_listing(listing: &str) -> Vec<String> {
    listing.lines()
        .filter_map(|line| line.trim_start().strip_prefix("PRE "))
        .map(|name| name.trim().trim_end_matches('/').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
