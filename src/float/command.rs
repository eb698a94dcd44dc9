use anyhow::{anyhow, Result};
use serde::Serialize;
use tinytemplate::{format_unescaped, TinyTemplate};

use crate::profile::{DataMount, SubmitProfile};
use crate::roster::entry::RosterEntry;
use crate::shell::quote::sh_quote;

/// Rendering context for the submit command
///
/// Every value is already shell-safe: plain words pass through, anything else is quoted.
#[derive(Serialize)]
struct SubmitContext {
    image_ref: String,
    job_name: String,
    idle_timeout_secs: Option<u64>,
    instance_type: Option<String>,
    cpu: Option<String>,
    memory: Option<String>,
    publish: String,
    vm_policy: Option<String>,
    migrate_policy: Option<String>,
    security_group: String,
    with_root: bool,
    image_vol_size: u32,
    gateway: String,
    data_volumes: Vec<String>,
    entrypoint: Option<String>,
}

/// Rendering context for a mount source path
#[derive(Serialize)]
struct MountContext<'a> {
    username: &'a str,
}

/// Render the `float submit` shell command for one student
///
/// Template lines are flags; blank lines (unset options) are dropped and the rest joined with
/// single spaces. Bucket keys are referenced as shell variables and must be supplied in the
/// environment of the shell that runs the command.
pub fn render_submit(profile: &SubmitProfile, entry: &RosterEntry) -> Result<String> {
    /// included submit command template
    static SUBMIT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/submit.txt"));
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&format_unescaped);
    tt.add_template("submit", SUBMIT)
        .map_err(|err| anyhow!("Submit template doesn't compile: {}", err))?;

    let username = entry.username();
    let data_volumes = profile.mounts.iter()
        .map(|mount| data_volume(mount, &profile.region, &username))
        .collect::<Result<Vec<String>>>()?;

    let context = SubmitContext {
        image_ref: sh_quote(&profile.image_ref()),
        job_name: sh_quote(&entry.job_name()),
        idle_timeout_secs: profile.idle_timeout_secs,
        instance_type: profile.instance_type.as_deref().map(sh_quote),
        cpu: profile.cpu.as_deref().map(sh_quote),
        memory: profile.memory.as_deref().map(sh_quote),
        publish: sh_quote(&profile.publish),
        vm_policy: policy(&profile.vm_policy),
        migrate_policy: policy(&profile.migrate_policy),
        security_group: sh_quote(&profile.security_group),
        with_root: profile.with_root,
        image_vol_size: profile.image_vol_size,
        gateway: sh_quote(&profile.gateway),
        data_volumes,
        entrypoint: profile.entrypoint.as_deref().map(sh_quote),
    };

    let rendered = tt.render("submit", &context)
        .map_err(|err| anyhow!("Can't render submit command for {}: {}", entry.name, err))?;
    Ok(rendered.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join(" "))
}

/// Policy flags use bracket syntax, `'[onDemand=true]'`, quoted so the shell leaves it alone
fn policy(settings: &[String]) -> Option<String> {
    match settings.is_empty() {
        true => None,
        false => Some(sh_quote(&format!("[{}]", settings.join(",")))),
    }
}

/// `[mode=rw,endpoint=s3.<region>.amazonaws.com]s3://bucket/path:/mount/point`
fn data_volume(mount: &DataMount, region: &str, username: &str) -> Result<String> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&format_unescaped);
    tt.add_template("source", &mount.source)
        .map_err(|err| anyhow!("Bad mount source {}: {}", mount.source, err))?;
    let source = tt.render("source", &MountContext { username })
        .map_err(|err| anyhow!("Can't render mount source {}: {}", mount.source, err))?;

    let spec = format!("[mode={},endpoint=s3.{}.amazonaws.com]{}:{}", mount.mode.as_str(), region, source, mount.target);
    Ok(sh_quote(&spec))
}
