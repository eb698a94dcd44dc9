//! Submit profiles: everything `float submit` needs besides the student
//!
//! A profile is JSON, validated against an embedded schema before it is deserialised. The
//! course defaults are embedded in the binary and used when no profile file is given.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use jsonschema::JSONSchema;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitProfile {
    #[serde(default = "default_registry")]
    pub registry: String,
    pub image: String,
    pub gateway: String,
    pub security_group: String,
    #[serde(default)]
    pub instance_type: Option<String>,
    /// vCPU count or `min:max` range
    #[serde(default)]
    pub cpu: Option<String>,
    /// Memory in GB or `min:max` range
    #[serde(default)]
    pub memory: Option<String>,
    /// `host:container` port mapping
    pub publish: String,
    #[serde(default = "default_image_vol_size")]
    pub image_vol_size: u32,
    #[serde(default)]
    pub with_root: bool,
    /// Rendered as `'[a=b,c=d]'`
    #[serde(default)]
    pub vm_policy: Vec<String>,
    #[serde(default)]
    pub migrate_policy: Vec<String>,
    /// Passed to the container, which shuts the notebook server down when idle this long
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
    /// Job script run instead of the image's default entrypoint
    #[serde(default)]
    pub entrypoint: Option<String>,
    /// Object storage region, used for data volume endpoints
    pub region: String,
    #[serde(default)]
    pub mounts: Vec<DataMount>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MountMode {
    R,
    Rw,
}

impl MountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MountMode::R => "r",
            MountMode::Rw => "rw",
        }
    }
}

/// A bucket path mounted into the session
///
/// `source` may contain `{username}`, filled in per student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DataMount {
    pub mode: MountMode,
    pub source: String,
    pub target: String,
}

fn default_registry() -> String {
    "docker.io".to_string()
}

fn default_image_vol_size() -> u32 {
    50
}

impl SubmitProfile {
    /// The course defaults compiled into the binary
    pub fn builtin() -> Result<SubmitProfile> {
        /// included default profile
        static DEFAULT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/profile/default.json"));
        SubmitProfile::from_json(DEFAULT).context("Built-in profile is broken")
    }

    /// Read and validate a profile file
    pub fn load(path: &Path) -> Result<SubmitProfile> {
        info!("Reading submit profile at {}", path.display());
        let json = fs::read_to_string(path)
            .with_context(|| format!("Can't read profile at {}", path.display()))?;
        SubmitProfile::from_json(&json)
            .with_context(|| format!("Invalid profile {}", path.display()))
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, image: Option<String>, gateway: Option<String>, security_group: Option<String>) -> SubmitProfile {
        if let Some(image) = image { self.image = image }
        if let Some(gateway) = gateway { self.gateway = gateway }
        if let Some(security_group) = security_group { self.security_group = security_group }
        self
    }

    /// Full image reference, e.g. `docker.io/yiweizh/rockefeller-jupyter`
    pub fn image_ref(&self) -> String {
        match self.registry.trim_end_matches('/') {
            "" => self.image.clone(),
            registry => format!("{}/{}", registry, self.image),
        }
    }

    fn from_json(json: &str) -> Result<SubmitProfile> {
        let value: Value = serde_json::from_str(json).context("Profile is not valid JSON")?;
        validate(&value)?;
        serde_json::from_value::<SubmitProfile>(value).context("Can't deserialise profile")
    }
}

fn validate(profile: &Value) -> Result<()> {
    /// included profile schema
    static SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/profile.json"));
    let schema: Value = serde_json::from_str(SCHEMA).context("Profile schema is not valid JSON")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("Profile schema doesn't compile: {}", err))?;

    if let Err(errors) = compiled.validate(profile) {
        let reasons: Vec<String> = errors.map(|err| err.to_string()).collect();
        warn!("Profile fails validation");
        bail!("Profile fails validation: {}", reasons.join("; "));
    }
    Ok(())
}
