//! Student directories in object storage, through the `aws` CLI
//!
//! Object storage has no directories, so a student's directory exists once a zero-byte
//! `.keep` marker object has been written under it. Writing the marker again is harmless,
//! which makes provisioning safe to re-run.

/// Create a directory for each roster entry
pub mod provision;

/// List the student directories that already exist
pub mod list;

/// Where student directories live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    /// `bucket/prefix`, without the `s3://` scheme
    pub base_path: String,
    pub region: String,
}

impl StorageTarget {
    pub fn new(base_path: &str, region: &str) -> StorageTarget {
        StorageTarget {
            base_path: base_path.trim_start_matches("s3://").trim_end_matches('/').to_string(),
            region: region.to_string(),
        }
    }

    pub fn student_path(&self, username: &str) -> String {
        format!("{}/{}", self.base_path, username)
    }
}
