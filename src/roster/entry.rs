use serde::{Deserialize, Serialize};

/// One student from the course roster
///
/// Both derived identifiers must stay stable between provisioning and submission: the storage
/// directory created for a student is the one mounted into their session. Two students whose
/// names transform to the same username will share a directory, nothing checks for this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
}

impl RosterEntry {
    /// Blank names aren't students
    pub fn new(name: &str) -> Option<RosterEntry> {
        let name = name.trim();
        match name.is_empty() {
            true => None,
            false => Some(RosterEntry { name: name.to_string() }),
        }
    }

    /// Storage directory and mount path segment, `Alice Wu` -> `alice_wu`
    pub fn username(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }

    /// Scheduler job name, `Alice Wu` -> `Alice_Wu`
    pub fn job_name(&self) -> String {
        self.name.replace(' ', "_")
    }
}

/// A submitted job: written by `submit`, read by `get_url`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobRecord {
    pub name: String,
    pub job_id: String,
}

/// A running session a student can open in their browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub name: String,
    pub url: String,
    pub job_id: String,
}

/// Static published URL for a student, following the course site convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedRecord {
    pub name: String,
    pub url: String,
}
