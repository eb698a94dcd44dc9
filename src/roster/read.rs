use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};

use crate::roster::entry::{JobRecord, RosterEntry};

/// Which field of a row holds the value a stage needs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Column {
    Last,
    Index(usize),
}

impl Column {
    fn pick<'a>(&self, record: &'a StringRecord) -> Option<&'a str> {
        match self {
            Column::Last => record.iter().last(),
            Column::Index(i) => record.get(*i),
        }
    }
}

/// Read student names from a roster, skipping rows where the name field is empty
pub fn read_roster(path: &Path, column: Column) -> Result<Vec<RosterEntry>> {
    let mut roster = Vec::new();
    for (i, record) in read_records(path)?.iter().enumerate() {
        match column.pick(record).and_then(RosterEntry::new) {
            Some(entry) => roster.push(entry),
            None => info!("Skipping row {} of {}: no name", i + 1, path.display()),
        }
    }
    info!("Read {} students from {}", roster.len(), path.display());
    Ok(roster)
}

/// Read `(name, job_id)` pairs written by `submit`
pub fn read_job_records(path: &Path) -> Result<Vec<JobRecord>> {
    let mut jobs = Vec::new();
    for (i, record) in read_records(path)?.iter().enumerate() {
        match (record.get(0), record.get(1)) {
            (Some(name), Some(job_id)) if !job_id.is_empty() => jobs.push(JobRecord {
                name: name.to_string(),
                job_id: job_id.to_string(),
            }),
            _ => warn!("Skipping row {} of {}: expected name and job ID", i + 1, path.display()),
        }
    }
    info!("Read {} jobs from {}", jobs.len(), path.display());
    Ok(jobs)
}

/// Read job IDs from the last column of every row
pub fn read_job_ids(path: &Path) -> Result<Vec<String>> {
    let ids: Vec<String> = read_records(path)?
        .iter()
        .filter_map(|record| Column::Last.pick(record))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    info!("Read {} job IDs from {}", ids.len(), path.display());
    Ok(ids)
}

/// Headerless, ragged rows with blank rows dropped
fn read_records(path: &Path) -> Result<Vec<StringRecord>> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("Can't open {}", path.display()))?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Error reading CSV file {}", path.display()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("input.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn roster_uses_last_field_and_skips_blank_names() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "1,Alice Wu\n2,\n\n3, Bo Chen \n,\n");
        let roster = read_roster(&path, Column::Last).unwrap();
        let names: Vec<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Wu", "Bo Chen"]);
    }

    #[test]
    fn roster_fixed_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Alice Wu,extra\nBo Chen\n");
        let roster = read_roster(&path, Column::Index(0)).unwrap();
        assert_eq!(roster.len(), 2);
        let short = read_roster(&path, Column::Index(1)).unwrap();
        assert_eq!(short, vec![RosterEntry::new("extra").unwrap()]);
    }

    #[test]
    fn job_records_skip_trailing_blank_row() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Alice Wu,job-42\nBo Chen,job-43\n\"\"\n");
        let jobs = read_job_records(&path).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1], JobRecord { name: "Bo Chen".into(), job_id: "job-43".into() });
    }

    #[test]
    fn job_ids_from_last_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Alice Wu,http://1.2.3.4/lab?token=a,job-42\njob-43\n");
        assert_eq!(read_job_ids(&path).unwrap(), vec!["job-42", "job-43"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_roster(&dir.path().join("nope.csv"), Column::Last).unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
