use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::WriterBuilder;
use log::info;
use serde::Serialize;

/// Write records positionally, without a header row
///
/// `trailing_blank_row` appends one empty line after the last record. Cohort files written
/// this way can be concatenated by downstream automation without rows running together.
pub fn write_records<T: Serialize>(path: &Path, records: &[T], trailing_blank_row: bool) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Can't create {}", path.display()))?;

    for record in records {
        writer.serialize(record)
            .with_context(|| format!("Can't write row to {}", path.display()))?;
    }

    let mut file = writer.into_inner()
        .map_err(|err| anyhow!("Can't flush {}: {}", path.display(), err.error()))?;
    if trailing_blank_row {
        file.write_all(b"\n")?;
    }
    file.flush()?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::roster::entry::{JobRecord, SessionRecord};

    use super::*;

    #[test]
    fn writes_positional_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        let jobs = vec![
            JobRecord { name: "Alice Wu".into(), job_id: "job-42".into() },
            JobRecord { name: "Bo Chen".into(), job_id: "job-43".into() },
        ];
        write_records(&path, &jobs, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Alice Wu,job-42\nBo Chen,job-43\n");
    }

    #[test]
    fn trailing_blank_row_is_opt_in() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.csv");
        let sessions = vec![SessionRecord {
            name: "Alice Wu".into(),
            url: "http://1.2.3.4/lab?token=tok1".into(),
            job_id: "job-42".into(),
        }];
        write_records(&path, &sessions, true).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Alice Wu,http://1.2.3.4/lab?token=tok1,job-42\n\n");
    }
}
