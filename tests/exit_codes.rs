use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Scratch directory with a stand-in `float` on a private PATH
///
/// The stand-in appends its arguments to `float.calls` and fails for any job ID
/// containing `bad`.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Sandbox {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        symlink("/bin/sh", bin.join("sh")).unwrap();
        Sandbox { dir }
    }

    fn with_float(self) -> Sandbox {
        let calls = self.path("float.calls");
        let script = format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\ncase \"$*\" in *bad*) echo 'job not found' >&2; exit 1;; esac\n",
            calls.display(),
        );
        let float = self.dir.path().join("bin").join("float");
        fs::write(&float, script).unwrap();
        let mut perms = fs::metadata(&float).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&float, perms).unwrap();
        self
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Arguments `float` was called with, one call per line
    fn float_calls(&self) -> Vec<String> {
        fs::read_to_string(self.path("float.calls"))
            .map(|calls| calls.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn labfleet<I, S>(&self, args: I) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let bin = self.dir.path().join("bin");
        Command::new(env!("CARGO_BIN_EXE_labfleet"))
            .args(args)
            .env("PATH", &bin)
            .env_remove("BUCKET_ACCESS_KEY")
            .env_remove("BUCKET_SECRET_KEY")
            .current_dir(self.dir.path())
            .output()
            .unwrap()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn manage_success_exits_zero() {
    let sandbox = Sandbox::new().with_float();
    sandbox.file("jobs.csv", "Alice Wu,job-1\nBo Chen,job-2\n");

    let output = sandbox.labfleet(["manage", "cancel", "jobs.csv"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(sandbox.float_calls(), vec!["cancel -j job-1 -f", "cancel -j job-2 -f"]);
}

#[test]
fn failed_row_exits_one_after_finishing_batch() {
    let sandbox = Sandbox::new().with_float();
    sandbox.file("jobs.csv", "Alice Wu,job-bad\nBo Chen,job-2\n");

    let output = sandbox.labfleet(["manage", "resume", "jobs.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(sandbox.float_calls(), vec!["resume -j job-bad", "resume -j job-2"]);
}

#[test]
fn missing_input_file_exits_one() {
    let sandbox = Sandbox::new().with_float();

    let output = sandbox.labfleet(["manage", "cancel", "missing.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
    assert!(sandbox.float_calls().is_empty());
}

#[test]
fn missing_float_exits_one() {
    let sandbox = Sandbox::new();
    sandbox.file("jobs.csv", "Alice Wu,job-1\n");

    let output = sandbox.labfleet(["manage", "cancel", "jobs.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("float not found"));
}

#[test]
fn missing_aws_exits_one() {
    let sandbox = Sandbox::new();
    sandbox.file("roster.csv", "Alice Wu\n");

    let output = sandbox.labfleet(["provision", "roster.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("aws not found"));
}

#[test]
fn unknown_action_rejected_before_any_call() {
    let sandbox = Sandbox::new().with_float();
    sandbox.file("jobs.csv", "Alice Wu,job-1\n");

    let output = sandbox.labfleet(["manage", "bogus", "jobs.csv"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid value 'bogus'"));
    assert!(sandbox.float_calls().is_empty());
}

#[test]
fn dry_run_manage_exits_zero_without_calls() {
    let sandbox = Sandbox::new().with_float();
    sandbox.file("jobs.csv", "Alice Wu,job-1\n");

    let output = sandbox.labfleet(["--dry-run", "manage", "cancel", "jobs.csv"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(sandbox.float_calls().is_empty());
}

#[test]
fn dry_run_submit_leaves_output_alone() {
    let sandbox = Sandbox::new().with_float();
    sandbox.file("roster.csv", "Alice Wu\n");
    let jobs = sandbox.file("jobs.csv", "Alice Wu,job-REAL-42\n");

    sandbox.labfleet([
        "--dry-run", "submit", "roster.csv", "jobs.csv",
        "--bucket_access_key", "a", "--bucket_secret_key", "b",
    ]);
    assert_eq!(read(&jobs), "Alice Wu,job-REAL-42\n");
    assert!(sandbox.float_calls().is_empty());
}

#[test]
fn dry_run_get_url_leaves_outputs_alone() {
    let sandbox = Sandbox::new().with_float();
    sandbox.file("jobs.csv", "Alice Wu,job-42\n");
    let urls = sandbox.file("urls.csv", "Alice Wu,http://1.2.3.4/lab?token=t,job-42\n");
    let published = sandbox.file("published.csv", "Alice Wu,https://course.example.org/alice_wu\n");

    sandbox.labfleet([
        "--dry-run", "get_url", "jobs.csv", "urls.csv",
        "--published", "published.csv", "--published-base-url", "https://course.example.org",
    ]);
    assert_eq!(read(&urls), "Alice Wu,http://1.2.3.4/lab?token=t,job-42\n");
    assert_eq!(read(&published), "Alice Wu,https://course.example.org/alice_wu\n");
}
