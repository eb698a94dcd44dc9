use std::sync::Mutex;

use async_trait::async_trait;

use labfleet::shell::invocation::Invocation;
use labfleet::shell::runner::{CapturedOutput, CommandRunner, RunError};

/// Stands in for `aws` and `float`: answers by substring match and records every call
#[derive(Default)]
pub struct FakeCli {
    responses: Vec<(String, CapturedOutput)>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeCli {
    pub fn new() -> FakeCli {
        FakeCli::default()
    }

    /// Reply to commands containing `needle` with `stdout` and exit code 0
    pub fn respond(mut self, needle: &str, stdout: &str) -> FakeCli {
        let output = CapturedOutput { code: Some(0), stdout: stdout.to_string(), stderr: String::new() };
        self.responses.push((needle.to_string(), output));
        self
    }

    /// Reply to commands containing `needle` with `stderr` and exit code 1
    pub fn fail(mut self, needle: &str, stderr: &str) -> FakeCli {
        let output = CapturedOutput { code: Some(1), stdout: String::new(), stderr: stderr.to_string() };
        self.responses.push((needle.to_string(), output));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Displayed command lines, excluding tool probes
    pub fn commands(&self) -> Vec<String> {
        self.calls().iter()
            .map(ToString::to_string)
            .filter(|line| !line.starts_with("command -v"))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeCli {
    async fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, RunError> {
        self.calls.lock().unwrap().push(invocation.clone());
        let line = invocation.to_string();
        let output = self.responses.iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(CapturedOutput { code: Some(0), ..Default::default() });
        Ok(output)
    }
}
