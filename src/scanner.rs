//! Vulnerability scanner invocation
//!
//! Runs the external `safety` scanner against the generated manifest with
//! stdio inherited, so the report streams straight to the operator. The
//! scanner's exit code is returned unmodified; findings are never
//! interpreted here.

use crate::error::{BasketscanError, BasketscanResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// The external scanner program
pub struct Scanner {
    program: String,
}

impl Scanner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Invoke `<scanner> check -r <manifest>` in the workspace.
    ///
    /// Returns the scanner's exit code (-1 if terminated by signal). Any
    /// code, including "vulnerabilities found", is passed through.
    pub async fn check(&self, workspace: &Path, manifest: &str) -> BasketscanResult<i32> {
        debug!(
            "Invoking {} check -r {} in {}",
            self.program,
            manifest,
            workspace.display()
        );

        let status = Command::new(&self.program)
            .args(["check", "-r", manifest])
            .current_dir(workspace)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                BasketscanError::command_failed(
                    format!("{} check -r {}", self.program, manifest),
                    e,
                )
            })?;

        Ok(status.code().unwrap_or(-1))
    }
}
