//! Basket cache tool invocation
//!
//! Wraps the external `basket` program behind the [`PackageCache`] trait so
//! the pipeline can be exercised against a fake in tests. Every invocation
//! is captured as a [`ToolOutput`]; each call site decides which non-zero
//! exits are fatal. The tool's own root location is pinned by exporting
//! `BASKET_ROOT` on every invocation.

use crate::error::{BasketscanError, BasketscanResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Captured result of one external-tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code (-1 if terminated by signal)
    pub code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the invocation exited with code 0
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Operations the pipeline needs from the package cache tool
#[async_trait]
pub trait PackageCache {
    /// Create/reset the cache workspace (`basket init`)
    async fn init(&self) -> BasketscanResult<()>;

    /// Fetch one package into the workspace (`basket download <name>`).
    ///
    /// Returns whether the tool exited successfully; per-item failures are
    /// tolerated by the caller, not raised.
    async fn download(&self, package: &str) -> BasketscanResult<bool>;

    /// Print the cached packages (`basket list`), returning raw stdout
    async fn list(&self) -> BasketscanResult<String>;
}

/// The real `basket` CLI
pub struct BasketCli {
    program: String,
    workspace_root: PathBuf,
}

impl BasketCli {
    pub fn new(program: impl Into<String>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workspace_root: workspace_root.into(),
        }
    }

    /// Execute a basket subcommand and capture its output
    async fn exec(&self, args: &[&str]) -> BasketscanResult<ToolOutput> {
        debug!("Executing: {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(args)
            .env("BASKET_ROOT", &self.workspace_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                BasketscanError::command_failed(format!("{} {:?}", self.program, args), e)
            })?;

        Ok(ToolOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Map a non-zero exit into a fatal error for subcommands that must succeed
    fn fatal(&self, subcommand: &str, out: ToolOutput) -> BasketscanError {
        BasketscanError::CacheTool {
            tool: self.program.clone(),
            subcommand: subcommand.to_string(),
            code: out.code,
            stderr: out.stderr.trim().to_string(),
        }
    }
}

#[async_trait]
impl PackageCache for BasketCli {
    async fn init(&self) -> BasketscanResult<()> {
        let out = self.exec(&["init"]).await?;
        if out.success() {
            Ok(())
        } else {
            Err(self.fatal("init", out))
        }
    }

    async fn download(&self, package: &str) -> BasketscanResult<bool> {
        let out = self.exec(&["download", package]).await?;
        if !out.success() {
            warn!(
                "Download failed for {} (exit {}): {}",
                package,
                out.code,
                out.stderr.trim()
            );
        }
        Ok(out.success())
    }

    async fn list(&self) -> BasketscanResult<String> {
        let out = self.exec(&["list"]).await?;
        if out.success() {
            Ok(out.stdout)
        } else {
            Err(self.fatal("list", out))
        }
    }
}

/// Remove an existing workspace so the next `init` starts from scratch.
///
/// Destructive by design: the previous run's artifacts do not survive.
pub async fn reset_workspace(root: &Path) -> BasketscanResult<()> {
    if root.exists() {
        info!("Workspace {} already exists, deleting", root.display());
        fs::remove_dir_all(root)
            .await
            .map_err(|e| BasketscanError::io(format!("removing workspace {}", root.display()), e))?;
    }
    Ok(())
}
