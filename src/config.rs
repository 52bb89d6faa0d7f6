//! Configuration for the pipeline
//!
//! Resolution order: built-in defaults, then the optional TOML config file
//! (`~/.config/basketscan/config.toml`), then CLI flags / environment
//! variables. The resolved [`Config`] is passed into each pipeline stage;
//! no stage reads process environment on its own.

use crate::cli::Cli;
use crate::error::{BasketscanError, BasketscanResult};
use crate::feed::DEFAULT_FEED_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workspace directory name under the home directory
pub const WORKSPACE_DIR_NAME: &str = ".basket";

const DEFAULT_CACHE_TOOL: &str = "basket";
const DEFAULT_SCANNER: &str = "safety";

/// Resolved pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Top-packages feed URL
    pub feed_url: String,
    /// Cache workspace root
    pub workspace_root: PathBuf,
    /// Cache tool executable
    pub cache_tool: String,
    /// Scanner executable
    pub scanner: String,
    /// Keep an existing workspace instead of resetting it
    pub reuse_workspace: bool,
}

/// On-disk configuration schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub feed: FeedSection,
    pub workspace: WorkspaceSection,
    pub tools: ToolsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSection {
    pub root: Option<PathBuf>,
    pub reuse: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub cache: Option<String>,
    pub scanner: Option<String>,
}

impl FileConfig {
    /// Load the config file, falling back to defaults when it is missing
    pub fn load(path: &Path) -> BasketscanResult<Self> {
        if !path.exists() {
            debug!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| BasketscanError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| BasketscanError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("basketscan")
            .join("config.toml")
    }

    /// Get the default workspace root (`~/.basket`)
    pub fn default_workspace_root() -> BasketscanResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(WORKSPACE_DIR_NAME))
            .ok_or(BasketscanError::HomeNotFound)
    }

    /// Resolve the effective configuration from CLI flags and the config file
    pub fn resolve(cli: &Cli) -> BasketscanResult<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(Self::default_config_path);
        let file = FileConfig::load(&config_path)?;

        let workspace_root = match cli.workspace_root.clone().or(file.workspace.root) {
            Some(root) => root,
            None => Self::default_workspace_root()?,
        };

        Ok(Self {
            feed_url: cli
                .feed_url
                .clone()
                .or(file.feed.url)
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            workspace_root,
            cache_tool: cli
                .cache_tool
                .clone()
                .or(file.tools.cache)
                .unwrap_or_else(|| DEFAULT_CACHE_TOOL.to_string()),
            scanner: cli
                .scanner
                .clone()
                .or(file.tools.scanner)
                .unwrap_or_else(|| DEFAULT_SCANNER.to_string()),
            reuse_workspace: cli.reuse_workspace || file.workspace.reuse,
        })
    }
}
