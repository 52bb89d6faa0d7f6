//! CLI argument definitions using clap derive
//!
//! There are no subcommands: running the binary executes the full pipeline.
//! Every flag is env-backed so the tool can also be driven purely through
//! the environment.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// basketscan - audit the most-downloaded PyPI packages
///
/// Fetches the ranked top-packages feed, downloads each package with the
/// basket cache tool, derives a pinned requirements.txt from the cache and
/// runs the safety scanner against it.
#[derive(Parser, Debug)]
#[command(name = "basketscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "BASKETSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Top-packages feed URL
    #[arg(long, env = "BASKETSCAN_FEED_URL")]
    pub feed_url: Option<String>,

    /// Cache workspace root (default: ~/.basket)
    #[arg(long, env = "BASKET_ROOT")]
    pub workspace_root: Option<PathBuf>,

    /// Keep an existing workspace instead of deleting and recreating it
    #[arg(long)]
    pub reuse_workspace: bool,

    /// Cache tool executable
    #[arg(long, env = "BASKETSCAN_CACHE_TOOL")]
    pub cache_tool: Option<String>,

    /// Scanner executable
    #[arg(long, env = "BASKETSCAN_SCANNER")]
    pub scanner: Option<String>,
}
