//! The audit pipeline
//!
//! Strictly sequential stages: fetch the ranked feed, reset and initialize
//! the cache workspace, download every package best-effort, derive the
//! pinned manifest from the cache listing, then hand off to the scanner.
//! There is no resume-from-middle; any fatal stage error aborts the run.

use crate::cache::{self, BasketCli, PackageCache};
use crate::config::Config;
use crate::error::{BasketscanError, BasketscanResult};
use crate::feed;
use crate::manifest::{self, MANIFEST_NAME};
use crate::scanner::Scanner;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Run the full pipeline, returning the scanner's exit code.
pub async fn run(config: &Config) -> BasketscanResult<i32> {
    // Fetch the ranked package list. One attempt, no retry; the fetch is
    // blocking so it runs off the async runtime.
    println!(
        "{} Fetching top packages from {}",
        style("→").cyan(),
        config.feed_url
    );
    let feed_url = config.feed_url.clone();
    let packages = tokio::task::spawn_blocking(move || feed::fetch_top_packages(&feed_url))
        .await
        .map_err(|e| BasketscanError::Internal(format!("feed fetch task failed: {e}")))??;
    info!("Fetched {} packages", packages.len());

    // Reset and initialize the workspace. The reset is destructive unless
    // reuse was requested explicitly.
    let basket = BasketCli::new(config.cache_tool.as_str(), &config.workspace_root);
    if config.reuse_workspace {
        debug!(
            "Reusing existing workspace at {}",
            config.workspace_root.display()
        );
    } else {
        cache::reset_workspace(&config.workspace_root).await?;
    }
    basket.init().await?;
    println!(
        "{} Workspace ready at {}",
        style("✓").green(),
        config.workspace_root.display()
    );

    download_all(&basket, &packages).await?;

    // The listing must have completed before any manifest line is written;
    // list() captures the tool's full stdout before we parse it.
    let listing = basket.list().await?;
    let entries = manifest::parse_listing(&listing);
    manifest::write_manifest(&config.workspace_root, &entries).await?;
    println!(
        "{} Generated {} with {} entries",
        style("✓").green(),
        MANIFEST_NAME,
        entries.len()
    );

    let scanner = Scanner::new(config.scanner.as_str());
    scanner.check(&config.workspace_root, MANIFEST_NAME).await
}

/// Download every package in rank order, best-effort per item.
///
/// An empty list is refused before any cache-tool invocation. Individual
/// download failures are counted and skipped; the stage itself only fails
/// when the tool cannot be invoked at all.
pub async fn download_all(
    cache: &impl PackageCache,
    packages: &[String],
) -> BasketscanResult<()> {
    if packages.is_empty() {
        return Err(BasketscanError::EmptyPackageList);
    }

    let pb = create_download_bar(packages.len() as u64);
    let mut failed = 0usize;

    for package in packages {
        pb.set_message(package.clone());
        if !cache.download(package).await? {
            failed += 1;
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if failed > 0 {
        println!(
            "{} {} of {} downloads failed and were skipped",
            style("!").yellow(),
            failed,
            packages.len()
        );
    }
    info!(
        "Downloaded {} packages ({} failures)",
        packages.len() - failed,
        failed
    );
    Ok(())
}

fn create_download_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} Downloading {bar:20.cyan/dim} {pos}/{len} {msg:.dim}")
            .unwrap()
            .progress_chars("━╸─"),
    );
    pb
}
