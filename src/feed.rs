//! Top-packages feed client
//!
//! Fetches the ranked list of most-downloaded PyPI packages from hugovk's
//! published JSON feed. The feed shape is a top-level `rows` array whose
//! elements carry the package name in a `project` field; row order is the
//! popularity ranking and is preserved in the returned list.

use crate::error::{BasketscanError, BasketscanResult};
use serde::Deserialize;
use tracing::debug;

/// Default feed URL (top PyPI packages over the last 30 days)
pub const DEFAULT_FEED_URL: &str =
    "https://hugovk.github.io/top-pypi-packages/top-pypi-packages-30-days.json";

// The full feed runs to a few MB of JSON; raise ureq's default body limit.
const BODY_LIMIT: u64 = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct TopPackagesFeed {
    rows: Vec<FeedRow>,
}

#[derive(Debug, Deserialize)]
struct FeedRow {
    project: String,
}

/// Fetch the ranked package list from the feed.
///
/// A single blocking GET; there is no retry. A non-success status or a body
/// that does not match the expected feed shape aborts the pipeline.
pub fn fetch_top_packages(url: &str) -> BasketscanResult<Vec<String>> {
    debug!("Fetching package feed from {}", url);

    let mut response = ureq::get(url)
        .header(
            "User-Agent",
            concat!("basketscan/", env!("CARGO_PKG_VERSION")),
        )
        .call()
        .map_err(|e| match e {
            ureq::Error::StatusCode(status) => BasketscanError::FeedStatus {
                url: url.to_string(),
                status,
            },
            other => BasketscanError::FeedRequest {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;

    let body = response
        .body_mut()
        .with_config()
        .limit(BODY_LIMIT)
        .read_to_string()
        .map_err(|e| BasketscanError::FeedRequest {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    parse_feed(url, &body)
}

/// Parse a feed body into the ranked package list, preserving row order.
fn parse_feed(url: &str, body: &str) -> BasketscanResult<Vec<String>> {
    let feed: TopPackagesFeed =
        serde_json::from_str(body).map_err(|e| BasketscanError::FeedParse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    debug!("Feed returned {} packages", feed.rows.len());
    Ok(feed.rows.into_iter().map(|row| row.project).collect())
}
