//! basketscan - audit the most-downloaded PyPI packages
//!
//! Drives the external `basket` cache tool and `safety` scanner through a
//! fixed pipeline: feed fetch, workspace reset, sequential downloads,
//! manifest generation, vulnerability scan.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod manifest;
pub mod pipeline;
pub mod scanner;

pub use error::{BasketscanError, BasketscanResult};
