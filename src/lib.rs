//! # actions-dl
//!
//! Mirror the build artifacts of a GitHub repository to the local
//! filesystem: poll the Actions artifact listing, download every
//! not-yet-seen artifact bearing one fixed name, unpack it into a shared
//! directory, and remember what has been handled across runs.
//!
//! ## Design Philosophy
//!
//! actions-dl is designed to be:
//! - **Sequential and predictable** - One listing, one artifact at a time,
//!   in listing order; no concurrency, no retries
//! - **Fail-fast** - Any network, archive, or state failure aborts the run;
//!   the caller decides whether to terminate
//! - **Idempotent across runs** - A durable processed-set record plus a
//!   deterministic archive path prevent duplicate downloads
//! - **Library-first** - The binary is a thin CLI over [`ArtifactDownloader`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use actions_dl::{ArtifactDownloader, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("GitJournal", "GitJournal", "APK");
//!     let token = actions_dl::config::resolve_token(None)?;
//!
//!     let downloader = ArtifactDownloader::new(config, &token).await?;
//!     let summary = downloader.run().await?;
//!
//!     println!(
//!         "listed {}, downloaded {}, skipped {}",
//!         summary.listed,
//!         summary.downloaded.len(),
//!         summary.skipped
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP client for the artifact endpoints
pub mod client;
/// Configuration types
pub mod config;
/// Core mirroring orchestrator
pub mod downloader;
/// Error types
pub mod error;
/// Archive extraction
pub mod extraction;
/// Processed-artifact record persistence
pub mod store;
/// Core types
pub mod types;

// Re-export commonly used types
pub use client::ArtifactsClient;
pub use config::{Config, resolve_token};
pub use downloader::ArtifactDownloader;
pub use error::{Error, ExtractError, FetchError, Result, StoreError};
pub use extraction::ZipExtractor;
pub use store::ProcessedStore;
pub use types::{Artifact, ArtifactId, RunSummary, SkipReason};
