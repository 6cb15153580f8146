//! Error types for actions-dl
//!
//! This module provides the error handling for the library:
//! - Domain-specific sub-enums (Fetch, Extract, Store) folded into one
//!   crate-level [`Error`]
//! - Context information (URLs, file paths, offending archive entries)
//!
//! Every error is fatal to the run in which it occurs: there is no retry,
//! no partial-success reporting, and no local recovery beyond the store's
//! missing-record bootstrap. Errors propagate by `?` to the caller; only the
//! binary entry point decides to terminate the process.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for actions-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for actions-dl
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.base_url")
        key: Option<String>,
    },

    /// No access token was supplied via flag or environment
    #[error("missing access token: pass --token or set GITHUB_TOKEN")]
    MissingToken,

    /// Listing the remote artifacts failed (request, status, or decode)
    #[error("artifact listing failed for {url}: {reason}")]
    Listing {
        /// The listing URL that failed
        url: String,
        /// What went wrong (transport error, HTTP status, malformed payload)
        reason: String,
    },

    /// Downloading an artifact archive failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Extracting a downloaded archive failed
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Reading or writing the processed-artifact record failed
    #[error("state store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error (directory creation, stat, and other local filesystem work)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors downloading one artifact archive to a local file
#[derive(Debug, Error)]
pub enum FetchError {
    /// The download request could not be built
    #[error("failed to build download request for {url}: {reason}")]
    RequestBuild {
        /// The download URL the request was meant for
        url: String,
        /// Why request construction failed
        reason: String,
    },

    /// The local destination file could not be created or truncated
    #[error("failed to create {path}: {source}")]
    FileCreate {
        /// The destination path that could not be created
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The request failed in transit (connect, timeout, or body read)
    #[error("transport error downloading {url}: {source}")]
    Transport {
        /// The download URL that failed
        url: String,
        /// The underlying transport error
        source: reqwest::Error,
    },

    /// The platform answered with a non-success status
    #[error("download of {url} returned HTTP {status}")]
    Status {
        /// The download URL that failed
        url: String,
        /// The HTTP status code received
        status: u16,
    },

    /// Writing downloaded bytes to the local file failed
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// The destination path that could not be written
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors extracting a zip archive into the destination directory
///
/// Any of these aborts the whole extraction immediately; there is no
/// skip-and-continue policy for individual entries.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The archive is missing, truncated, or not a valid zip file
    #[error("failed to open archive {archive}: {reason}")]
    Open {
        /// The archive that could not be opened
        archive: PathBuf,
        /// Why opening failed
        reason: String,
    },

    /// An entry's resolved path would escape the destination directory
    ///
    /// This is a security invariant (an archive entry using `..` segments or
    /// an absolute path to write outside the destination), not merely a
    /// correctness check. Nothing is written for the offending entry.
    #[error("entry '{entry}' in {archive} escapes the destination directory")]
    PathTraversal {
        /// The archive containing the offending entry
        archive: PathBuf,
        /// The stored name of the offending entry
        entry: String,
    },

    /// Reading or writing an individual entry failed
    #[error("failed to extract '{entry}' from {archive}: {reason}")]
    Entry {
        /// The archive being extracted
        archive: PathBuf,
        /// The entry that failed
        entry: String,
        /// The underlying cause
        reason: String,
    },
}

/// Errors reading or writing the processed-artifact record
///
/// A missing record is not an error — `load` substitutes an empty set for
/// first-run bootstrap. Everything else here is fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record exists but could not be read
    #[error("failed to read processed-artifact record {path}: {source}")]
    Read {
        /// The record path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The record is present but not a JSON array of decimal identifiers
    #[error("processed-artifact record {path} is malformed: {reason}")]
    Malformed {
        /// The record path
        path: PathBuf,
        /// What failed to parse
        reason: String,
    },

    /// The record could not be serialized
    #[error("failed to encode processed-artifact record: {source}")]
    Encode {
        /// The underlying serialization error
        source: serde_json::Error,
    },

    /// The record could not be written
    #[error("failed to write processed-artifact record {path}: {source}")]
    Write {
        /// The record path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}
