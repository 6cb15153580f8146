//! Archive extraction
//!
//! This module handles unpacking downloaded artifact archives (zip) into the
//! shared extraction directory. Entry paths are validated before anything is
//! written: an entry that would resolve outside the destination directory
//! aborts the whole extraction with an error naming the entry.

mod zip;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

// Re-exports
pub use zip::ZipExtractor;
