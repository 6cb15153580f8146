//! Core types for actions-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a remote artifact
///
/// Artifact ids are integral and opaque; nothing is derived from their
/// numeric value beyond display and ordering (the processed-artifact record
/// is persisted in sorted order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub u64);

impl ArtifactId {
    /// Create a new ArtifactId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ArtifactId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ArtifactId> for u64 {
    fn from(id: ArtifactId) -> Self {
        id.0
    }
}

impl PartialEq<u64> for ArtifactId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<ArtifactId> for u64 {
    fn eq(&self, other: &ArtifactId) -> bool {
        *self == other.0
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ArtifactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// One build artifact as reported by the remote listing API
///
/// Enumerated fresh on every run and never mutated locally. The download
/// reference (`archive_download_url`) is opaque — it is handed back to the
/// platform verbatim and typically redirects to a short-lived signed URL.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique artifact identifier
    pub id: ArtifactId,

    /// Artifact name as configured in the producing workflow
    pub name: String,

    /// Whether the platform has expired the artifact; an expired artifact's
    /// download reference is no longer valid
    #[serde(default)]
    pub expired: bool,

    /// Authenticated download locator for the artifact's zip archive
    pub archive_download_url: String,

    /// Size of the archive in bytes (informational, used for logging)
    #[serde(default)]
    pub size_in_bytes: u64,

    /// When the artifact was produced
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the platform will expire the artifact
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// One page of the artifact listing API
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactListing {
    /// Total number of artifacts across all pages
    pub total_count: u64,

    /// Artifacts on this page, in API order
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

/// Why the per-artifact decision skipped an artifact
///
/// Rules are evaluated in this order; the first match wins: name mismatch,
/// expired, already in the processed set, archive already present on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Artifact name does not exactly match the configured target name
    NameMismatch,
    /// The platform has marked the artifact expired
    Expired,
    /// The identifier is in the processed set from a previous run
    AlreadyProcessed,
    /// A file already exists at the deterministic archive path
    ///
    /// Guards against re-downloading after a run that fetched the archive
    /// but failed before the processed set was saved.
    ArchivePresent,
}

impl SkipReason {
    /// Stable lowercase label, used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NameMismatch => "name_mismatch",
            SkipReason::Expired => "expired",
            SkipReason::AlreadyProcessed => "already_processed",
            SkipReason::ArchivePresent => "archive_present",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a completed run did
///
/// Returned by [`ArtifactDownloader::run`](crate::ArtifactDownloader::run)
/// on success. A failed run returns an error instead; partial progress is
/// not reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of artifacts in the remote listing
    pub listed: usize,

    /// Identifiers downloaded and extracted this run, in listing order
    pub downloaded: Vec<ArtifactId>,

    /// Number of listed artifacts skipped by the per-artifact decision
    pub skipped: usize,
}
