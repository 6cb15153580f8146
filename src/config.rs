//! Configuration types for actions-dl

use crate::error::{Error, Result};
use crate::types::ArtifactId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable consulted when no token flag is given
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Repository and artifact selection
///
/// Identifies which repository's artifact store to poll and which artifact
/// name to mirror. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Exact artifact name to mirror; listed artifacts with any other name
    /// are skipped
    pub artifact_name: String,
}

/// Local filesystem layout
///
/// Groups the directories and the state record this utility produces and
/// consumes. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding downloaded artifact archives (default: "./artifacts")
    ///
    /// Archives are kept between runs; a file already present at the
    /// deterministic archive path is treated as "already handled".
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Directory archives are extracted into, shared and accumulated across
    /// runs (default: "./repo")
    #[serde(default = "default_extract_dir")]
    pub extract_dir: PathBuf,

    /// Path of the processed-artifact record
    /// (default: "./processed_artifacts.json")
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            archive_dir: default_archive_dir(),
            extract_dir: default_extract_dir(),
            state_file: default_state_file(),
        }
    }
}

/// Remote API settings
///
/// Used as a nested sub-config within [`Config`]. The base URL is
/// configurable so the utility works against self-hosted platform instances
/// (and so tests can point it at a mock server).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the platform's REST API (default: "https://api.github.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout applied to listing and download requests, in seconds
    /// (default: 30)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Artifacts requested per listing page (default: 100, the API maximum)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            per_page: default_per_page(),
        }
    }
}

/// Main configuration for [`ArtifactDownloader`](crate::ArtifactDownloader)
///
/// Constructed once at startup and passed into the downloader; there is no
/// process-wide mutable state. Fields are organized into logical sub-configs:
/// - [`repository`](RepositoryConfig) — owner, repo, artifact name
/// - [`storage`](StorageConfig) — archive/extract directories, state record
/// - [`api`](ApiConfig) — base URL, timeout, page size
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Repository and artifact selection (required)
    pub repository: RepositoryConfig,

    /// Local directory and state-record layout
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Create a configuration for one owner/repo/artifact-name triple with
    /// default storage and API settings
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        artifact_name: impl Into<String>,
    ) -> Self {
        Self {
            repository: RepositoryConfig {
                owner: owner.into(),
                repo: repo.into(),
                artifact_name: artifact_name.into(),
            },
            storage: StorageConfig::default(),
            api: ApiConfig::default(),
        }
    }

    /// Directory holding downloaded artifact archives
    pub fn archive_dir(&self) -> &PathBuf {
        &self.storage.archive_dir
    }

    /// Directory archives are extracted into
    pub fn extract_dir(&self) -> &PathBuf {
        &self.storage.extract_dir
    }

    /// Path of the processed-artifact record
    pub fn state_file(&self) -> &PathBuf {
        &self.storage.state_file
    }

    /// File name of the local archive for one artifact:
    /// `<artifact_name><id>.zip`
    pub fn archive_file_name(&self, id: ArtifactId) -> String {
        format!("{}{}.zip", self.repository.artifact_name, id)
    }

    /// Deterministic local path of the archive for one artifact
    ///
    /// Stable across repeated computation within and across runs; the
    /// orchestrator uses presence of a file at this path as a skip signal.
    pub fn archive_path(&self, id: ArtifactId) -> PathBuf {
        self.storage.archive_dir.join(self.archive_file_name(id))
    }
}

/// Resolve the access token from an explicit flag value or the environment
///
/// The flag value wins when it is non-empty; otherwise the `GITHUB_TOKEN`
/// environment variable is consulted. An empty string from either source
/// counts as absent.
///
/// # Errors
///
/// Returns [`Error::MissingToken`] when neither source supplies a non-empty
/// value.
pub fn resolve_token(flag: Option<&str>) -> Result<String> {
    if let Some(token) = flag
        && !token.is_empty()
    {
        return Ok(token.to_string());
    }

    match std::env::var(TOKEN_ENV_VAR) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingToken),
    }
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("./artifacts")
}

fn default_extract_dir() -> PathBuf {
    PathBuf::from("./repo")
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./processed_artifacts.json")
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_per_page() -> u32 {
    100
}

// Duration fields serialize as integer seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
