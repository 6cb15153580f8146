//! Core mirroring orchestrator
//!
//! One [`ArtifactDownloader::run`] call performs one complete pass:
//! load the processed set, fetch the artifact listing, walk it in order
//! deciding per artifact whether to skip or download-and-extract, then save
//! the updated processed set. Runs are strictly sequential; any failure
//! aborts the pass and surfaces as the run's error.


use crate::client::ArtifactsClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extraction::ZipExtractor;
use crate::store::ProcessedStore;
use crate::types::{Artifact, ArtifactId, RunSummary, SkipReason};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Artifact mirroring orchestrator
///
/// Owns the configuration, the authenticated API client, and the
/// processed-set store for one repository. Create once with
/// [`ArtifactDownloader::new`] and invoke [`run`](ArtifactDownloader::run)
/// per polling pass; the instance holds no cross-run state beyond what the
/// store persists.
pub struct ArtifactDownloader {
    /// Static configuration for this repository
    config: Config,
    /// Authenticated client for listing and archive downloads
    client: ArtifactsClient,
    /// Durable record of already-processed artifact identifiers
    store: ProcessedStore,
}

impl ArtifactDownloader {
    /// Create a downloader for the repository named in `config`
    ///
    /// Builds the authenticated HTTP client and ensures the archive and
    /// extraction directories exist so the first download cannot fail on a
    /// missing parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid base URL or token value and
    /// [`Error::Io`] when a working directory cannot be created.
    pub async fn new(config: Config, token: &str) -> Result<Self> {
        let client = ArtifactsClient::new(&config, token)?;

        for dir in [config.archive_dir(), config.extract_dir()] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to create directory {}: {e}",
                    dir.display()
                )))
            })?;
        }

        let store = ProcessedStore::new(config.state_file().clone());

        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// Perform one complete mirroring pass
    ///
    /// Steps, in order:
    /// 1. Load the processed set (absent record loads as empty).
    /// 2. Fetch the complete artifact listing.
    /// 3. For each listed artifact, in listing order: skip when a
    ///    [`SkipReason`] applies, otherwise download the archive to its
    ///    deterministic path and extract it into the extraction directory.
    /// 4. Save the identifiers of **all** listed artifacts as the new
    ///    processed set, replacing the previous record.
    ///
    /// The saved set deliberately includes skipped artifacts: an expired or
    /// differently-named artifact is recorded so later runs do not revisit
    /// it even after its local archive is cleaned up.
    ///
    /// # Errors
    ///
    /// Any listing, download, extraction, or store failure aborts the pass
    /// immediately and is returned as-is. The processed record then keeps
    /// its previous contents, so the next run re-evaluates everything not
    /// already recorded.
    pub async fn run(&self) -> Result<RunSummary> {
        let processed = self.store.load().await?;
        let artifacts = self.client.list_artifacts().await?;

        info!(
            listed = artifacts.len(),
            known = processed.len(),
            artifact_name = %self.config.repository.artifact_name,
            "starting mirroring pass"
        );

        let mut downloaded = Vec::new();
        let mut skipped = 0usize;

        for artifact in &artifacts {
            if let Some(reason) = self.skip_reason(artifact, &processed) {
                debug!(
                    artifact_id = artifact.id.get(),
                    name = %artifact.name,
                    reason = %reason,
                    "skipping artifact"
                );
                skipped += 1;
                continue;
            }

            self.process_artifact(artifact).await?;
            downloaded.push(artifact.id);
        }

        let all_listed: BTreeSet<ArtifactId> = artifacts.iter().map(|a| a.id).collect();
        self.store.save(&all_listed).await?;

        let summary = RunSummary {
            listed: artifacts.len(),
            downloaded,
            skipped,
        };
        info!(
            listed = summary.listed,
            downloaded = summary.downloaded.len(),
            skipped = summary.skipped,
            "mirroring pass complete"
        );
        Ok(summary)
    }

    /// Decide whether an artifact should be skipped this pass
    ///
    /// Rules are evaluated in order; the first match wins:
    /// 1. [`SkipReason::NameMismatch`] — name differs from the target.
    /// 2. [`SkipReason::Expired`] — the platform marked it expired (its
    ///    archive is no longer downloadable).
    /// 3. [`SkipReason::AlreadyProcessed`] — id is in the processed set.
    /// 4. [`SkipReason::ArchivePresent`] — a file already exists at the
    ///    deterministic archive path (a previous pass fetched it but did
    ///    not get to record it).
    fn skip_reason(
        &self,
        artifact: &Artifact,
        processed: &BTreeSet<ArtifactId>,
    ) -> Option<SkipReason> {
        if artifact.name != self.config.repository.artifact_name {
            return Some(SkipReason::NameMismatch);
        }
        if artifact.expired {
            return Some(SkipReason::Expired);
        }
        if processed.contains(&artifact.id) {
            return Some(SkipReason::AlreadyProcessed);
        }
        if self.config.archive_path(artifact.id).exists() {
            return Some(SkipReason::ArchivePresent);
        }
        None
    }

    /// Download one artifact's archive and extract it
    async fn process_artifact(&self, artifact: &Artifact) -> Result<()> {
        let archive_path = self.config.archive_path(artifact.id);

        self.client.download_artifact(artifact, &archive_path).await?;

        let extracted = ZipExtractor::extract(&archive_path, self.config.extract_dir())?;
        info!(
            artifact_id = artifact.id.get(),
            archive = ?archive_path,
            extracted_count = extracted.len(),
            "artifact downloaded and extracted"
        );
        Ok(())
    }
}
