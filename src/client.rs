//! HTTP client for the artifact listing and archive download endpoints
//!
//! Wraps a single `reqwest::Client` configured once with the access token,
//! API version header, and request timeout. Listing is paginated; downloads
//! stream the response body straight to a local file without buffering whole
//! archives in memory.

use crate::config::Config;
use crate::error::{Error, FetchError, Result};
use crate::types::{Artifact, ArtifactListing};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// User agent sent with every request; the platform rejects anonymous clients
const USER_AGENT: &str = concat!("actions-dl/", env!("CARGO_PKG_VERSION"));

/// REST API version header value
const API_VERSION: &str = "2022-11-28";

/// Client for one repository's artifact endpoints
///
/// Construct once per run via [`ArtifactsClient::new`] and reuse for the
/// listing call and every archive download. The client follows redirects,
/// which the archive endpoint relies on: it answers with a redirect to a
/// short-lived signed URL on a different host. `reqwest` drops the
/// `Authorization` header when following a cross-host redirect, which the
/// signed URL requires.
#[derive(Debug)]
pub struct ArtifactsClient {
    /// Underlying HTTP client with auth and version headers pre-set
    http: reqwest::Client,

    /// API base URL, normalized without a trailing slash
    base_url: String,

    /// Repository owner
    owner: String,

    /// Repository name
    repo: String,

    /// Artifacts requested per listing page
    per_page: u32,
}

impl ArtifactsClient {
    /// Create a client for the repository named in `config`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL does not parse or the
    /// token cannot be carried in an HTTP header, and when the underlying
    /// HTTP client cannot be built.
    pub fn new(config: &Config, token: &str) -> Result<Self> {
        let base_url = Url::parse(&config.api.base_url).map_err(|e| Error::Config {
            message: format!("invalid API base URL '{}': {}", config.api.base_url, e),
            key: Some("api.base_url".to_string()),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            Error::Config {
                message: "access token contains characters not allowed in an HTTP header"
                    .to_string(),
                key: None,
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(config.api.request_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
                key: None,
            })?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            owner: config.repository.owner.clone(),
            repo: config.repository.repo.clone(),
            per_page: config.api.per_page,
        })
    }

    /// Fetch the repository's complete artifact listing
    ///
    /// Follows pagination until every artifact the server reports in
    /// `total_count` has been collected, or until the server returns an
    /// empty page. Listing order is preserved as returned (newest first).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Listing`] naming the failing page URL when any page
    /// request fails, answers with a non-success status, or returns a
    /// payload that does not decode.
    pub async fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/actions/artifacts?per_page={}&page={}",
                self.base_url, self.owner, self.repo, self.per_page, page
            );
            debug!(%url, page, "fetching artifact listing page");

            let listing = self.fetch_listing_page(&url).await?;
            let fetched = listing.artifacts.len();
            artifacts.extend(listing.artifacts);

            // An empty page terminates even if total_count claims more;
            // the server is authoritative about what it will actually return.
            if fetched == 0 || artifacts.len() as u64 >= listing.total_count {
                break;
            }
            page += 1;
        }

        info!(count = artifacts.len(), "fetched artifact listing");
        Ok(artifacts)
    }

    async fn fetch_listing_page(&self, url: &str) -> Result<ArtifactListing> {
        let response = self.http.get(url).send().await.map_err(|e| Error::Listing {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Listing {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        response
            .json::<ArtifactListing>()
            .await
            .map_err(|e| Error::Listing {
                url: url.to_string(),
                reason: format!("malformed listing payload: {e}"),
            })
    }

    /// Download one artifact's archive to `dest`
    ///
    /// The body is streamed to disk chunk by chunk. On a failure after the
    /// destination was created the partial file is left in place. Calling
    /// again with the same `dest` restarts from scratch because
    /// [`tokio::fs::File::create`] truncates, but the orchestrated flow
    /// never does: its archive-presence rule skips any file at the
    /// deterministic path, so a partial archive stays until removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] describing which stage failed: request
    /// transport, HTTP status, destination file creation, or writing the
    /// body to disk.
    pub async fn download_artifact(&self, artifact: &Artifact, dest: &Path) -> Result<()> {
        let url = &artifact.archive_download_url;
        info!(
            artifact_id = artifact.id.get(),
            %url,
            dest = ?dest,
            size = artifact.size_in_bytes,
            created_at = ?artifact.created_at,
            expires_at = ?artifact.expires_at,
            "downloading artifact archive"
        );

        let mut response = self.http.get(url).send().await.map_err(|e| {
            // An unusable URL from the listing payload surfaces here as a
            // builder error rather than a transport failure
            if e.is_builder() {
                FetchError::RequestBuild {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            } else {
                FetchError::Transport {
                    url: url.clone(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| FetchError::FileCreate {
                path: dest.to_path_buf(),
                source: e,
            })?;

        let mut bytes_written: u64 = 0;
        loop {
            let chunk = match response.chunk().await.map_err(|e| FetchError::Transport {
                url: url.clone(),
                source: e,
            })? {
                Some(chunk) => chunk,
                None => break,
            };
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::FileWrite {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
            bytes_written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| FetchError::FileWrite {
            path: dest.to_path_buf(),
            source: e,
        })?;

        debug!(artifact_id = artifact.id.get(), bytes = bytes_written, "archive written");
        Ok(())
    }
}
