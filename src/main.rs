use std::path::PathBuf;

use actions_dl::{ArtifactDownloader, Config};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "actions-dl",
    version,
    about = "Mirror a repository's Actions artifacts to the local filesystem"
)]
struct Args {
    /// Repository owner (user or organization)
    #[arg(long)]
    owner: String,

    /// Repository name
    #[arg(long)]
    repo: String,

    /// Artifact name to mirror; all other artifacts are skipped
    #[arg(long, value_name = "NAME")]
    artifact_name: String,

    /// Directory for downloaded archives (default: ./artifacts)
    #[arg(long, value_name = "DIR")]
    archive_dir: Option<PathBuf>,

    /// Directory archives are extracted into (default: ./repo)
    #[arg(long, value_name = "DIR")]
    extract_dir: Option<PathBuf>,

    /// Path of the processed-artifact record (default: ./processed_artifacts.json)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// API base URL (default: https://api.github.com)
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Artifacts per listing page (default: 100)
    #[arg(long, value_name = "N")]
    per_page: Option<u32>,

    /// Access token; falls back to the GITHUB_TOKEN environment variable
    #[arg(long)]
    token: Option<String>,
}

impl Args {
    fn into_config(self) -> (Config, Option<String>) {
        let mut config = Config::new(self.owner, self.repo, self.artifact_name);
        if let Some(dir) = self.archive_dir {
            config.storage.archive_dir = dir;
        }
        if let Some(dir) = self.extract_dir {
            config.storage.extract_dir = dir;
        }
        if let Some(path) = self.state_file {
            config.storage.state_file = path;
        }
        if let Some(url) = self.api_base {
            config.api.base_url = url;
        }
        if let Some(secs) = self.timeout_secs {
            config.api.request_timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(n) = self.per_page {
            config.api.per_page = n;
        }
        (config, self.token)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn run(args: Args) -> actions_dl::Result<()> {
    let (config, token_flag) = args.into_config();
    let token = actions_dl::resolve_token(token_flag.as_deref())?;

    let downloader = ArtifactDownloader::new(config, &token).await?;
    let summary = downloader.run().await?;

    info!(
        listed = summary.listed,
        downloaded = summary.downloaded.len(),
        skipped = summary.skipped,
        "done"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!(error = %e, "mirroring run failed");
        std::process::exit(1);
    }
}
