//! GitHub releases feed.
//!
//! Queries `releases/latest` of the configured repository and downloads the
//! installer asset matching the running architecture. Requests run on a
//! current-thread runtime created per call, keeping the callers synchronous.

use super::{DownloadInfo, ReleaseFeed, VersionCheck};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_debug, msg_info};
use anyhow::Result;
use reqwest::Client;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug)]
pub struct Release {
    pub tag_name: String,
    pub assets: Vec<Asset>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Asset {
    pub browser_download_url: String,
    pub name: String,
}

#[derive(Debug)]
pub struct GitHubReleases {
    client: Client,
    user_agent: String,
    current_version: String,
    releases_url: String,
}

impl GitHubReleases {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            user_agent: Config::app_name().to_owned(),
            current_version: Config::current_version().to_owned(),
            releases_url: format!(
                "https://api.github.com/repos/{}/{}/releases/latest",
                config.release_owner, config.release_repo
            ),
        }
    }

    fn block_on<F: Future>(future: F) -> Result<F::Output> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        Ok(runtime.block_on(future))
    }

    async fn fetch_release(&self) -> Result<Release> {
        let release = self
            .client
            .get(&self.releases_url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .error_for_status()?
            .json::<Release>()
            .await?;
        Ok(release)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Compares the release against the running version and picks its installer.
    pub fn evaluate(current_version: &str, release: &Release) -> Result<VersionCheck> {
        let latest = release.tag_name.trim_start_matches('v');
        let latest_version = Version::parse(latest)?;
        let current = Version::parse(current_version)?;

        msg_debug!(Message::ReleaseChecked {
            current: current.to_string(),
            latest: latest_version.to_string(),
        });

        if latest_version <= current {
            return Ok(VersionCheck::UpToDate);
        }

        let marker = platform_marker();
        let asset = release.assets.iter().find(|asset| {
            let name = asset.name.to_lowercase();
            (name.ends_with(".msi") || name.ends_with(".exe")) && name.contains(marker)
        });

        match asset {
            Some(asset) => Ok(VersionCheck::Available(DownloadInfo {
                version: latest.to_owned(),
                url: asset.browser_download_url.clone(),
                file_name: asset.name.clone(),
            })),
            None => msg_bail_anyhow!(Message::ReleaseAssetMissing(latest.to_owned())),
        }
    }
}

/// Architecture marker used in installer asset names.
pub fn platform_marker() -> &'static str {
    match env::consts::ARCH {
        "aarch64" => "arm64",
        _ => "x64",
    }
}

impl ReleaseFeed for GitHubReleases {
    fn latest(&self) -> Result<VersionCheck> {
        let release = Self::block_on(self.fetch_release())??;
        Self::evaluate(&self.current_version, &release)
    }

    fn download(&self, info: &DownloadInfo, dest_dir: &Path) -> Result<PathBuf> {
        msg_info!(Message::DownloadingInstaller(info.url.clone()));
        let content = Self::block_on(self.fetch_bytes(&info.url))??;

        fs::create_dir_all(dest_dir)?;
        let file_name = Path::new(&info.file_name)
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "installer.exe".into());
        let installer = dest_dir.join(file_name);
        fs::write(&installer, content)?;
        Ok(installer)
    }
}
