//! Release feed integration.
//!
//! The updater consumes the release feed through the `ReleaseFeed` trait: one
//! call to learn whether a newer build exists, one to fetch its installer.
//! `GitHubReleases` is the production implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use handoff::api::{GitHubReleases, ReleaseFeed, VersionCheck};
//! use handoff::libs::config::Config;
//! use std::path::Path;
//!
//! let feed = GitHubReleases::new(&Config::default());
//! if let VersionCheck::Available(info) = feed.latest()? {
//!     let installer = feed.download(&info, Path::new("/tmp"))?;
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod github;

pub use github::GitHubReleases;

/// A downloadable newer version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadInfo {
    pub version: String,
    pub url: String,
    /// File name the installer is saved under.
    pub file_name: String,
}

/// Outcome of a successful release feed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    UpToDate,
    Available(DownloadInfo),
}

pub trait ReleaseFeed {
    /// Queries the feed for the newest release.
    fn latest(&self) -> Result<VersionCheck>;

    /// Downloads the installer into `dest_dir` and returns its local path.
    fn download(&self, info: &DownloadInfo, dest_dir: &Path) -> Result<PathBuf>;
}
