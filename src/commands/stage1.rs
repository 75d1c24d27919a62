//! Stage 1 command: wires the production collaborators into `Stage1`.

use crate::api::GitHubReleases;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::UpdateError;
use crate::libs::locator::InstallerLocator;
use crate::libs::peer::SystemPeerShutdown;
use crate::libs::process::SystemLauncher;
use crate::libs::relocator::SelfRelocator;
use crate::libs::stage1::Stage1;
use crate::libs::update_state::StateStore;
use std::path::PathBuf;

pub fn cmd(store: &dyn StateStore, config: &Config, storage: &DataStorage) -> Result<(), UpdateError> {
    let feed = GitHubReleases::new(config);
    let relocator = SelfRelocator::current(config).map_err(|source| UpdateError::Relocation {
        destination: std::env::temp_dir().join(&config.updater_copy_name),
        source,
    })?;
    let install_dir = relocator.source().parent().map(PathBuf::from).unwrap_or_default();
    let launcher = SystemLauncher::default();

    let stage = Stage1 {
        locator: InstallerLocator::new(store, &feed, storage.pending_updates_path()),
        relocator,
        peer: &SystemPeerShutdown,
        peer_identity: config.peer_identity(),
        launcher: &launcher,
        install_dir,
    };

    stage.run().map(|_| ())
}
