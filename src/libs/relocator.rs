//! Copies the updater out of the install directory.
//!
//! The installer replaces files in the install directory, including the
//! updater binary itself. Stage 2 therefore runs from a copy in the temp
//! directory.

use crate::libs::config::Config;
use crate::libs::error::UpdateError;
use crate::libs::messages::Message;
use crate::{msg_error, msg_info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SelfRelocator {
    source: PathBuf,
    destination: PathBuf,
}

impl SelfRelocator {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Relocator for the running executable into the OS temp directory.
    pub fn current(config: &Config) -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, std::env::temp_dir().join(&config.updater_copy_name)))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Copies the source over any previous copy and returns the destination.
    pub fn relocate(&self) -> Result<PathBuf, UpdateError> {
        match fs::copy(&self.source, &self.destination) {
            Ok(_) => {
                msg_info!(Message::SelfCopied(self.destination.clone()));
                Ok(self.destination.clone())
            }
            Err(e) => {
                msg_error!(Message::SelfCopyFailed {
                    destination: self.destination.clone(),
                    error: e.to_string(),
                });
                Err(UpdateError::Relocation {
                    destination: self.destination.clone(),
                    source: e,
                })
            }
        }
    }
}
