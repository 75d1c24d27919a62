//! Core library modules of the updater.
//!
//! ## Features
//!
//! - **Update State**: Durable record shared across the two stages
//! - **Orchestration**: Installer locator, self-relocator, stage 1 and stage 2
//! - **Capabilities**: Process launching, MSI installs, main application shutdown
//! - **Infrastructure**: Configuration, data storage, logging, messages, errors
//!
//! ## Usage
//!
//! ```rust,no_run
//! use handoff::libs::update_state::{FileStateStore, StateStore};
//!
//! let store = FileStateStore::new()?;
//! println!("{}", store.read().state);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod locator;
pub mod logging;
pub mod messages;
pub mod mode;
pub mod msi;
pub mod peer;
pub mod process;
pub mod relocator;
pub mod stage1;
pub mod stage2;
pub mod update_state;
