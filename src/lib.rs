//! # Handoff - two-stage self-update executor
//!
//! Replaces a running desktop application suite with a newer build.
//!
//! ## Flow
//!
//! - **Stage 1** runs from the install directory: resolves the installer
//!   (downloading it when needed), copies the updater to the temp directory,
//!   asks the main application to close and launches the copy in stage 2 mode.
//! - **Stage 2** runs from the temp copy: installs the MSI package or runs the
//!   bootstrapper, deletes the installer, records the suite as up to date and
//!   restarts the main application if it was running.
//!
//! Progress survives the handoff in a small persisted state record.
//!
//! ## Usage
//!
//! ```text
//! handoff stage1
//! handoff stage2 <installer> <install-dir> restart|dont_start
//! ```

pub mod api;
pub mod commands;
pub mod libs;
