//! # External Viewer Launcher
//!
//! Opens help documents with whatever the OS has registered for them.

use std::path::Path;
use log::info;
use crate::report::{self, UiError};
use crate::system::SystemOps;

/// Opens `path` with the default viewer.
///
/// # Returns
/// * `true` - The file was handed to the OS. The viewer is not waited on.
/// * `false` - The path was empty, missing, or the OS refused it. The user
///   has already been shown why.
pub fn open_with_default_viewer(system: &(impl SystemOps + ?Sized), path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return report::report(system, UiError::NoPath);
    }

    if !system.path_exists(path) {
        return report::report(system, UiError::PdfNotFound(path.to_path_buf()));
    }

    match system.shell_open(path) {
        Ok(()) => {
            info!("Opened {:?}", path);
            true
        }
        Err(e) => report::report(system, UiError::OpenFailed(e)),
    }
}
