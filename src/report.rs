//! # User-Facing Reporting
//!
//! Every failure an activation can hit is a [`UiError`]. It is caught at the
//! boundary of the operation that failed, logged, and shown to the user as a
//! modal [`Notice`]. Nothing is retried and nothing propagates further, so the
//! event loop always survives a failed action.
//!
//! Decorative work (icons, logos) goes through [`attempt_silently`] instead:
//! the failure is logged for maintainers and the user sees nothing.

use std::fmt::Display;
use std::path::PathBuf;
use log::{debug, error, info};
use thiserror::Error;
use crate::system::SystemOps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A modal message: a title bar and a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), body: body.into() }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, title: "Error".to_string(), body: body.into() }
    }
}

/// The recoverable UI error. `Display` is the exact dialog body.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("No file path provided.")]
    NoPath,

    #[error("PDF not found:\n{}", .0.display())]
    PdfNotFound(PathBuf),

    #[error("Error opening info file:\n{0:#}")]
    OpenFailed(anyhow::Error),

    #[error("Excel macro failed:\n{0:#}")]
    MacroFailed(anyhow::Error),

    #[error("Failed to open {label}:\n{cause:#}")]
    WorkbookFailed { label: String, cause: anyhow::Error },

    #[error("No page named '{0}'.")]
    UnknownPage(String),

    #[error("No button in slot {0}.")]
    UnknownSlot(usize),
}

impl UiError {
    pub fn notice(&self) -> Notice {
        Notice::error(self.to_string())
    }
}

/// Logs `err` and shows it to the user. Returns `false` so callers can
/// `return report(..)` from boolean operations.
pub fn report(system: &(impl SystemOps + ?Sized), err: UiError) -> bool {
    error!("{}", err.to_string().replace('\n', " "));
    system.notify(&err.notice());
    false
}

/// Shows an informational notice.
pub fn inform(system: &(impl SystemOps + ?Sized), title: &str, body: &str) {
    info!("{}: {}", title, body);
    system.notify(&Notice::info(title, body));
}

/// Runs a non-essential step. A failure is logged at debug level and
/// swallowed; the user is never told.
pub fn attempt_silently<T, E: Display>(what: &str, step: impl FnOnce() -> Result<T, E>) -> Option<T> {
    match step() {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Skipping {}: {}", what, e);
            None
        }
    }
}
