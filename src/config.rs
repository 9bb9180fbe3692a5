//! # Configuration
//!
//! Optional JSON settings. Every field has a default, so a missing file is
//! the normal case. The file lives in the per-user config directory
//! (`%APPDATA%\GDMC\GDM ToolBox\config\config.json` on Windows) unless
//! `--config` points elsewhere.
//!
//! ```json
//! { "resource_root": "D:\\Tools\\GDM", "powershell": "pwsh", "excel_visible": true }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory that contains `Resources/`. Detected when absent.
    pub resource_root: Option<PathBuf>,
    /// PowerShell executable used for Excel automation.
    pub powershell: String,
    /// Whether Excel is shown after a macro run.
    pub excel_visible: bool,
    /// Native message boxes on Windows; console frames when false.
    pub native_dialogs: bool,
    /// Keys this version does not know. Warned about, otherwise ignored.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resource_root: None,
            powershell: default_powershell().to_string(),
            excel_visible: true,
            native_dialogs: true,
            unknown: BTreeMap::new(),
        }
    }
}

fn default_powershell() -> &'static str {
    if cfg!(windows) { "powershell.exe" } else { "pwsh" }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "GDMC", "GDM ToolBox")
}

/// Default location of the config file, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

/// Parses settings from JSON text. Unknown keys are logged and skipped; the
/// known ones still apply.
pub fn parse(text: &str) -> Result<Settings> {
    let settings: Settings = serde_json::from_str(text).context("Invalid config JSON")?;
    for key in settings.unknown.keys() {
        warn!("Ignoring unknown config key '{}'", key);
    }
    Ok(settings)
}

/// Reads settings from `path`. `Ok(None)` when the file does not exist.
pub fn read(path: &Path) -> Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    parse(&text).with_context(|| format!("In {:?}", path)).map(Some)
}

/// Loads settings, falling back to defaults when the file is missing or broken.
///
/// # Arguments
/// * `explicit` - Path given on the command line; overrides the default location.
pub fn load(explicit: Option<&Path>) -> Settings {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(default_path) else {
        debug!("No config directory on this platform, using defaults");
        return Settings::default();
    };

    match read(&path) {
        Ok(Some(settings)) => {
            debug!("Loaded config from {:?}", path);
            settings
        }
        Ok(None) => {
            debug!("No config at {:?}, using defaults", path);
            Settings::default()
        }
        Err(e) => {
            warn!("Ignoring config: {:#}", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(parse("{}").unwrap(), Settings::default());
        assert!(Settings::default().excel_visible);
    }

    #[test]
    fn fields_override_defaults() {
        let s = parse(r#"{ "resource_root": "/srv/gdm", "powershell": "pwsh-preview", "excel_visible": false }"#).unwrap();
        assert_eq!(s.resource_root, Some(PathBuf::from("/srv/gdm")));
        assert_eq!(s.powershell, "pwsh-preview");
        assert!(!s.excel_visible);
        assert!(s.native_dialogs);
    }

    #[test]
    fn unknown_keys_do_not_discard_known_ones() {
        let s = parse(r#"{ "resource_root": "/srv/gdm", "excel_visble": false, "theme": "Dark" }"#).unwrap();
        assert_eq!(s.resource_root, Some(PathBuf::from("/srv/gdm")));
        assert!(s.excel_visible);
        assert_eq!(s.unknown.keys().collect::<Vec<_>>(), vec!["excel_visble", "theme"]);
    }

    #[test]
    fn load_keeps_the_root_despite_a_misspelled_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "resource_root": "/srv/gdm", "native_dialog": false }}"#).unwrap();
        let settings = load(Some(file.path()));
        assert_eq!(settings.resource_root, Some(PathBuf::from("/srv/gdm")));
        assert!(settings.native_dialogs);
    }

    #[test]
    fn wrongly_typed_known_key_still_rejects_the_file() {
        assert!(parse(r#"{ "excel_visible": "yes" }"#).is_err());
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read(&dir.path().join("config.json")).unwrap(), None);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(read(file.path()).is_err());
        assert_eq!(load(Some(file.path())), Settings::default());
    }

    #[test]
    fn load_reads_an_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "native_dialogs": false }}"#).unwrap();
        let settings = load(Some(file.path()));
        assert!(!settings.native_dialogs);
    }
}
