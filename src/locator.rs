//! # Resource Locator
//!
//! Turns a logical resource name (`Resources/Files/General_Help.pdf`) into an
//! absolute path on disk.
//!
//! The root is detected once at startup and every lookup re-joins against it,
//! so resolved paths are never cached. Detection order:
//!
//! 1.  **Override**: `--resources` or `resource_root` from the config file
//!     (see [`Locator::with_root`]).
//! 2.  **Bundle**: the extraction directory a packaged single-file build
//!     announces through `GDM_TOOLBOX_BUNDLE`.
//! 3.  **Source**: `CARGO_MANIFEST_DIR`, present when launched with `cargo run`.
//! 4.  **Executable**: the directory holding the running binary.
//! 5.  **Working directory**, and `.` if even that is unavailable.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use log::debug;

/// Environment variable a packaging runtime sets to its extraction directory.
pub const BUNDLE_ENV: &str = "GDM_TOOLBOX_BUNDLE";

/// Where the resource root came from. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Override,
    Bundle,
    Source,
    Executable,
    WorkingDir,
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RootKind::Override => "override",
            RootKind::Bundle => "bundle",
            RootKind::Source => "source checkout",
            RootKind::Executable => "executable directory",
            RootKind::WorkingDir => "working directory",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Locator {
    root: PathBuf,
    kind: RootKind,
}

impl Locator {
    /// Detects the root from the real process environment.
    pub fn detect() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let cwd = std::env::current_dir().ok();
        Self::detect_from(|key| std::env::var_os(key), exe_dir, cwd)
    }

    /// Detection with every input injected.
    ///
    /// # Arguments
    /// * `env` - Environment lookup (`BUNDLE_ENV`, `CARGO_MANIFEST_DIR`).
    /// * `exe_dir` - Directory containing the running executable, if known.
    /// * `cwd` - Current working directory, if known.
    pub fn detect_from(
        env: impl Fn(&str) -> Option<OsString>,
        exe_dir: Option<PathBuf>,
        cwd: Option<PathBuf>,
    ) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let (root, kind) = if let Some(root) = non_empty(BUNDLE_ENV) {
            (root, RootKind::Bundle)
        } else if let Some(root) = non_empty("CARGO_MANIFEST_DIR") {
            (root, RootKind::Source)
        } else if let Some(root) = exe_dir {
            (root, RootKind::Executable)
        } else {
            (cwd.unwrap_or_else(|| PathBuf::from(".")), RootKind::WorkingDir)
        };

        debug!("Resource root: {:?} ({})", root, kind);
        Self { root, kind }
    }

    /// A locator pinned to an explicit root (`--resources` or config).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), kind: RootKind::Override }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> RootKind {
        self.kind
    }

    /// Resolves a logical name against the root.
    ///
    /// Both `/` and `\` separate components, so `Resources\Files\a.pdf`
    /// and `Resources/Files/a.pdf` name the same file on every platform.
    /// Empty and `.` components are dropped. Never fails and touches no files.
    pub fn resolve(&self, relative_name: &str) -> PathBuf {
        relative_name
            .split(['/', '\\'])
            .filter(|part| !part.is_empty() && *part != ".")
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<OsString> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| OsString::from(*v))
        }
    }

    #[test]
    fn explicit_root_is_an_override() {
        let loc = Locator::with_root("/opt/override");
        assert_eq!(loc.root(), Path::new("/opt/override"));
        assert_eq!(loc.kind(), RootKind::Override);
    }

    #[test]
    fn bundle_dir_is_preferred_over_source_and_exe() {
        let loc = Locator::detect_from(
            env_of(&[(BUNDLE_ENV, "/tmp/bundle"), ("CARGO_MANIFEST_DIR", "/src")]),
            Some(PathBuf::from("/bin")),
            None,
        );
        assert_eq!(loc.kind(), RootKind::Bundle);
        assert_eq!(loc.root(), Path::new("/tmp/bundle"));
    }

    #[test]
    fn empty_bundle_env_is_ignored() {
        let loc = Locator::detect_from(
            env_of(&[(BUNDLE_ENV, ""), ("CARGO_MANIFEST_DIR", "/src")]),
            Some(PathBuf::from("/bin")),
            None,
        );
        assert_eq!(loc.kind(), RootKind::Source);
    }

    #[test]
    fn executable_dir_then_cwd_then_dot() {
        let exe = Locator::detect_from(env_of(&[]), Some(PathBuf::from("/bin")), Some(PathBuf::from("/cwd")));
        assert_eq!(exe.kind(), RootKind::Executable);

        let cwd = Locator::detect_from(env_of(&[]), None, Some(PathBuf::from("/cwd")));
        assert_eq!(cwd.kind(), RootKind::WorkingDir);
        assert_eq!(cwd.root(), Path::new("/cwd"));

        let dot = Locator::detect_from(env_of(&[]), None, None);
        assert_eq!(dot.root(), Path::new("."));
    }

    #[test]
    fn backslash_names_resolve_to_components() {
        let loc = Locator::with_root("/app");
        let expected = Path::new("/app").join("Resources").join("Files").join("General_Help.pdf");
        assert_eq!(loc.resolve(r"Resources\Files\General_Help.pdf"), expected);
        assert_eq!(loc.resolve("Resources/Files/General_Help.pdf"), expected);
        assert_eq!(loc.resolve("./Resources//Files/General_Help.pdf"), expected);
    }

    proptest! {
        #[test]
        fn resolved_paths_stay_under_root(parts in prop::collection::vec("[A-Za-z0-9_]{1,8}", 1..5)) {
            let loc = Locator::with_root("/root_dir");
            let name = parts.join("\\");
            let resolved = loc.resolve(&name);
            prop_assert!(resolved.starts_with("/root_dir"));
            prop_assert_eq!(resolved.components().count(), parts.len() + 2);
        }
    }
}
