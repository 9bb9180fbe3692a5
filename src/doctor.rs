//! # Resource Doctor
//!
//! A read-only audit of the `Resources/` tree: which help documents and
//! workbooks are present, which are missing, which optional decorations are
//! absent, and which files nothing refers to.

use std::collections::HashSet;
use std::path::PathBuf;
use log::debug;
use walkdir::WalkDir;
use crate::locator::Locator;
use crate::registry::{self, ActionRegistry, Resource};

#[derive(Debug, Default)]
pub struct Report {
    pub present: Vec<Resource>,
    pub missing: Vec<Resource>,
    pub missing_decorations: Vec<Resource>,
    /// Files under `Resources/` that no button or decoration uses.
    pub unrecognised: Vec<PathBuf>,
}

impl Report {
    pub fn is_healthy(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Walks the resource tree and compares it with what the registry expects.
pub fn audit(locator: &Locator, registry: &ActionRegistry) -> Report {
    let mut report = Report::default();

    for res in registry.required_resources() {
        if locator.resolve(res.name()).is_file() {
            report.present.push(res);
        } else {
            report.missing.push(res);
        }
    }

    for res in registry::DECORATIONS {
        if !locator.resolve(res.name()).is_file() {
            report.missing_decorations.push(res);
        }
    }

    let known: HashSet<PathBuf> = registry
        .required_resources()
        .into_iter()
        .chain(registry::DECORATIONS)
        .map(|res| locator.resolve(res.name()))
        .collect();

    let tree = locator.resolve("Resources");
    for entry in WalkDir::new(&tree).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        // Case-insensitive, like the Windows file system.
        let known_here = known.iter().any(|k| {
            k.to_string_lossy().eq_ignore_ascii_case(&path.to_string_lossy())
        });
        if !known_here {
            debug!("Unrecognised resource: {:?}", path);
            report.unrecognised.push(path.to_path_buf());
        }
    }
    report.unrecognised.sort();

    report
}

/// Prints the audit in the same boxed style as the rest of the CLI.
pub fn print(locator: &Locator, report: &Report) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                    GDM ToolBox Resource Report");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("Resource root: {} ({})", locator.root().display(), locator.kind());
    println!();

    println!("REQUIRED FILES ({} of {} present)", report.present.len(), report.present.len() + report.missing.len());
    for res in &report.present {
        println!("  ✓ {}", res);
    }
    for res in &report.missing {
        println!("  ✕ {}", res);
    }

    if !report.missing_decorations.is_empty() {
        println!();
        println!("OPTIONAL DECORATIONS (missing ones are simply not shown):");
        for res in &report.missing_decorations {
            println!("  - {}", res);
        }
    }

    if !report.unrecognised.is_empty() {
        println!();
        println!("UNRECOGNISED FILES ({}):", report.unrecognised.len());
        for path in report.unrecognised.iter().take(10) {
            println!("  ? {}", path.display());
        }
        if report.unrecognised.len() > 10 {
            println!("  ... and {} more", report.unrecognised.len() - 10);
        }
    }

    println!();
    println!("───────────────────────────────────────────────────────────────");
    println!();
    if report.is_healthy() {
        println!("✓ Every button has its help document and workbook.");
    } else {
        println!("Buttons whose files are missing will show an error when pressed.");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &std::path::Path, res: Resource) {
        let path = Locator::with_root(root).resolve(res.name());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn empty_root_reports_everything_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loc = Locator::with_root(dir.path());
        let report = audit(&loc, &ActionRegistry::analysis());

        assert!(report.present.is_empty());
        assert_eq!(report.missing.len(), 9);
        assert_eq!(report.missing_decorations.len(), 3);
        assert!(report.unrecognised.is_empty());
        assert!(!report.is_healthy());
    }

    #[test]
    fn complete_tree_is_healthy_and_extras_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let reg = ActionRegistry::analysis();
        for res in reg.required_resources() {
            touch(dir.path(), res);
        }
        touch(dir.path(), registry::TE_LOGO);
        touch(dir.path(), Resource("Resources/Files/old_notes.txt"));

        let report = audit(&Locator::with_root(dir.path()), &reg);
        assert!(report.is_healthy());
        assert_eq!(report.present.len(), 9);
        assert_eq!(report.missing_decorations, vec![registry::APP_ICON, registry::GDMC_LOGO]);
        assert_eq!(report.unrecognised.len(), 1);
        assert!(report.unrecognised[0].ends_with("old_notes.txt"));
    }
}
