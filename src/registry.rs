//! # Action Registry
//!
//! The fixed table behind the "Analysis" page: for every button slot, a label,
//! a help document and what pressing the button does.
//!
//! The registry is plain data. Executing an [`Action`] is the job of
//! [`crate::app::AppContext`]; nothing here touches the disk or starts a
//! process.

use std::fmt;
use crate::invariant_ppt::assert_invariant;

/// A logical resource name, relative to the resource root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource(pub &'static str);

impl Resource {
    pub fn name(&self) -> &'static str {
        self.0
    }

    /// File name without directories.
    pub fn file_name(&self) -> &'static str {
        self.0.rsplit(['/', '\\']).next().unwrap_or(self.0)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const GENERAL_HELP: Resource = Resource("Resources/Files/General_Help.pdf");
pub const VGRF_MACRO_HELP: Resource = Resource("Resources/Files/VGRF_Macro_Help.pdf");
pub const VGRF_MERGE_HELP: Resource = Resource("Resources/Files/VGRF_Merge_Help.pdf");
pub const TR_CONSOLIDATION_HELP: Resource = Resource("Resources/Files/TR_Consolidation_Help.pdf");
pub const TR_TEMPLATE_HELP: Resource = Resource("Resources/Files/TR_Template_Help.pdf");
pub const LINK_GENERATOR_HELP: Resource = Resource("Resources/Files/Link_Generator_Help.pdf");

pub const VGRF_WORKBOOK: Resource = Resource("Resources/Files/VGRF_Macro.xlsm");
pub const TR_CONSOLIDATION_WORKBOOK: Resource = Resource("Resources/Files/TR_Consolidation.xlsm");
pub const TR_TEMPLATE_WORKBOOK: Resource = Resource("Resources/Files/TR_template.xlsm");

/// Optional decorations. Missing ones are skipped without telling the user.
pub const APP_ICON: Resource = Resource("Resources/Icons/ico1.png");
pub const TE_LOGO: Resource = Resource("Resources/Logo/TE_Logo.png");
pub const GDMC_LOGO: Resource = Resource("Resources/Logo/GDMC_Logo.png");
pub const DECORATIONS: [Resource; 3] = [APP_ICON, TE_LOGO, GDMC_LOGO];

/// What a main button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a workbook-qualified macro in a fresh Excel.
    RunMacro { workbook: Resource, macro_name: &'static str },
    /// Open a workbook in a fresh Excel, run nothing.
    OpenWorkbook { workbook: Resource },
    /// Open the Link Generator form.
    LinkGenerator,
    /// Not wired yet. Only tells the user so.
    ComingSoon,
}

impl Action {
    /// The workbook this action needs, if any.
    pub fn workbook(&self) -> Option<Resource> {
        match self {
            Action::RunMacro { workbook, .. } | Action::OpenWorkbook { workbook } => Some(*workbook),
            Action::LinkGenerator | Action::ComingSoon => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub id: usize,
    pub label: &'static str,
    pub help: Resource,
    pub action: Action,
}

#[derive(Debug, Clone)]
pub struct ActionRegistry {
    entries: Vec<ActionEntry>,
}

impl ActionRegistry {
    /// The ten slots of the Analysis page.
    pub fn analysis() -> Self {
        let wired = [
            (
                "VGRF Macro-TR",
                VGRF_MACRO_HELP,
                Action::RunMacro { workbook: VGRF_WORKBOOK, macro_name: "VGRF_Macro.xlsm!TRmacro" },
            ),
            (
                "VGRF Merge",
                VGRF_MERGE_HELP,
                Action::RunMacro { workbook: VGRF_WORKBOOK, macro_name: "VGRF_Macro.xlsm!Merge_VGRF" },
            ),
            (
                "TR Consolidation",
                TR_CONSOLIDATION_HELP,
                Action::RunMacro {
                    workbook: TR_CONSOLIDATION_WORKBOOK,
                    macro_name: "TR_Consolidation.xlsm!consolidating_macro",
                },
            ),
            ("TR Template", TR_TEMPLATE_HELP, Action::OpenWorkbook { workbook: TR_TEMPLATE_WORKBOOK }),
            ("Link Generator", LINK_GENERATOR_HELP, Action::LinkGenerator),
        ];

        let mut entries: Vec<ActionEntry> = wired
            .into_iter()
            .enumerate()
            .map(|(id, (label, help, action))| ActionEntry { id, label, help, action })
            .collect();

        while entries.len() < 10 {
            entries.push(ActionEntry {
                id: entries.len(),
                label: "Coming Soon",
                help: GENERAL_HELP,
                action: Action::ComingSoon,
            });
        }

        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<ActionEntry>) -> Self {
        assert_invariant(
            entries.iter().enumerate().all(|(slot, e)| e.id == slot),
            "Action ids match their slot",
            Some("Registry"),
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    /// Help document for `slot`. Slots without a dedicated document, and
    /// slots past the end, share the general help.
    pub fn help_reference(&self, slot: usize) -> Resource {
        self.entries.get(slot).map(|e| e.help).unwrap_or(GENERAL_HELP)
    }

    pub fn entry(&self, slot: usize) -> Option<&ActionEntry> {
        self.entries.get(slot)
    }

    /// Every file a fully installed launcher needs: help documents and
    /// workbooks, deduplicated, in table order.
    pub fn required_resources(&self) -> Vec<Resource> {
        let mut out: Vec<Resource> = vec![GENERAL_HELP];
        for entry in &self.entries {
            for res in std::iter::once(entry.help).chain(entry.action.workbook()) {
                if !out.contains(&res) {
                    out.push(res);
                }
            }
        }
        out
    }
}
