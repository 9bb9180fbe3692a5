//! # Macro Invoker
//!
//! Runs macros inside Excel workbooks through COM automation.
//!
//! Every call starts a **new** Excel instance, even when the user already has
//! Excel open, so a macro never lands in someone's unsaved work. The workbook
//! and the application are left open afterwards: macro results are meant to be
//! inspected by eye.
//!
//! The call is synchronous. The launcher's event loop is blocked until Excel
//! returns, and there is no timeout, retry or cancellation. Any failure is
//! reported to the user once and swallowed here.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use log::info;
use crate::report::{self, UiError};
use crate::system::SystemOps;

/// One Excel automation request. Built right before the launch, dropped after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroJob {
    pub workbook: PathBuf,
    /// Workbook-qualified macro name (`Book.xlsm!Macro`). `None` only opens
    /// the workbook.
    pub macro_name: Option<String>,
    pub visible: bool,
}

/// Opens `workbook` in a fresh Excel and runs `macro_name` in it.
///
/// # Arguments
/// * `workbook` - Absolute path of the `.xlsm` file.
/// * `macro_name` - Workbook-qualified name, e.g. `VGRF_Macro.xlsm!TRmacro`.
/// * `visible` - Whether Excel is shown once the macro has finished.
pub fn run_macro(system: &(impl SystemOps + ?Sized), workbook: &Path, macro_name: &str, visible: bool) {
    let job = MacroJob {
        workbook: workbook.to_path_buf(),
        macro_name: Some(macro_name.to_string()),
        visible,
    };
    info!("Running macro {} from {:?}", macro_name, workbook);
    if let Err(e) = system.launch_excel(&job) {
        report::report(system, UiError::MacroFailed(e));
    }
}

/// Opens `workbook` in a fresh Excel without running anything.
///
/// # Arguments
/// * `label` - Button label, named in the failure dialog.
pub fn open_workbook_only(system: &(impl SystemOps + ?Sized), workbook: &Path, label: &str, visible: bool) {
    let job = MacroJob {
        workbook: workbook.to_path_buf(),
        macro_name: None,
        visible,
    };
    info!("Opening workbook {:?}", workbook);
    if let Err(e) = system.launch_excel(&job) {
        report::report(system, UiError::WorkbookFailed { label: label.to_string(), cause: e });
    }
}

/// The PowerShell script that carries out a [`MacroJob`].
///
/// The script is plain ASCII and holds no job data: the workbook, macro and
/// visibility arrive as parameters (see [`automation_args`]). It creates
/// exactly one `Excel.Application`, checks the workbook after the launch so a
/// missing file is reported with its path, runs at most one macro and only
/// then applies visibility. A visible Excel is handed over to the user
/// (`UserControl`) so it outlives the script.
pub const AUTOMATION_SCRIPT: &str = concat!(
    "param([string]$Workbook, [string]$Macro = '', [switch]$Visible)\r\n",
    "$ErrorActionPreference = 'Stop'\r\n",
    "try {\r\n",
    "    $excel = New-Object -ComObject Excel.Application\r\n",
    "    if (-not (Test-Path -LiteralPath $Workbook)) { throw \"Workbook not found: $Workbook\" }\r\n",
    "    $null = $excel.Workbooks.Open($Workbook)\r\n",
    "    if ($Macro) { $null = $excel.Run($Macro) }\r\n",
    "    if ($Visible) {\r\n",
    "        $excel.Visible = $true\r\n",
    "        $excel.UserControl = $true\r\n",
    "    } else {\r\n",
    "        $excel.Visible = $false\r\n",
    "    }\r\n",
    "} catch {\r\n",
    "    [Console]::Error.WriteLine($_.Exception.Message)\r\n",
    "    exit 1\r\n",
    "}\r\n",
);

/// Script parameters for `job`, passed after `-File <script>`.
///
/// Each value is its own process argument, so paths reach PowerShell
/// unquoted and in full Unicode.
pub fn automation_args(job: &MacroJob) -> Vec<OsString> {
    let mut args = vec![OsString::from("-Workbook"), job.workbook.clone().into_os_string()];
    if let Some(name) = &job.macro_name {
        args.push(OsString::from("-Macro"));
        args.push(OsString::from(name));
    }
    if job.visible {
        args.push(OsString::from("-Visible"));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NoticeLevel;
    use crate::system::MockSystem;
    use proptest::prelude::*;

    fn workbook() -> PathBuf {
        PathBuf::from("/app/Resources/Files/VGRF_Macro.xlsm")
    }

    #[test]
    fn success_launches_once_and_stays_quiet() {
        let system = MockSystem::with_files(&[workbook()]);
        run_macro(&system, &workbook(), "VGRF_Macro.xlsm!TRmacro", true);

        let launches = system.excel_launches.lock().unwrap();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].macro_name.as_deref(), Some("VGRF_Macro.xlsm!TRmacro"));
        assert!(launches[0].visible);
        assert!(system.notices.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_workbook_is_reported_with_its_cause() {
        let system = MockSystem::new();
        run_macro(&system, &workbook(), "VGRF_Macro.xlsm!TRmacro", true);

        assert_eq!(system.excel_launches.lock().unwrap().len(), 1);
        assert_eq!(system.macro_runs(), 1);
        let notices = system.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].body.starts_with("Excel macro failed:\n"));
        assert!(notices[0].body.contains("Workbook not found"));
    }

    #[test]
    fn macro_error_is_converted_not_raised() {
        let system = MockSystem::with_files(&[workbook()]);
        *system.macro_error.lock().unwrap() = Some("Cannot run the macro 'Nope'".to_string());
        run_macro(&system, &workbook(), "VGRF_Macro.xlsm!Nope", true);

        let notices = system.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].body.contains("Cannot run the macro 'Nope'"));
    }

    #[test]
    fn consecutive_runs_each_start_a_fresh_instance() {
        let system = MockSystem::with_files(&[workbook()]);
        run_macro(&system, &workbook(), "VGRF_Macro.xlsm!TRmacro", true);
        *system.macro_error.lock().unwrap() = Some("boom".to_string());
        run_macro(&system, &workbook(), "VGRF_Macro.xlsm!TRmacro", true);

        assert_eq!(system.excel_launches.lock().unwrap().len(), 2);
        assert_eq!(system.macro_runs(), 2);
        // first succeeded silently, second reported on its own
        assert_eq!(system.notices.lock().unwrap().len(), 1);
    }

    #[test]
    fn open_only_runs_no_macro() {
        let template = PathBuf::from("/app/Resources/Files/TR_template.xlsm");
        let system = MockSystem::with_files(&[template.clone()]);
        open_workbook_only(&system, &template, "TR Template", true);

        assert_eq!(system.excel_launches.lock().unwrap().len(), 1);
        assert_eq!(system.macro_runs(), 0);
        assert!(system.notices.lock().unwrap().is_empty());
    }

    #[test]
    fn open_only_failure_names_the_button() {
        let system = MockSystem::new();
        open_workbook_only(&system, Path::new("/nowhere/TR_template.xlsm"), "TR Template", true);

        let notices = system.notices.lock().unwrap();
        assert!(notices[0].body.starts_with("Failed to open TR Template:\n"));
        assert!(notices[0].body.contains("Workbook not found"));
    }

    #[test]
    fn script_launches_and_runs_exactly_once() {
        let script = AUTOMATION_SCRIPT;
        assert!(script.starts_with("param("));
        assert_eq!(script.matches("New-Object -ComObject Excel.Application").count(), 1);
        assert_eq!(script.matches("$excel.Run(").count(), 1);
        assert!(!script.contains("Quit()"));
        assert!(!script.contains(".Close("));

        // visibility is applied after the macro
        let run_at = script.find("$excel.Run(").unwrap();
        let visible_at = script.find("$excel.Visible = $true").unwrap();
        assert!(run_at < visible_at);
    }

    #[test]
    fn script_is_ascii_whatever_the_code_page() {
        assert!(AUTOMATION_SCRIPT.is_ascii());
    }

    #[test]
    fn unicode_path_travels_as_its_own_argument() {
        let job = MacroJob {
            workbook: PathBuf::from("C:\\Users\\O\u{2019}Brien\\Résumés\\Resources\\Files\\VGRF_Macro.xlsm"),
            macro_name: Some("VGRF_Macro.xlsm!Merge_VGRF".to_string()),
            visible: true,
        };
        let args = automation_args(&job);
        assert_eq!(
            args,
            vec![
                OsString::from("-Workbook"),
                job.workbook.clone().into_os_string(),
                OsString::from("-Macro"),
                OsString::from("VGRF_Macro.xlsm!Merge_VGRF"),
                OsString::from("-Visible"),
            ]
        );
        assert!(!AUTOMATION_SCRIPT.contains("O\u{2019}Brien"));
    }

    #[test]
    fn open_only_hidden_passes_neither_macro_nor_visible() {
        let job = MacroJob { workbook: workbook(), macro_name: None, visible: false };
        let args = automation_args(&job);
        assert_eq!(args, vec![OsString::from("-Workbook"), workbook().into_os_string()]);
    }

    proptest! {
        #[test]
        fn any_workbook_path_is_passed_verbatim(name in "\\PC{1,40}") {
            let workbook = PathBuf::from(format!("C:\\Data\\{}.xlsm", name));
            let job = MacroJob { workbook: workbook.clone(), macro_name: None, visible: true };
            let args = automation_args(&job);
            prop_assert_eq!(args[1].as_os_str(), workbook.as_os_str());
            prop_assert_eq!(args.len(), 3);
        }
    }
}
