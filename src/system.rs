use std::path::Path;
use std::process::Command;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use crate::excel::{self, MacroJob};
use crate::report::{Notice, NoticeLevel};

/// Abstraction for everything that leaves the process (file system, shell,
/// Excel, dialogs). This lets the dispatch layer be tested without launching
/// anything.
pub trait SystemOps {
    /// Check if a file exists on the file system.
    fn path_exists(&self, path: &Path) -> bool;

    /// Hand `path` to the OS default handler. Returns once the handler has
    /// been asked; never waits for the viewer to exit.
    fn shell_open(&self, path: &Path) -> Result<()>;

    /// Start a fresh Excel instance and carry out `job` in it.
    ///
    /// Blocks until Excel has run the macro (or failed to).
    fn launch_excel(&self, job: &MacroJob) -> Result<()>;

    /// Show a modal message to the user.
    fn notify(&self, notice: &Notice);
}

/// The real desktop implementation.
pub struct DesktopSystem {
    /// PowerShell executable used to drive Excel's COM automation.
    pub powershell: String,
    /// Use native message boxes (Windows only) instead of console frames.
    pub native_dialogs: bool,
}

impl SystemOps for DesktopSystem {
    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn shell_open(&self, path: &Path) -> Result<()> {
        debug!("Opening {:?} with the default handler", path);
        default_open(path)
    }

    fn launch_excel(&self, job: &MacroJob) -> Result<()> {
        use std::io::Write;

        // Job data goes in as script parameters, never into the script text.
        let mut script_file = tempfile::Builder::new()
            .prefix("gdm-toolbox-")
            .suffix(".ps1")
            .tempfile()
            .context("Failed to create automation script")?;
        script_file
            .write_all(excel::AUTOMATION_SCRIPT.as_bytes())
            .context("Failed to write automation script")?;
        let script_path = script_file.into_temp_path();

        info!("Starting Excel for {:?} via {}", job.workbook, self.powershell);

        let mut cmd = Command::new(&self.powershell);
        cmd.arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-ExecutionPolicy")
            .arg("Bypass")
            .arg("-File")
            .arg(&*script_path)
            .args(excel::automation_args(job));

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            // CREATE_NO_WINDOW: no console flash behind the launcher.
            cmd.creation_flags(0x0800_0000);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to start {}", self.powershell))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let cause = stderr.trim();
            if cause.is_empty() {
                bail!("Excel automation exited with {}", output.status);
            }
            bail!("{}", cause);
        }
        Ok(())
    }

    fn notify(&self, notice: &Notice) {
        if self.native_dialogs && message_box(notice) {
            return;
        }
        print_notice(notice);
    }
}

#[cfg(windows)]
fn default_open(path: &Path) -> Result<()> {
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
    use windows::core::{PCWSTR, w};

    let file: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();

    let result = unsafe {
        ShellExecuteW(
            None,
            w!("open"),
            PCWSTR(file.as_ptr()),
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    // ShellExecute returns an HINSTANCE > 32 on success; smaller values are
    // error codes (SE_ERR_NOASSOC = 31 when no viewer is registered).
    let code = result.0 as isize;
    if code <= 32 {
        bail!("ShellExecute failed with code {}", code);
    }
    Ok(())
}

#[cfg(not(windows))]
fn default_open(path: &Path) -> Result<()> {
    open::that_detached(path).with_context(|| format!("No default handler could open {:?}", path))
}

#[cfg(windows)]
fn message_box(notice: &Notice) -> bool {
    use windows::Win32::UI::WindowsAndMessaging::{MB_ICONERROR, MB_ICONINFORMATION, MB_OK, MessageBoxW};
    use windows::core::PCWSTR;

    let text: Vec<u16> = notice.body.encode_utf16().chain(Some(0)).collect();
    let caption: Vec<u16> = notice.title.encode_utf16().chain(Some(0)).collect();
    let icon = match notice.level {
        NoticeLevel::Info => MB_ICONINFORMATION,
        NoticeLevel::Error => MB_ICONERROR,
    };

    unsafe {
        MessageBoxW(None, PCWSTR(text.as_ptr()), PCWSTR(caption.as_ptr()), MB_OK | icon);
    }
    true
}

#[cfg(not(windows))]
fn message_box(_notice: &Notice) -> bool {
    false
}

/// Console rendition of a modal message.
fn print_notice(notice: &Notice) {
    let marker = match notice.level {
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Error => "✕",
    };
    eprintln!();
    eprintln!("┌─ {} {} ───────────────────────────", marker, notice.title);
    for line in notice.body.lines() {
        eprintln!("│ {}", line);
    }
    eprintln!("└───────────────────────────────────────");
}

/// A Mock System for Testing.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSystem {
    /// Files that "exist".
    pub files: std::sync::Mutex<Vec<std::path::PathBuf>>,
    /// Every path handed to the default handler.
    pub opened: std::sync::Mutex<Vec<std::path::PathBuf>>,
    /// Every Excel instance started, one entry per launch.
    pub excel_launches: std::sync::Mutex<Vec<MacroJob>>,
    /// Every notice shown.
    pub notices: std::sync::Mutex<Vec<Notice>>,
    /// When set, `shell_open` fails with this cause.
    pub open_error: std::sync::Mutex<Option<String>>,
    /// When set, running a macro fails with this cause.
    pub macro_error: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl MockSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: &[std::path::PathBuf]) -> Self {
        Self {
            files: std::sync::Mutex::new(files.to_vec()),
            ..Default::default()
        }
    }

    /// Number of macros Excel was asked to run.
    pub fn macro_runs(&self) -> usize {
        self.excel_launches
            .lock()
            .unwrap()
            .iter()
            .filter(|job| job.macro_name.is_some())
            .count()
    }
}

#[cfg(test)]
impl SystemOps for MockSystem {
    fn path_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().iter().any(|f| f == path)
    }

    fn shell_open(&self, path: &Path) -> Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        match self.open_error.lock().unwrap().as_ref() {
            Some(cause) => bail!("{}", cause),
            None => Ok(()),
        }
    }

    fn launch_excel(&self, job: &MacroJob) -> Result<()> {
        self.excel_launches.lock().unwrap().push(job.clone());
        if !self.path_exists(&job.workbook) {
            bail!("Workbook not found: {}", job.workbook.display());
        }
        if job.macro_name.is_some() {
            if let Some(cause) = self.macro_error.lock().unwrap().as_ref() {
                bail!("{}", cause);
            }
        }
        Ok(())
    }

    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
