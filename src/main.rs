//! # GDM ToolBox: The Main Entry Point
//!
//! Parses the command line, initializes logging and configuration, builds the
//! [`app::AppContext`] and either runs the interactive launcher or a single
//! action.
//!
//! Launcher actions never change the exit status: a failed macro or a missing
//! PDF is reported to the user and the process carries on.

use std::fs::OpenOptions;
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use log::{LevelFilter, error, info};
use simplelog::{CombinedLogger, Config, SharedLogger, SimpleLogger, WriteLogger};

mod app;
mod config;
mod console;
mod doctor;
mod excel;
mod invariant_ppt;
mod locator;
mod pages;
mod registry;
mod report;
mod system;
mod viewer;

/// The primary Command Line Interface (CLI) configuration.
#[derive(Parser)]
#[command(name = "gdm-toolbox")]
#[command(about = "Launcher for GDM help documents and Excel macro workbooks", long_about = None)]
struct Cli {
    /// The sub-command to execute. Without one, the interactive launcher opens.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Turn on verbose logging.
    ///
    /// - `-v`: Info
    /// - `-vv`: Debug
    /// - `-vvv`: Trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Read settings from this JSON file instead of the per-user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing `Resources/`. Overrides the config file.
    #[arg(long, global = true)]
    resources: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every button with its help document and workbook.
    List,
    /// Press the main button of a slot (1-10).
    Run {
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        slot: u16,
    },
    /// Open the help document of a slot (1-10).
    Info {
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        slot: u16,
    },
    /// Check the Resources folder for missing or stray files.
    Doctor,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = config::load(cli.config.as_deref());
    let locator = match cli.resources.clone().or(settings.resource_root.clone()) {
        Some(root) => locator::Locator::with_root(root),
        None => locator::Locator::detect(),
    };
    info!("Resources resolved under {:?} ({})", locator.root(), locator.kind());

    let system = system::DesktopSystem {
        powershell: settings.powershell.clone(),
        native_dialogs: settings.native_dialogs,
    };
    let mut ctx = app::AppContext::new(&system, locator, settings.excel_visible);

    match &cli.command {
        None => {
            let stdin = std::io::stdin();
            if let Err(e) = console::run(&mut ctx, stdin.lock(), std::io::stdout()) {
                error!("Launcher stopped: {}", e);
            }
        }
        Some(Commands::List) => print_registry(&ctx),
        Some(Commands::Run { slot }) => {
            let slot = usize::from(*slot) - 1;
            if let app::Outcome::OpenForm(form) = ctx.activate(slot) {
                // A one-shot form still needs the console to fill it in.
                let stdin = std::io::stdin();
                if let Err(e) = console::run_form(&ctx, form, stdin.lock(), std::io::stdout()) {
                    error!("Form aborted: {}", e);
                }
            }
        }
        Some(Commands::Info { slot }) => {
            ctx.activate_help(usize::from(*slot) - 1);
        }
        Some(Commands::Doctor) => {
            let report = doctor::audit(&ctx.locator, &ctx.registry);
            doctor::print(&ctx.locator, &report);
        }
    }
}

/// Terminal output at the verbosity the user asked for, plus a debug log
/// file in the local data directory.
fn init_logging(verbose: u8) {
    let term_level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![SimpleLogger::new(term_level, Config::default())];

    if let Some(dirs) = config::project_dirs() {
        let log_dir = dirs.data_local_dir();
        let file = std::fs::create_dir_all(log_dir)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(log_dir.join("toolbox.log")));
        if let Ok(file) = file {
            loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
        }
    }

    // Logging failure shouldn't crash the startup
    let _ = CombinedLogger::init(loggers);
}

fn print_registry<S: system::SystemOps + ?Sized>(ctx: &app::AppContext<'_, S>) {
    println!();
    println!("{} - {}", app::WINDOW_TITLE, ctx.locator.root().display());
    println!();
    for entry in ctx.registry.entries() {
        let what = match &entry.action {
            registry::Action::RunMacro { macro_name, .. } => format!("runs {}", macro_name),
            registry::Action::OpenWorkbook { workbook } => format!("opens {}", workbook.file_name()),
            registry::Action::LinkGenerator => "opens the Link Generator form".to_string(),
            registry::Action::ComingSoon => "not available yet".to_string(),
        };
        println!("  {:>2}. {:<18} {}", entry.id + 1, entry.label, what);
        println!("      help: {}", ctx.resolve(entry.help).display());
        if let Some(workbook) = entry.action.workbook() {
            println!("      file: {}", ctx.resolve(workbook).display());
        }
    }
    println!();
}
