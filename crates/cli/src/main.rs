//! Console front-end for the archive installer.
//!
//! Invoked with an archive path it installs it under the configured
//! destination root, showing a progress bar and a completion line. Invoked
//! without one it manages the stored settings.

mod config;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use installer::{InstallObserver, InstallStatus, Installer, Notification, Outcome};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{self, Command};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "zipinstall")]
#[command(version, about = "Install archives into per-archive folders", long_about = None)]
struct Cli {
    /// Archive file to install; omit to show the current settings
    archive: Option<PathBuf>,

    /// Destination root for this run only (overrides the stored setting)
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Persist a new destination root and exit
    #[arg(long, value_name = "PATH")]
    set_dest: Option<PathBuf>,

    /// Replace an existing destination without asking
    #[arg(short, long)]
    yes: bool,

    /// Open the destination folder after a successful install
    #[arg(long)]
    open: bool,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    if let Some(root) = cli.set_dest {
        let mut settings = config::Settings::load()?;
        settings.destination_root = Some(root.clone());
        settings.save()?;
        println!("Destination root set to {}", root.display());
        return Ok(0);
    }

    let Some(archive) = cli.archive else {
        // Settings mode
        match config::Settings::load()?.destination_root {
            Some(root) => println!("Destination root: {}", root.display()),
            None => println!("Destination root is not set. Use --set-dest <PATH> to configure it."),
        }
        return Ok(0);
    };

    let root = match cli.dest {
        Some(root) => root,
        None => config::Settings::load()?
            .destination_root
            .ok_or(installer::InstallError::MissingDestinationRoot)?,
    };

    let mut installer = Installer::new(root);
    installer.subscribe(Arc::new(ConsoleObserver::new()));

    if cli.yes {
        installer.confirm_replace_with(|_| true);
    } else {
        installer.confirm_replace_with(prompt_replace);
    }

    match installer.run(&archive)? {
        InstallStatus::Relaunched => {
            println!("Continuing in an elevated process.");
            Ok(0)
        }
        InstallStatus::Finished(Outcome::Success { destination }) => {
            if cli.open {
                open_destination(&destination);
            }
            Ok(0)
        }
        InstallStatus::Finished(Outcome::Cancelled) => Ok(0),
        InstallStatus::Finished(Outcome::Failed { .. }) => Ok(1),
    }
}

/// Progress bar observer fed from the extraction worker.
struct ConsoleObserver {
    bar: ProgressBar,
}

impl ConsoleObserver {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {wide_msg}")
                .expect("valid progress template"),
        );
        Self { bar }
    }
}

impl InstallObserver for ConsoleObserver {
    fn on_progress(&self, percent: u8, message: &str) {
        self.bar.set_position(u64::from(percent));
        self.bar.set_message(message.to_owned());
    }

    fn on_notification(&self, notice: &Notification) {
        self.bar.finish_and_clear();
        println!("{}: {}", notice.title, notice.body);
    }
}

/// Ask on the terminal before replacing an existing install.
fn prompt_replace(path: &Path) -> bool {
    eprint!(
        "Destination {} already exists and is not empty. Replace it? [y/N] ",
        path.display()
    );
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "YES")
}

/// Show the install folder in the platform file browser; failure to open is
/// not an install failure.
fn open_destination(path: &Path) {
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let opener = "xdg-open";

    if let Err(e) = Command::new(opener).arg(path).spawn() {
        tracing::warn!(error = %e, "could not open destination folder");
    }
}
