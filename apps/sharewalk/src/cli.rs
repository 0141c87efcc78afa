//! Command-line interface.
//!
//! Settings resolve as flag, then environment variable, then default. Every
//! subcommand except `probe` probes the share before walking it, so bad credentials
//! fail fast instead of surfacing as a pile of skipped directories.

use crate::config::{DEFAULT_TIMEOUT_SECS, ShareConfig};
use crate::inventory::{DirectoryLister, InventoryError, NamePattern, ProbeOutcome, RemoteEntry, ShareWalker};
use crate::network::SmbClientLister;
use crate::report;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;

/// Pattern `report` searches for when none is given.
pub const DEFAULT_REPORT_PATTERN: &str = r".*\.txt$";

/// Recursive inventory of an SMB share.
#[derive(Parser, Debug)]
#[command(name = "sharewalk")]
#[command(about = "List, filter, and search every file and folder on an SMB share")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub share: ShareArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the share is and how to log in.
#[derive(Args, Debug, Default)]
pub struct ShareArgs {
    /// Share address, like smb://server/share/.
    #[arg(long, global = true, env = "SHAREWALK_SERVER", value_name = "URL")]
    pub server: Option<String>,

    /// Domain or workgroup.
    #[arg(long, global = true, env = "SHAREWALK_DOMAIN")]
    pub domain: Option<String>,

    /// Username. Leave out, together with the password, for guest access.
    #[arg(long, global = true, env = "SHAREWALK_USERNAME")]
    pub username: Option<String>,

    /// Password. Prefer the environment variable over the flag.
    #[arg(long, global = true, env = "SHAREWALK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seconds to wait for each listing.
    #[arg(long, global = true, env = "SHAREWALK_TIMEOUT_SECS", value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ShareArgs {
    pub fn to_config(&self) -> Result<ShareConfig, InventoryError> {
        let server = self.server.as_deref().filter(|s| !s.trim().is_empty()).ok_or_else(|| {
            InventoryError::InvalidConfig("No server address; pass --server or set SHAREWALK_SERVER".to_string())
        })?;
        Ok(ShareConfig::new(
            server,
            self.domain.as_deref(),
            self.username.as_deref(),
            self.password.as_deref(),
        )?
        .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the share is reachable and the credentials work.
    Probe,

    /// Walk the share and print what was found.
    List(ListArgs),

    /// Print everything, files only, directories only, and a name search.
    Report(ReportArgs),
}

/// Arguments for the `list` command.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Start below the share root, like `docs/2024`.
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Show files only.
    #[arg(long, conflicts_with = "dirs_only")]
    pub files_only: bool,

    /// Show directories only.
    #[arg(long)]
    pub dirs_only: bool,

    /// Show files whose whole name matches this regular expression.
    #[arg(long, value_name = "REGEX", conflicts_with = "dirs_only")]
    pub search: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `report` command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Regular expression for the search section.
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_REPORT_PATTERN)]
    pub search: String,
}

/// Why a command failed.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}: {}", .0.category(), .0.user_message())]
    Inventory(#[from] InventoryError),
    #[error("Couldn't write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// 2 for bad input (configuration or pattern), 1 for anything that went wrong
    /// talking to the share.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Inventory(InventoryError::InvalidConfig(_) | InventoryError::PatternSyntaxError(_)) => 2,
            Self::Inventory(_) | Self::Output(_) => 1,
        }
    }
}

/// Resolves the configuration and runs the command against the real share.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let config = cli.share.to_config()?;
    info!(
        "sharewalk: {} as {}",
        config.server_address(),
        if config.is_guest() { "guest" } else { "user" }
    );
    let walker = ShareWalker::new(SmbClientLister::new(config.clone()), config.server_address());
    execute(&cli.command, &walker, out)
}

/// Runs a command with any lister.
pub fn execute<L: DirectoryLister>(command: &Command, walker: &ShareWalker<L>, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Probe => {
            let (address, child_count) = ensure_connected(walker)?;
            writeln!(out, "Successfully connected to {address} ({child_count} items at the root)")?;
            Ok(())
        }
        Command::List(args) => list(args, walker, out),
        Command::Report(args) => full_report(args, walker, out),
    }
}

fn ensure_connected<L: DirectoryLister>(walker: &ShareWalker<L>) -> Result<(String, usize), InventoryError> {
    match walker.probe() {
        ProbeOutcome::Connected { address, child_count } => Ok((address, child_count)),
        ProbeOutcome::Failed(err) => Err(err),
    }
}

fn list<L: DirectoryLister>(args: &ListArgs, walker: &ShareWalker<L>, out: &mut impl Write) -> Result<(), CliError> {
    // Compile before touching the network so a typo fails immediately.
    let pattern = args.search.as_deref().map(NamePattern::new).transpose()?;
    ensure_connected(walker)?;

    let traversal = match args.path.as_deref() {
        Some(path) => walker.traverse_from_path(path)?,
        None => walker.traverse_from_root()?,
    };

    let (title, entries): (&str, Vec<&RemoteEntry>) = if let Some(pattern) = &pattern {
        ("Search Results", pattern.filter(traversal.entries()))
    } else if args.files_only {
        ("Files", traversal.files())
    } else if args.dirs_only {
        ("Directories", traversal.directories())
    } else {
        ("File Listing", traversal.entries().iter().collect())
    };

    if args.json {
        report::render_json(out, &traversal, &entries)?;
    } else {
        report::render_table(out, title, &entries)?;
        report::render_skipped(out, traversal.skipped())?;
        report::render_cancelled(out, &traversal)?;
    }
    Ok(())
}

fn full_report<L: DirectoryLister>(args: &ReportArgs, walker: &ShareWalker<L>, out: &mut impl Write) -> Result<(), CliError> {
    let pattern = NamePattern::new(&args.search)?;
    ensure_connected(walker)?;

    let traversal = walker.traverse_from_root()?;
    let all: Vec<&RemoteEntry> = traversal.entries().iter().collect();

    report::render_table(out, "All files and directories", &all)?;
    report::render_table(out, "Files only", &traversal.files())?;
    report::render_table(out, "Directories only", &traversal.directories())?;
    report::render_table(out, &format!("Search: {}", pattern.as_str()), &pattern.filter(traversal.entries()))?;
    report::render_skipped(out, traversal.skipped())?;
    report::render_cancelled(out, &traversal)?;
    Ok(())
}
