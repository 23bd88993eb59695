use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mailprobe_lib::ConfigFile;

/// Used when neither `--blacklist` nor the config file names a list.
pub const DEFAULT_BLACKLIST: &str = "domains_blacklist.txt";

#[derive(Parser)]
#[command(name = "mailprobe-cli", version, about = "Probe email deliverability without sending mail")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// stop after MX resolution, do not contact mail servers
    #[arg(long)]
    pub no_smtp: bool,

    /// blacklist file, one domain per line
    #[arg(long)]
    pub blacklist: Option<PathBuf>,

    /// TOML config with [dns], [smtp] and [policy] sections
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// worker threads for batch validation
    #[arg(long)]
    pub jobs: Option<usize>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// write report to file (JSON/NDJSON/CSV depending on --format)
    #[arg(long)]
    pub out: Option<String>,

    /// debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    Validate {
        email: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    /// `--no-smtp` wins over `smtp.enabled` in the config file.
    pub fn smtp_enabled(&self, config: &ConfigFile) -> bool {
        !self.no_smtp && config.smtp_enabled().unwrap_or(true)
    }

    pub fn blacklist_path<'a>(&'a self, config: &'a ConfigFile) -> &'a Path {
        self.blacklist
            .as_deref()
            .or(config.blacklist_path())
            .unwrap_or(Path::new(DEFAULT_BLACKLIST))
    }
}
