#[path = "mailprobe-cli/args.rs"]
mod args;
#[path = "mailprobe-cli/output.rs"]
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use mailprobe_lib::{Blacklist, ConfigFile, DomainPolicy, PolicyError, Validator};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands};
use crate::output::OutputRow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let emails = if cli.stdin {
        read_stdin()?
    } else if let Some(Commands::Validate { email }) = &cli.cmd {
        vec![email.clone()]
    } else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ConfigFile::default(),
    };

    let policy = DomainPolicy::new(load_blacklist(&cli, &config)?);
    let validator =
        Validator::with_options(policy, &config.resolver_options(), config.probe_options());
    let enable_smtp_probe = cli.smtp_enabled(&config);

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = cli.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool.build().context("build worker pool")?;
    let results = pool.install(|| validator.validate_all(&emails, enable_smtp_probe));

    let rows: Vec<OutputRow> = emails
        .iter()
        .zip(results)
        .map(|(email, result)| OutputRow::new(email, result))
        .collect();
    output::write_reports(&rows, &cli)?;

    // exit codes: 0 ok, 2 some address failed, 1 fatal
    if output::any_failed(&rows) {
        std::process::exit(2);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_stdin() -> Result<Vec<String>> {
    let mut emails = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("read stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            emails.push(trimmed.to_string());
        }
    }
    Ok(emails)
}

/// A missing list is not fatal: validation continues with an empty blacklist.
fn load_blacklist(cli: &Cli, config: &ConfigFile) -> Result<Blacklist> {
    let path = cli.blacklist_path(config);
    match Blacklist::load(path) {
        Ok(list) => {
            tracing::info!(path = %path.display(), entries = list.len(), "blacklist loaded");
            Ok(list)
        }
        Err(PolicyError::MissingFile { .. }) => {
            tracing::warn!(path = %path.display(), "blacklist file not found, continuing without one");
            Ok(Blacklist::default())
        }
        Err(err) => Err(err).with_context(|| format!("load blacklist {}", path.display())),
    }
}
