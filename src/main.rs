//! `boardcheck`: validate the built-in board profiles.
//!
//! ```text
//! USAGE:
//!   boardcheck                        Validate every profile
//!   boardcheck --board FEZ-Cerbuino   Validate one profile
//!   boardcheck --config strict.json   Use resolver policies from a file
//!   boardcheck --json                 Print JSON instead of text
//! ```
//!
//! Exits non-zero if any profile fails validation.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use pinmap::boards::{self, BoardProfile};
use pinmap::{validate, BoardReport, ResolverConfig};

#[derive(Parser)]
#[command(name = "boardcheck", about = "Validate built-in board pin maps", version)]
struct Cli {
    /// Only check the named profile.
    #[arg(long)]
    board: Option<String>,
    /// Resolver policies as JSON (defaults apply to missing fields).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit a JSON array of reports.
    #[arg(long)]
    json: bool,
    /// Shorthand for the strictest policies; ignored with --config.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let profiles: Vec<&BoardProfile> = match &cli.board {
        Some(name) => vec![boards::profile(name)?],
        None => boards::PROFILES.iter().collect(),
    };

    let mut reports = Vec::with_capacity(profiles.len());
    for profile in profiles {
        reports.push(check(profile, &config)?);
    }
    let failed = reports.iter().filter(|r| !r.is_valid()).count();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for r in &reports {
            print!("{r}");
        }
        println!("{} of {} profiles valid", reports.len() - failed, reports.len());
    }

    info!("boardcheck finished: {failed} failure(s)");
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ResolverConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None if cli.strict => Ok(ResolverConfig::strict()),
        None => Ok(ResolverConfig::default()),
    }
}

/// Validation failures become reports; anything else aborts the run.
fn check(profile: &BoardProfile, config: &ResolverConfig) -> Result<BoardReport> {
    let (chip, layer) = profile.build()?;
    Ok(match validate(&layer, &chip, config) {
        Ok(board) => BoardReport::valid(&board),
        Err(errors) => BoardReport::invalid(profile.name, chip.name(), &errors),
    })
}
