//! `recognize`: find dates, times, durations and periods in text and print
//! their resolutions as JSON.
//!
//! Usage:
//!   recognize "see you tomorrow at 5pm"
//!   echo "revenue for Q1 2023" | recognize --reference 2024-06-15 --pretty
//!   recognize --timezone Europe/Paris "tonight"
//!
//! Logs go to stderr (`RUST_LOG=timex_recognizer=debug` shows which strategy
//! matched); stdout only ever carries JSON.

use std::io::Read;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use timex_recognizer::{parse_reference, DateTimeOptions, ModelCache, DEFAULT_CULTURE};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "recognize",
    version,
    about = "Extract dates, times, durations and periods from text as TIMEX JSON"
)]
struct Cli {
    /// Text to scan. Read from stdin when omitted.
    text: Vec<String>,

    /// Reference datetime for relative expressions, e.g. 2024-06-15T09:00:00
    #[arg(long, short)]
    reference: Option<String>,

    /// IANA timezone used for "now" when no reference is given
    #[arg(long, short = 'z')]
    timezone: Option<String>,

    /// Culture name
    #[arg(long, short, default_value = DEFAULT_CULTURE)]
    culture: String,

    /// Use the default culture when the requested one is not supported
    #[arg(long)]
    fallback: bool,

    /// Keep "May 1 to May 7" as two separate dates
    #[arg(long)]
    no_merge: bool,

    /// Pretty-print the JSON output
    #[arg(long, short)]
    pretty: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let reference = reference(&cli)?;
    let text = input(&cli)?;
    let options = if cli.no_merge {
        DateTimeOptions::SKIP_FROM_TO_MERGE
    } else {
        DateTimeOptions::NONE
    };

    let cache = ModelCache::new();
    let model = cache
        .get(&cli.culture, options, cli.fallback)
        .with_context(|| format!("failed to load culture `{}`", cli.culture))?;
    let results = model.parse(&text, reference);
    debug!(count = results.len(), %reference, "recognized");

    let json = if cli.pretty {
        serde_json::to_string_pretty(&results)
    } else {
        serde_json::to_string(&results)
    }
    .context("failed to serialize results")?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `--reference` if given, otherwise the wall clock in `--timezone` (or the
/// system zone).
fn reference(cli: &Cli) -> Result<NaiveDateTime> {
    if let Some(text) = &cli.reference {
        return parse_reference(text).with_context(|| format!("invalid --reference `{text}`"));
    }
    match &cli.timezone {
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|e| anyhow!("invalid --timezone `{name}`: {e}"))?;
            Ok(Utc::now().with_timezone(&tz).naive_local())
        }
        None => Ok(Local::now().naive_local()),
    }
}

fn input(cli: &Cli) -> Result<String> {
    if !cli.text.is_empty() {
        return Ok(cli.text.join(" "));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    Ok(text)
}
