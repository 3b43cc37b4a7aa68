//! Command-line front end for hours-engine.
//!
//! Usage:
//!   hours parse [DESCRIPTION] [--marker `<M>`]        - Weekly hours of a venue description as JSON
//!   hours extract [TEXT]                             - Weekly hours of a bare hours phrase as JSON
//!   hours tokens [TEXT]                              - Token stream of a phrase as JSON
//!   hours check [DESCRIPTION] [--at `<RFC3339>`] [--timezone `<IANA>`] - open / closed / unknown
//!
//! When the text argument is omitted it is read from stdin.

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use hours_engine::{
    extract_intervals, local_instant, open_status_with_options, parse_weekly_hours_with_options,
    tokenize, ParseOptions, DEFAULT_OPEN_MARKER,
};

#[derive(Parser)]
#[command(name = "hours", version, about = "Extract weekly opening hours from venue descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the hours sentence of a venue description
    Parse {
        /// Venue description (reads stdin if omitted)
        description: Option<String>,

        /// Text that opens the hours sentence
        #[arg(long, default_value = DEFAULT_OPEN_MARKER)]
        marker: String,
    },
    /// Parse a bare hours phrase such as "Mon-Fri 8am-5pm"
    Extract {
        /// Hours phrase (reads stdin if omitted)
        text: Option<String>,
    },
    /// Show the tokens recognized in a phrase
    Tokens {
        /// Phrase to tokenize (reads stdin if omitted)
        text: Option<String>,
    },
    /// Report whether a venue is open at an instant
    Check {
        /// Venue description (reads stdin if omitted)
        description: Option<String>,

        /// RFC 3339 instant to check (defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// IANA timezone whose calendar the venue keeps
        #[arg(long, default_value = "UTC")]
        timezone: String,

        /// Text that opens the hours sentence
        #[arg(long, default_value = DEFAULT_OPEN_MARKER)]
        marker: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            description,
            marker,
        } => {
            let description = text_or_stdin(description)?;
            let options = ParseOptions {
                open_marker: marker,
            };
            let hours = parse_weekly_hours_with_options(&description, &options)
                .context("Failed to parse opening hours")?;
            print_json(&hours)
        }
        Command::Extract { text } => {
            let text = text_or_stdin(text)?;
            let hours = extract_intervals(&text).context("Failed to extract opening hours")?;
            print_json(&hours)
        }
        Command::Tokens { text } => {
            let text = text_or_stdin(text)?;
            print_json(&tokenize(&text))
        }
        Command::Check {
            description,
            at,
            timezone,
            marker,
        } => {
            let description = text_or_stdin(description)?;
            let at = at.unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
            let instant = local_instant(&at, &timezone).context("Invalid --at or --timezone")?;
            tracing::debug!(local = %instant.format("%a %H:%M"), "checking hours");

            let options = ParseOptions {
                open_marker: marker,
            };
            println!("{}", open_status_with_options(&description, &instant, &options));
            Ok(())
        }
    }
}

/// The positional text, or all of stdin when it was omitted.
fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
