//! Generate command implementation.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use reach_client::{ClientConfig, TsbClient};
use reach_core::{OutputFormat, Pipeline};
use std::fs;
use std::io::Write;
use tracing::info;
use tsb_model::window::DATE_FORMAT;
use tsb_model::TimeWindow;

/// Days covered by the default window.
const DEFAULT_WINDOW_DAYS: i64 = 5;

/// Raw command line arguments of the generate command.
#[derive(Debug)]
pub struct Args {
    pub server: String,
    pub username: String,
    pub password: String,
    pub org: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub insecure: bool,
    pub timeout_seconds: u64,
    pub verbose: bool,
    pub format: String,
    pub output: Option<String>,
}

/// Runs the generate command.
pub async fn run(args: Args) -> Result<()> {
    // Everything is validated before the first request
    let format: OutputFormat = args.format.parse()?;
    let window = time_window(args.start.as_deref(), args.end.as_deref(), today())?;
    let client = TsbClient::new(ClientConfig {
        server: args.server,
        org: args.org,
        username: args.username,
        password: args.password,
        insecure: args.insecure,
        timeout_seconds: args.timeout_seconds,
    })
    .with_context(|| "Failed to create TSB client")?;

    let objects = Pipeline::new(&client)
        .verbose(args.verbose)
        .run(&window)
        .await?;

    let rendered = reach_core::output::render(&objects, format)
        .with_context(|| "Failed to render policy")?;

    match args.output {
        Some(path) => {
            fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write output file: {path}"))?;
            info!("Wrote {} policy objects to: {}", objects.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .with_context(|| "Failed to write policy to stdout")?;
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolves the query window, defaulting to the last five days up to `today`.
fn time_window(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<TimeWindow> {
    let default_start = (today - Duration::days(DEFAULT_WINDOW_DAYS))
        .format(DATE_FORMAT)
        .to_string();
    let default_end = today.format(DATE_FORMAT).to_string();

    TimeWindow::parse(
        start.unwrap_or(&default_start),
        end.unwrap_or(&default_end),
    )
    .with_context(|| "Invalid topology time range")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn window_defaults_to_last_five_days() {
        let window = time_window(None, None, date("2024-03-10")).unwrap();
        assert_eq!(window.start_str(), "2024-03-05");
        assert_eq!(window.end_str(), "2024-03-10");
    }

    #[test]
    fn explicit_dates_override_defaults() {
        let window = time_window(Some("2024-01-01"), None, date("2024-03-10")).unwrap();
        assert_eq!(window.start, date("2024-01-01"));
        assert_eq!(window.end, date("2024-03-10"));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!(time_window(Some("yesterday"), None, date("2024-03-10")).is_err());
        assert!(time_window(Some("2024-04-01"), None, date("2024-03-10")).is_err());
    }
}
