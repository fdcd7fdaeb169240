//! reachgen CLI - reachability policy from the observed service topology.
//!
//! Queries TSB for the service topology over a time window and prints an
//! Istio `Sidecar` per source namespace for `DIRECT` mode traffic groups,
//! or the merged TSB `TrafficSetting` for every other traffic group.

use anyhow::Result;
use clap::Parser;
use reach_core::DIAGNOSTIC_TARGET;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "reachgen")]
#[command(
    about = "Create Istio Sidecar or TSB TrafficSetting reachability based on the service topology"
)]
#[command(version)]
struct Cli {
    /// Address of the TSB API server, e.g. some.tsb.address.example.com
    #[arg(short, long, env = "TSB_SERVER", default_value = "")]
    server: String,

    /// Username to call TSB with via HTTP Basic Auth
    #[arg(short = 'u', long = "http-auth-user", env = "TSB_USERNAME", default_value = "")]
    username: String,

    /// Password to call TSB with via HTTP Basic Auth
    #[arg(
        short = 'p',
        long = "http-auth-password",
        env = "TSB_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    password: String,

    /// TSB org to query against
    #[arg(long, default_value = reach_client::config::DEFAULT_ORG)]
    org: String,

    /// Start of the time range to query the topology in YYYY-MM-DD format [default: 5 days ago]
    #[arg(long)]
    start: Option<String>,

    /// End of the time range to query the topology in YYYY-MM-DD format [default: today]
    #[arg(long)]
    end: Option<String>,

    /// Skip certificate verification when calling TSB
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Dump the fetched topology and services in debug logs
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    verbose: bool,

    /// Disable verbose output; overrides --verbose
    #[arg(long)]
    noverbose: bool,

    /// Output format (yaml or json)
    #[arg(short, long, default_value = "yaml")]
    format: String,

    /// Write the documents to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries policy documents
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(with_diagnostics(filter)?)
        .with_writer(std::io::stderr)
        .init();

    let args = commands::generate::Args {
        server: cli.server,
        username: cli.username,
        password: cli.password,
        org: cli.org,
        start: cli.start,
        end: cli.end,
        insecure: cli.insecure,
        timeout_seconds: cli.timeout,
        verbose: cli.verbose && !cli.noverbose,
        format: cli.format,
        output: cli.output,
    };
    commands::generate::run(args).await
}

/// Keeps user-facing diagnostics visible whatever level the filter sets.
fn with_diagnostics(filter: EnvFilter) -> Result<EnvFilter> {
    Ok(filter.add_directive(format!("{DIAGNOSTIC_TARGET}=warn").parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_stay_enabled_under_error_filter() {
        let filter = with_diagnostics(EnvFilter::new("error")).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("reachgen::diagnostic=warn"));
        assert!(rendered.contains("error"));
    }

    #[test]
    fn cli_parses_connection_flags() {
        let cli = Cli::try_parse_from([
            "reachgen",
            "--server",
            "tsb.example.com",
            "-u",
            "admin",
            "-p",
            "secret",
            "--noverbose",
        ])
        .unwrap();
        assert_eq!(cli.server, "tsb.example.com");
        assert_eq!(cli.username, "admin");
        assert!(cli.verbose && cli.noverbose);
        assert_eq!(cli.format, "yaml");
    }
}
