//! `sgs` command-line entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — endpoint, token, and timeout from flags, with
//!    environment-variable fallbacks.
//! 2. **Wire observability** — install a `tracing-subscriber` (text or JSON)
//!    writing to stderr. All spans and events from the workspace crates flow
//!    through it.
//! 3. **Construct infrastructure** — build an [`http_client::HttpBaseClient`]
//!    and inject it into a [`replication::ReplicationManager`].
//! 4. **Dispatch** — run the selected subcommand and print its JSON result on
//!    stdout.

mod commands;
mod observability;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::debug;

use http_client::{HttpBaseClient, HttpClientConfig};
use replication::ReplicationManager;

use crate::commands::Command;
use crate::observability::LogFormat;

/// Storage-replication service client.
#[derive(Parser, Debug)]
#[command(name = "sgs")]
#[command(version, about = "Manage volume replications on the replication service")]
pub struct Args {
    /// Versioned service endpoint, e.g. http://sgs.example.com:8975/v1/<project>
    #[arg(long, env = "SGS_ENDPOINT")]
    pub endpoint: String,

    /// Pre-issued token sent as X-Auth-Token
    #[arg(long, env = "SGS_AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SGS_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Log output format
    #[arg(long, default_value = "text", value_enum)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = observability::init_tracing(args.log_format) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config =
        HttpClientConfig::new(args.endpoint).with_timeout(Duration::from_secs(args.timeout));
    if let Some(token) = args.token {
        config = config.with_auth_token(token);
    }
    debug!(?config, "building HTTP client");

    let client = HttpBaseClient::new(config)?;
    let manager = ReplicationManager::new(Arc::new(client));

    if let Some(output) = commands::execute(&manager, args.command).await? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn global_flags_and_defaults() {
        let args = parse(&[
            "sgs",
            "--endpoint",
            "http://localhost:8975/v1/demo",
            "replication-show",
            "r1",
        ]);
        assert_eq!(args.endpoint, "http://localhost:8975/v1/demo");
        assert_eq!(args.timeout, 30);
        assert_eq!(args.log_format, LogFormat::Text);
        match args.command {
            Command::ReplicationShow {
                replication,
                session_id,
            } => {
                assert_eq!(replication.as_str(), "r1");
                assert!(session_id.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn failover_force_flag() {
        let args = parse(&[
            "sgs",
            "--endpoint",
            "http://h/v1",
            "replication-failover",
            "r2",
            "--force",
        ]);
        assert!(matches!(
            args.command,
            Command::ReplicationFailover { force: true, .. }
        ));
    }

    #[test]
    fn list_collects_repeated_search_filters() {
        let args = parse(&[
            "sgs",
            "--endpoint",
            "http://h/v1",
            "replication-list",
            "--search",
            "status=enabled",
            "--search",
            "name=nightly",
            "--limit",
            "10",
        ]);
        match args.command {
            Command::ReplicationList {
                search_opts, limit, ..
            } => {
                assert_eq!(
                    search_opts,
                    vec![
                        ("status".to_string(), "enabled".to_string()),
                        ("name".to_string(), "nightly".to_string()),
                    ]
                );
                assert_eq!(limit, Some(10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn reset_state_requires_a_state() {
        let result = Args::try_parse_from([
            "sgs",
            "--endpoint",
            "http://h/v1",
            "replication-reset-state",
            "r1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_replication_id_is_rejected() {
        let result = Args::try_parse_from([
            "sgs",
            "--endpoint",
            "http://h/v1",
            "replication-delete",
            "",
        ]);
        assert!(result.is_err());
    }
}
