//! Subcommand definitions and dispatch onto [`ReplicationManager`].

use std::collections::BTreeMap;

use anyhow::Context;
use clap::Subcommand;
use serde_json::Value;

use replication::{
    ListOptions, ReplicationId, ReplicationManager, ReplicationUpdate, SessionId, VolumeId,
};

/// One replication operation.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a replication between two volumes.
    ReplicationCreate {
        /// Id of the master volume.
        #[arg(value_parser = parse_volume_id)]
        master_volume: VolumeId,
        /// Id of the slave volume.
        #[arg(value_parser = parse_volume_id)]
        slave_volume: VolumeId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List replications.
    ReplicationList {
        /// Use the detailed listing.
        #[arg(long)]
        detailed: bool,
        /// Server-side filter, repeatable (e.g. `--search status=enabled`).
        #[arg(long = "search", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        search_opts: Vec<(String, String)>,
        /// Begin after the replication with this id.
        #[arg(long)]
        marker: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        /// Deprecated single sort key; ignored when `--sort` is given.
        #[arg(long)]
        sort_key: Option<String>,
        /// Deprecated sort direction (`asc` or `desc`).
        #[arg(long)]
        sort_dir: Option<String>,
        /// Comma-separated `key[:dir]` list.
        #[arg(long)]
        sort: Option<String>,
    },

    /// Update the name and/or description of a replication.
    ReplicationUpdate {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a replication.
    ReplicationDelete {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
    },

    /// Show one replication.
    ReplicationShow {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
        /// Configuration session to read within.
        #[arg(long, value_parser = parse_session_id)]
        session_id: Option<SessionId>,
    },

    /// Enable a replication.
    ReplicationEnable {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
    },

    /// Disable a replication.
    ReplicationDisable {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
    },

    /// Fail a replication over to its slave volume.
    ReplicationFailover {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
        /// Fail over even if the master is still reachable.
        #[arg(long)]
        force: bool,
    },

    /// Swap the master and slave roles of a replication.
    ReplicationReverse {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
    },

    /// Explicitly set the server-side status of a replication.
    ReplicationResetState {
        #[arg(value_parser = parse_replication_id)]
        replication: ReplicationId,
        /// Status to set (e.g. `enabled`, `error`).
        #[arg(long)]
        state: String,
    },
}

/// Runs `command` and returns the JSON document to print, if any.
pub async fn execute(manager: &ReplicationManager, command: Command) -> anyhow::Result<Option<Value>> {
    let output = match command {
        Command::ReplicationCreate {
            master_volume,
            slave_volume,
            name,
            description,
        } => {
            let created = manager
                .create(
                    &master_volume,
                    &slave_volume,
                    name.as_deref(),
                    description.as_deref(),
                )
                .await
                .context("failed to create replication")?;
            Some(serde_json::to_value(created)?)
        }

        Command::ReplicationList {
            detailed,
            search_opts,
            marker,
            limit,
            sort_key,
            sort_dir,
            sort,
        } => {
            let options = ListOptions {
                detailed,
                search_opts: search_opts.into_iter().collect::<BTreeMap<_, _>>(),
                marker,
                limit,
                sort_key,
                sort_dir,
                sort,
            };
            let items = manager
                .list(&options)
                .await
                .context("failed to list replications")?;
            Some(serde_json::to_value(items)?)
        }

        Command::ReplicationUpdate {
            replication,
            name,
            description,
        } => {
            let mut update = ReplicationUpdate::new();
            if let Some(name) = name {
                update = update.name(name);
            }
            if let Some(description) = description {
                update = update.description(description);
            }
            let updated = manager
                .update(&replication, update)
                .await
                .with_context(|| format!("failed to update replication {replication}"))?;
            match updated {
                Some(r) => Some(serde_json::to_value(r)?),
                None => {
                    tracing::info!(%replication, "nothing to update");
                    None
                }
            }
        }

        Command::ReplicationDelete { replication } => {
            manager
                .delete(&replication)
                .await
                .with_context(|| format!("failed to delete replication {replication}"))?;
            None
        }

        Command::ReplicationShow {
            replication,
            session_id,
        } => {
            let found = manager
                .get(&replication, session_id.as_ref())
                .await
                .with_context(|| format!("failed to show replication {replication}"))?;
            Some(serde_json::to_value(found)?)
        }

        Command::ReplicationEnable { replication } => {
            let r = manager
                .enable(&replication)
                .await
                .with_context(|| format!("failed to enable replication {replication}"))?;
            Some(serde_json::to_value(r)?)
        }

        Command::ReplicationDisable { replication } => {
            let r = manager
                .disable(&replication)
                .await
                .with_context(|| format!("failed to disable replication {replication}"))?;
            Some(serde_json::to_value(r)?)
        }

        Command::ReplicationFailover { replication, force } => {
            let r = manager
                .failover(&replication, force)
                .await
                .with_context(|| format!("failed to fail over replication {replication}"))?;
            Some(serde_json::to_value(r)?)
        }

        Command::ReplicationReverse { replication } => {
            let r = manager
                .reverse(&replication)
                .await
                .with_context(|| format!("failed to reverse replication {replication}"))?;
            Some(serde_json::to_value(r)?)
        }

        Command::ReplicationResetState { replication, state } => {
            let r = manager
                .reset_state(&replication, &state)
                .await
                .with_context(|| format!("failed to reset state of replication {replication}"))?;
            Some(serde_json::to_value(r)?)
        }
    };
    Ok(output)
}

fn parse_replication_id(raw: &str) -> Result<ReplicationId, String> {
    ReplicationId::new(raw).ok_or_else(|| "replication id must not be empty".to_string())
}

fn parse_volume_id(raw: &str) -> Result<VolumeId, String> {
    VolumeId::new(raw).ok_or_else(|| "volume id must not be empty".to_string())
}

fn parse_session_id(raw: &str) -> Result<SessionId, String> {
    SessionId::new(raw).ok_or_else(|| "session id must not be empty".to_string())
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_pairs_split_on_the_first_equals() {
        assert_eq!(
            parse_key_value("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value("status=").unwrap(),
            ("status".to_string(), String::new())
        );
        assert!(parse_key_value("=x").is_err());
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn empty_ids_are_rejected() {
        assert!(parse_replication_id("").is_err());
        assert!(parse_volume_id("").is_err());
        assert!(parse_session_id("").is_err());
        assert_eq!(parse_replication_id("r1").unwrap().as_str(), "r1");
    }
}
