//! [`ReplicationManager`]: maps replication operations onto base-client calls.
//!
//! Each method builds exactly one request (URL, body, headers) and forwards it
//! to the injected [`BaseClient`]. Errors are returned unchanged. The only
//! local decision is that an empty [`ReplicationUpdate`] issues no request.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::{
    BaseClient, ClientError, ListOptions, Replication, ReplicationId, ReplicationUpdate,
    RequestHeaders, SessionId, VolumeId,
};

/// Path segment and list response key.
pub const RESOURCE_TYPE: &str = "replications";

/// Key wrapping a single replication in request and response bodies.
pub const RESPONSE_KEY: &str = "replication";

/// Header carrying a configuration session token on `get`.
pub const SESSION_HEADER: &str = "X-Configuration-Session";

/// Typed accessor for replication resources.
#[derive(Clone)]
pub struct ReplicationManager {
    client: Arc<dyn BaseClient>,
}

impl ReplicationManager {
    pub fn new(client: Arc<dyn BaseClient>) -> Self {
        Self { client }
    }

    /// Creates a replication between two volumes.
    ///
    /// `name` and `description` are always present in the body, as `null`
    /// when not given.
    pub async fn create(
        &self,
        master_volume: &VolumeId,
        slave_volume: &VolumeId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Replication, ClientError> {
        debug!(%master_volume, %slave_volume, "creating replication");
        let body = json!({
            RESPONSE_KEY: {
                "name": name,
                "master_volume": master_volume,
                "slave_volume": slave_volume,
                "description": description,
            }
        });
        let url = format!("/{RESOURCE_TYPE}");
        let info = self.client.create(&url, body, RESPONSE_KEY).await?;
        Ok(Replication::from_info(info))
    }

    /// Lists replications in the order the server returns them.
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<Replication>, ClientError> {
        let url = self.client.build_list_url(RESOURCE_TYPE, options)?;
        debug!(%url, "listing replications");
        let items = self.client.list(&url, RESOURCE_TYPE).await?;
        Ok(items.into_iter().map(Replication::from_info).collect())
    }

    /// Updates the fields set in `update`.
    ///
    /// Returns `Ok(None)` without contacting the server when `update` is empty.
    pub async fn update(
        &self,
        replication_id: &ReplicationId,
        update: ReplicationUpdate,
    ) -> Result<Option<Replication>, ClientError> {
        if update.is_empty() {
            debug!(%replication_id, "empty update, no request issued");
            return Ok(None);
        }
        debug!(%replication_id, fields = update.len(), "updating replication");
        let body = json!({ RESPONSE_KEY: update.into_fields() });
        let info = self
            .client
            .update(&resource_url(replication_id), body, RESPONSE_KEY)
            .await?;
        Ok(Some(Replication::from_info(info)))
    }

    pub async fn delete(&self, replication_id: &ReplicationId) -> Result<(), ClientError> {
        debug!(%replication_id, "deleting replication");
        self.client.delete(&resource_url(replication_id)).await
    }

    /// Fetches one replication, optionally inside a configuration session.
    pub async fn get(
        &self,
        replication_id: &ReplicationId,
        session_id: Option<&SessionId>,
    ) -> Result<Replication, ClientError> {
        let mut headers = RequestHeaders::new();
        if let Some(session) = session_id {
            headers.insert(SESSION_HEADER.to_string(), session.as_str().to_string());
        }
        debug!(%replication_id, with_session = session_id.is_some(), "getting replication");
        let info = self
            .client
            .get(&resource_url(replication_id), RESPONSE_KEY, &headers)
            .await?;
        Ok(Replication::from_info(info))
    }

    pub async fn enable(&self, replication_id: &ReplicationId) -> Result<Replication, ClientError> {
        self.action(replication_id, "enable", None).await
    }

    pub async fn disable(&self, replication_id: &ReplicationId) -> Result<Replication, ClientError> {
        self.action(replication_id, "disable", None).await
    }

    /// Fails the replication over to its slave volume.
    pub async fn failover(
        &self,
        replication_id: &ReplicationId,
        force: bool,
    ) -> Result<Replication, ClientError> {
        self.action(replication_id, "failover", Some(json!({ "force": force })))
            .await
    }

    /// Swaps the master and slave roles.
    pub async fn reverse(&self, replication_id: &ReplicationId) -> Result<Replication, ClientError> {
        self.action(replication_id, "reverse", None).await
    }

    /// Forces the server-side status to `state` (administrative recovery).
    pub async fn reset_state(
        &self,
        replication_id: &ReplicationId,
        state: &str,
    ) -> Result<Replication, ClientError> {
        self.action(replication_id, "reset_status", Some(json!({ "status": state })))
            .await
    }

    /// Returns every replication whose attributes match all of `criteria`.
    pub async fn findall(
        &self,
        criteria: &BTreeMap<String, Value>,
    ) -> Result<Vec<Replication>, ClientError> {
        let all = self.list(&ListOptions::new().detailed(true)).await?;
        Ok(all.into_iter().filter(|r| r.matches(criteria)).collect())
    }

    /// Returns the single replication matching `criteria`.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] when nothing matches and
    /// [`ClientError::NoUniqueMatch`] when more than one replication does.
    pub async fn find(&self, criteria: &BTreeMap<String, Value>) -> Result<Replication, ClientError> {
        let mut matches = self.findall(criteria).await?;
        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(ClientError::NotFound(render_criteria(criteria))),
            count => Err(ClientError::NoUniqueMatch {
                criteria: render_criteria(criteria),
                count,
            }),
        }
    }

    async fn action(
        &self,
        replication_id: &ReplicationId,
        action: &str,
        action_data: Option<Value>,
    ) -> Result<Replication, ClientError> {
        debug!(%replication_id, action, "replication action");
        let url = format!("{}/action", resource_url(replication_id));
        let info = self
            .client
            .action(action, &url, action_data, RESPONSE_KEY)
            .await?;
        Ok(Replication::from_info(info))
    }
}

impl std::fmt::Debug for ReplicationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicationManager").finish_non_exhaustive()
    }
}

// The id is a single path segment; `/`, `?` and `#` must not change the route.
fn resource_url(replication_id: &ReplicationId) -> String {
    format!(
        "/{RESOURCE_TYPE}/{}",
        urlencoding::encode(replication_id.as_str())
    )
}

fn render_criteria(criteria: &BTreeMap<String, Value>) -> String {
    criteria
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}
