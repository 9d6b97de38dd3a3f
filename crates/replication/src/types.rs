//! Value types exchanged with the replication service.
//!
//! [`Replication`] is a pass-through container for whatever the server
//! returns. [`ReplicationUpdate`] and [`ListOptions`] describe the inputs of
//! the `update` and `list` operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ReplicationId, VolumeId};

/// A JSON object as returned by the server for a single resource.
pub type ResourceBody = Map<String, Value>;

// ---------------------------------------------------------------------------
// Replication
// ---------------------------------------------------------------------------

/// One replication pairing as reported by the server.
///
/// The client enforces no invariants on the content: every attribute the
/// server returns is kept verbatim and re-serialised unchanged. Typed
/// accessors are provided for the attributes the service commonly returns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Replication {
    info: ResourceBody,
}

impl Replication {
    /// Wraps a server-returned JSON object.
    pub fn from_info(info: ResourceBody) -> Self {
        Self { info }
    }

    /// Returns the raw attribute map.
    pub fn info(&self) -> &ResourceBody {
        &self.info
    }

    /// Consumes the value and returns the raw attribute map.
    pub fn into_info(self) -> ResourceBody {
        self.info
    }

    /// Looks up an arbitrary attribute by name.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.info.get(name)
    }

    pub fn id(&self) -> Option<ReplicationId> {
        self.str_attr("id").and_then(ReplicationId::new)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_attr("name")
    }

    pub fn master_volume(&self) -> Option<VolumeId> {
        self.str_attr("master_volume").and_then(VolumeId::new)
    }

    pub fn slave_volume(&self) -> Option<VolumeId> {
        self.str_attr("slave_volume").and_then(VolumeId::new)
    }

    pub fn description(&self) -> Option<&str> {
        self.str_attr("description")
    }

    /// Server-reported status (e.g. `"enabled"`, `"failed-over"`, `"error"`).
    pub fn status(&self) -> Option<&str> {
        self.str_attr("status")
    }

    /// Returns `true` if every `(key, value)` pair in `criteria` equals the
    /// corresponding attribute of this replication. Comparison is strict JSON
    /// equality: the string `"3"` does not match the number `3`.
    pub fn matches(&self, criteria: &BTreeMap<String, Value>) -> bool {
        criteria
            .iter()
            .all(|(key, expected)| self.info.get(key) == Some(expected))
    }

    fn str_attr(&self, name: &str) -> Option<&str> {
        self.info.get(name).and_then(Value::as_str)
    }
}

impl std::fmt::Display for Replication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Replication {}>", Value::Object(self.info.clone()))
    }
}

// ---------------------------------------------------------------------------
// ReplicationUpdate
// ---------------------------------------------------------------------------

/// The set of fields to change in an `update` call.
///
/// Only fields that were explicitly set are sent; everything else is omitted
/// from the request body (not nulled). Setting a field to JSON `null` is
/// distinct from leaving it unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicationUpdate {
    fields: Map<String, Value>,
}

impl ReplicationUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.set("name", Value::String(name.into()))
    }

    /// Sets the description.
    pub fn description(self, description: impl Into<String>) -> Self {
        self.set("description", Value::String(description.into()))
    }

    /// Explicitly sends `"description": null`.
    pub fn clear_description(self) -> Self {
        self.set("description", Value::Null)
    }

    /// Sets an arbitrary field. A later call for the same key replaces the
    /// earlier value.
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Returns `true` when no field has been set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl FromIterator<(String, Value)> for ReplicationUpdate {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ListOptions
// ---------------------------------------------------------------------------

/// Filtering, paging, and ordering options for a list call.
///
/// `sort_key` and `sort_dir` are the older single-key form; when `sort` is
/// set they are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListOptions {
    /// Request the `/detail` listing instead of the summary listing.
    pub detailed: bool,
    /// Server-side filters. Entries with an empty value are not sent.
    pub search_opts: BTreeMap<String, String>,
    /// Return replications after the one with this id.
    pub marker: Option<String>,
    /// Maximum number of replications to return.
    pub limit: Option<u32>,
    pub sort_key: Option<String>,
    /// `asc` or `desc`.
    pub sort_dir: Option<String>,
    /// Comma-separated `key[:dir]` list, e.g. `"status:asc,name"`.
    pub sort: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn with_search_opt(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_opts.insert(key.into(), value.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    pub fn with_sort_dir(mut self, sort_dir: impl Into<String>) -> Self {
        self.sort_dir = Some(sort_dir.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}
