//! The `BaseClient` port: generic request primitives the manager is built on.
//!
//! Implementations own transport, authentication, and response unmarshalling.
//! Every method receives a path relative to the service's versioned endpoint
//! (e.g. `/replications/r1`) and, where a body is returned, the key under
//! which the resource is wrapped in the response (e.g. `"replication"`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::{query, ClientError, ListOptions, ResourceBody};

/// Extra request headers for a single call, keyed by header name.
pub type RequestHeaders = BTreeMap<String, String>;

/// Generic resource-request primitives.
#[async_trait]
pub trait BaseClient: Send + Sync {
    /// POSTs `body` to `url` and returns the object under `response_key`.
    async fn create(
        &self,
        url: &str,
        body: Value,
        response_key: &str,
    ) -> Result<ResourceBody, ClientError>;

    /// Builds the list URL for `resource_type`.
    ///
    /// The default implementation follows the `/detail` path convention; see
    /// [`query::build_list_url`].
    fn build_list_url(
        &self,
        resource_type: &str,
        options: &ListOptions,
    ) -> Result<String, ClientError> {
        query::build_list_url(resource_type, options)
    }

    /// GETs `url` and returns the array under `response_key`, in server order.
    async fn list(&self, url: &str, response_key: &str) -> Result<Vec<ResourceBody>, ClientError>;

    /// PUTs `body` to `url` and returns the object under `response_key`.
    async fn update(
        &self,
        url: &str,
        body: Value,
        response_key: &str,
    ) -> Result<ResourceBody, ClientError>;

    /// DELETEs `url`. Any response body is discarded.
    async fn delete(&self, url: &str) -> Result<(), ClientError>;

    /// GETs `url` with the given extra headers and returns the object under
    /// `response_key`.
    async fn get(
        &self,
        url: &str,
        response_key: &str,
        headers: &RequestHeaders,
    ) -> Result<ResourceBody, ClientError>;

    /// POSTs `{action: action_data}` to `url` (`null` when `action_data` is
    /// `None`) and returns the object under `response_key`.
    async fn action(
        &self,
        action: &str,
        url: &str,
        action_data: Option<Value>,
        response_key: &str,
    ) -> Result<ResourceBody, ClientError>;
}

/// Builds the request body for an action call.
pub fn action_body(action: &str, action_data: Option<Value>) -> Value {
    let mut body = serde_json::Map::with_capacity(1);
    body.insert(action.to_string(), action_data.unwrap_or(Value::Null));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn action_without_data_sends_null() {
        assert_eq!(action_body("enable", None), json!({"enable": null}));
    }

    #[test]
    fn action_data_is_nested_under_the_action_name() {
        assert_eq!(
            action_body("failover", Some(json!({"force": true}))),
            json!({"failover": {"force": true}})
        );
    }
}
