//! Response decoding: JSON parsing, response-key unwrapping, and mapping of
//! non-success statuses onto [`ClientError::Http`].

use serde_json::Value;

use replication::{ClientError, HttpErrorKind, ResourceBody};

/// Response headers that may carry the server-side request id, in lookup order.
pub const REQUEST_ID_HEADERS: [&str; 2] = ["x-openstack-request-id", "x-compute-request-id"];

/// Parses a success body. An empty (or whitespace-only) body yields `None`.
pub fn parse_body(text: &str) -> Result<Option<Value>, ClientError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| ClientError::MalformedResponse(format!("response is not valid JSON: {e}")))
}

/// Returns the object stored under `key` in `body`.
pub fn unwrap_object(body: Option<Value>, key: &str) -> Result<ResourceBody, ClientError> {
    match take_key(body, key)? {
        Value::Object(info) => Ok(info),
        other => Err(ClientError::MalformedResponse(format!(
            "expected an object under '{key}', found {}",
            json_type(&other)
        ))),
    }
}

/// Returns the array of objects stored under `key` in `body`, in order.
pub fn unwrap_list(body: Option<Value>, key: &str) -> Result<Vec<ResourceBody>, ClientError> {
    match take_key(body, key)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(info) => Ok(info),
                other => Err(ClientError::MalformedResponse(format!(
                    "'{key}[{index}]' is {}, not an object",
                    json_type(&other)
                ))),
            })
            .collect(),
        other => Err(ClientError::MalformedResponse(format!(
            "expected an array under '{key}', found {}",
            json_type(&other)
        ))),
    }
}

/// Builds the error for a non-success response.
///
/// The message is taken from a fault body of the form
/// `{"<faultName>": {"message": "..."}}` when present, otherwise from the
/// raw body text, otherwise from the reason phrase.
pub fn error_from_response(
    status: u16,
    reason: Option<&str>,
    request_id: Option<String>,
    body: &str,
) -> ClientError {
    let message = fault_message(body)
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));

    ClientError::Http {
        kind: HttpErrorKind::from_status(status),
        status,
        message,
        request_id,
    }
}

fn fault_message(body: &str) -> Option<String> {
    let Value::Object(map) = serde_json::from_str::<Value>(body).ok()? else {
        return None;
    };
    let fault = map.into_iter().next()?.1;
    let message = fault.get("message")?.as_str()?.to_string();
    match fault.get("details").and_then(Value::as_str) {
        Some(details) if !details.is_empty() => Some(format!("{message} ({details})")),
        _ => Some(message),
    }
}

fn take_key(body: Option<Value>, key: &str) -> Result<Value, ClientError> {
    match body {
        Some(Value::Object(mut map)) => map.remove(key).ok_or_else(|| {
            ClientError::MalformedResponse(format!("response has no '{key}' key"))
        }),
        Some(other) => Err(ClientError::MalformedResponse(format!(
            "expected a JSON object, found {}",
            json_type(&other)
        ))),
        None => Err(ClientError::MalformedResponse(format!(
            "empty response, expected '{key}'"
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_body_parses_to_none() {
        assert_eq!(parse_body("").unwrap(), None);
        assert_eq!(parse_body("  \n").unwrap(), None);
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(
            parse_body("<html>").unwrap_err(),
            ClientError::MalformedResponse(_)
        ));
    }

    #[test]
    fn unwrap_object_returns_the_keyed_resource() {
        let body = Some(json!({"replication": {"id": "r1", "status": "enabled"}}));
        let info = unwrap_object(body, "replication").unwrap();
        assert_eq!(info["id"], json!("r1"));
    }

    #[test]
    fn unwrap_object_rejects_missing_key_and_wrong_shape() {
        let missing = unwrap_object(Some(json!({"volume": {}})), "replication").unwrap_err();
        assert!(matches!(missing, ClientError::MalformedResponse(_)));

        let wrong = unwrap_object(Some(json!({"replication": [1]})), "replication").unwrap_err();
        assert!(wrong.to_string().contains("found an array"));

        let empty = unwrap_object(None, "replication").unwrap_err();
        assert!(matches!(empty, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn unwrap_list_keeps_server_order() {
        let body = Some(json!({"replications": [{"id": "z"}, {"id": "a"}, {"id": "m"}]}));
        let items = unwrap_list(body, "replications").unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn unwrap_list_rejects_non_object_items() {
        let err = unwrap_list(Some(json!({"replications": [{"id": "a"}, 3]})), "replications")
            .unwrap_err();
        assert!(err.to_string().contains("'replications[1]' is a number"));
    }

    #[test]
    fn fault_body_message_is_extracted() {
        let body = r#"{"itemNotFound": {"message": "Replication r9 could not be found.", "code": 404}}"#;
        let err = error_from_response(404, Some("Not Found"), Some("req-1".into()), body);
        match err {
            ClientError::Http {
                kind,
                status,
                message,
                request_id,
            } => {
                assert_eq!(kind, HttpErrorKind::NotFound);
                assert_eq!(status, 404);
                assert_eq!(message, "Replication r9 could not be found.");
                assert_eq!(request_id.as_deref(), Some("req-1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fault_details_are_appended() {
        let body = r#"{"badRequest": {"message": "Invalid input", "details": "force must be bool"}}"#;
        let err = error_from_response(400, None, None, body);
        assert!(err.to_string().contains("Invalid input (force must be bool)"));
    }

    #[test]
    fn plain_text_body_becomes_the_message() {
        let err = error_from_response(503, Some("Service Unavailable"), None, "try later\n");
        assert_eq!(err.to_string(), "server error (HTTP 503): try later");
    }

    #[test]
    fn reason_phrase_is_used_for_empty_bodies() {
        let err = error_from_response(409, Some("Conflict"), None, "");
        assert_eq!(err.to_string(), "conflict (HTTP 409): Conflict");

        let err = error_from_response(418, None, None, "");
        assert_eq!(err.to_string(), "client error (HTTP 418): HTTP 418");
    }
}
