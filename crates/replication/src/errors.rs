//! Error types shared by every layer of the replication client.
//!
//! [`ClientError`] is the single error type returned by the
//! [`crate::BaseClient`] port and, unchanged, by [`crate::ReplicationManager`].
//! The manager never catches, wraps, or reinterprets these errors; whatever the
//! base client reports is what the caller sees.

use thiserror::Error;

// ---------------------------------------------------------------------------
// HTTP error classification
// ---------------------------------------------------------------------------

/// Classification of a non-success HTTP status returned by the service.
///
/// Mirrors the fault types the replication API documents. Statuses without a
/// dedicated variant fall into [`HttpErrorKind::ClientError`] (other 4xx) or
/// [`HttpErrorKind::ServerError`] (5xx and anything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    /// 400: the request body or query was rejected.
    BadRequest,
    /// 401: missing or invalid credentials.
    Unauthorized,
    /// 403: the caller may not perform this operation.
    Forbidden,
    /// 404: the replication (or route) does not exist.
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 409: the replication is in a state that conflicts with the request.
    Conflict,
    /// 413: quota or rate limit exceeded.
    OverLimit,
    /// 501
    NotImplemented,
    /// Any other 4xx status.
    ClientError,
    /// 5xx, or a status outside the 4xx range with no dedicated variant.
    ServerError,
}

impl HttpErrorKind {
    /// Classifies a raw HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            409 => Self::Conflict,
            413 => Self::OverLimit,
            501 => Self::NotImplemented,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }
}

impl std::fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::MethodNotAllowed => "method not allowed",
            Self::Conflict => "conflict",
            Self::OverLimit => "over limit",
            Self::NotImplemented => "not implemented",
            Self::ClientError => "client error",
            Self::ServerError => "server error",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Errors produced while talking to the replication service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success HTTP status.
    #[error("{kind} (HTTP {status}): {message}{}", request_id_suffix(.request_id))]
    Http {
        /// Classification derived from `status`.
        kind: HttpErrorKind,
        /// Raw HTTP status code.
        status: u16,
        /// Message extracted from the fault body, or the reason phrase.
        message: String,
        /// Value of the `x-openstack-request-id` response header, if any.
        request_id: Option<String>,
    },

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A success response did not have the expected JSON shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A sort key or sort direction passed to a list call was invalid.
    #[error("invalid sort parameter: {0}")]
    InvalidSort(String),

    /// A client-side `find` matched no replication.
    #[error("no replication matching {0}")]
    NotFound(String),

    /// A client-side `find` matched more than one replication.
    #[error("multiple replications match {criteria} ({count} matches)")]
    NoUniqueMatch {
        /// Rendered search criteria.
        criteria: String,
        /// Number of replications that matched.
        count: usize,
    },

    /// The client was constructed with an invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Returns the HTTP status for [`ClientError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is an HTTP error of the given kind.
    pub fn is_http(&self, expected: HttpErrorKind) -> bool {
        matches!(self, Self::Http { kind, .. } if *kind == expected)
    }
}

fn request_id_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" (request id {id})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_statuses_map_to_their_kind() {
        assert_eq!(HttpErrorKind::from_status(400), HttpErrorKind::BadRequest);
        assert_eq!(HttpErrorKind::from_status(404), HttpErrorKind::NotFound);
        assert_eq!(HttpErrorKind::from_status(409), HttpErrorKind::Conflict);
        assert_eq!(HttpErrorKind::from_status(413), HttpErrorKind::OverLimit);
        assert_eq!(HttpErrorKind::from_status(501), HttpErrorKind::NotImplemented);
    }

    #[test]
    fn unlisted_statuses_fall_back_by_range() {
        assert_eq!(HttpErrorKind::from_status(422), HttpErrorKind::ClientError);
        assert_eq!(HttpErrorKind::from_status(503), HttpErrorKind::ServerError);
        assert_eq!(HttpErrorKind::from_status(302), HttpErrorKind::ServerError);
    }

    #[test]
    fn http_error_display_includes_request_id_when_present() {
        let err = ClientError::Http {
            kind: HttpErrorKind::NotFound,
            status: 404,
            message: "Replication r1 could not be found.".into(),
            request_id: Some("req-42".into()),
        };
        assert_eq!(
            err.to_string(),
            "not found (HTTP 404): Replication r1 could not be found. (request id req-42)"
        );
        assert_eq!(err.status(), Some(404));
        assert!(err.is_http(HttpErrorKind::NotFound));
    }

    #[test]
    fn http_error_display_without_request_id() {
        let err = ClientError::Http {
            kind: HttpErrorKind::Conflict,
            status: 409,
            message: "busy".into(),
            request_id: None,
        };
        assert_eq!(err.to_string(), "conflict (HTTP 409): busy");
        assert!(!err.is_http(HttpErrorKind::NotFound));
    }
}
