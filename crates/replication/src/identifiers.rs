//! Newtype identifiers used when addressing replication resources.
//!
//! Every identifier is a distinct newtype wrapping a non-empty string. This
//! prevents accidentally interchanging, for example, a [`ReplicationId`] with
//! a [`VolumeId`] even though both are opaque server-assigned strings.
//!
//! The client never checks the *format* of an identifier (UUID or otherwise);
//! malformed identifiers are rejected by the server.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when an identifier is built from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} must not be empty")]
pub struct EmptyIdentifier(pub &'static str);

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and
// serde conversions that reject empty strings.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyIdentifier;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(EmptyIdentifier(stringify!($name)))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifies one replication pairing on the server.
    ///
    /// Substituted verbatim into `/replications/{id}` style paths.
    ReplicationId
}

string_id! {
    /// Identifies a storage volume taking part in a replication
    /// (either the master or the slave side).
    VolumeId
}

string_id! {
    /// A configuration session token.
    ///
    /// When supplied to [`crate::ReplicationManager::get`] it is sent as the
    /// `X-Configuration-Session` request header.
    SessionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_rejected() {
        assert!(ReplicationId::new("").is_none());
        assert!(VolumeId::new(String::new()).is_none());
        assert!(SessionId::new("").is_none());
    }

    #[test]
    fn display_and_as_str_expose_the_raw_value() {
        let id = ReplicationId::new("7f1c").unwrap();
        assert_eq!(id.as_str(), "7f1c");
        assert_eq!(id.to_string(), "7f1c");
    }

    #[test]
    fn serialises_as_a_bare_string() {
        let id = VolumeId::new("vol-1").unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("vol-1"));

        let back: VolumeId = serde_json::from_value(serde_json::json!("vol-2")).unwrap();
        assert_eq!(back.as_str(), "vol-2");
    }

    #[test]
    fn deserialising_an_empty_string_fails() {
        let err = serde_json::from_value::<ReplicationId>(serde_json::json!("")).unwrap_err();
        assert!(err.to_string().contains("ReplicationId must not be empty"));
        assert!(serde_json::from_value::<SessionId>(serde_json::json!("")).is_err());
    }
}
