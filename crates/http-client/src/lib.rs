//! HTTP base client for the replication service.
//!
//! Implements the [`replication::BaseClient`] trait over `reqwest`: URL
//! joining against a versioned endpoint, JSON bodies, static token headers,
//! timeouts, response-key unwrapping, and mapping of HTTP fault responses onto
//! [`replication::ClientError`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport and serialisation live here. The
//! [`replication`] crate sees only [`replication::BaseClient`].
//!
//! ## Authentication
//!
//! Token acquisition is not handled here. A pre-issued token may be supplied
//! through [`HttpClientConfig::with_auth_token`] and is sent as `X-Auth-Token`
//! on every request.

pub mod client;
pub mod config;
pub mod response;

pub use client::{HttpBaseClient, AUTH_TOKEN_HEADER};
pub use config::{HttpClientConfig, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
