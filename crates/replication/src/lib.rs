//! Replication resource domain for the storage-replication client.
//!
//! This crate contains the replication value types, identifiers, the error
//! type, list-URL construction, the [`BaseClient`] port, and
//! [`ReplicationManager`], which maps each replication operation onto one
//! base-client call.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies. It
//! defines *what* request each operation makes; infrastructure crates (see
//! `http-client`) define *how* it is sent.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ReplicationId`, `VolumeId`, `SessionId`) |
//! | [`types`] | `Replication`, `ReplicationUpdate`, `ListOptions` |
//! | [`errors`] | `ClientError` and HTTP error classification |
//! | [`query`] | List-URL and sort-parameter construction |
//! | [`base`] | The `BaseClient` port trait |
//! | [`manager`] | `ReplicationManager` |
//!
//! ## Example
//!
//! ```ignore
//! let manager = ReplicationManager::new(Arc::new(http_client));
//! let id = ReplicationId::new("2b1d").unwrap();
//! let replication = manager.failover(&id, false).await?;
//! println!("{:?}", replication.status());
//! ```

pub mod base;
pub mod errors;
pub mod identifiers;
pub mod manager;
pub mod query;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use base::{action_body, BaseClient, RequestHeaders};
pub use errors::{ClientError, HttpErrorKind};
pub use identifiers::{EmptyIdentifier, ReplicationId, SessionId, VolumeId};
pub use manager::{ReplicationManager, RESOURCE_TYPE, RESPONSE_KEY, SESSION_HEADER};
pub use types::{ListOptions, Replication, ReplicationUpdate, ResourceBody};
