//! Coffer: lock-gated content vault control plane with WORM replication
//! verification.
//!
//! Two tiers. The local tier is a request-driven HTTP service that mediates
//! file uploads behind a two-state lock and a single owner credential; the
//! cloud tier is write-once-read-many object storage whose retention
//! attributes make accepted content tamper-evident. The rules tying them
//! together:
//!
//! - mutation of local state requires the owner credential AND an unlocked
//!   vault, checked and applied inside one critical section;
//! - accepted files are recorded append-only and never deleted locally;
//! - every cloud replica acquires lock attributes at write time, and the
//!   [`cloud::ReplicationVerifier`] proves it, including a negative-control
//!   delete that must be denied;
//! - deletion of protected cloud objects requires a time-boxed escalated
//!   session from [`session::SessionEscalator`], and is still denied while
//!   retention or a legal hold is in force.

pub mod auth;
pub mod cloud;
pub mod config;
pub mod constants;
pub mod error;
pub mod provision;
pub mod retry;
pub mod server;
pub mod session;
pub mod vault;

pub use auth::{AuthGuard, AuthorizedPrincipal};
pub use cloud::{ObjectLockAttributes, ObjectLockMode, ObjectStore, ReplicationVerifier};
pub use error::CofferError;
pub use session::{EscalatedSession, SessionEscalator};
pub use vault::{FileRecord, LockStatus, UploadGateway};
