//! Cloud tier boundary: WORM object storage with per-object lock attributes.
//!
//! The copy step that pushes bytes into the cloud tier is an external
//! collaborator; this module specifies the contract the vault depends on:
//! objects acquire retention attributes at write time, attributes are
//! queryable per object, and deletion without an escalated credential is
//! denied.

pub mod memory;
pub mod verifier;

pub use memory::{BucketRetentionPolicy, InMemoryObjectStore};
pub use verifier::ReplicationVerifier;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CofferError;
use crate::session::EscalatedSession;

/// Object lock mode, matching the cloud tier's retention modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectLockMode {
    /// Retention can be shortened by specially privileged principals.
    Governance,
    /// Retention cannot be shortened by anyone, including the root account.
    Compliance,
}

/// Per-object retention metadata, set by the cloud tier at write time.
///
/// Not mutable through ordinary credentials; no path in this crate clears
/// `retain_until` or `legal_hold` before expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLockAttributes {
    /// Retention mode in force.
    pub mode: ObjectLockMode,
    /// Timestamp until which the object cannot be deleted or overwritten.
    pub retain_until: DateTime<Utc>,
    /// Indefinite protection flag, independent of `retain_until`.
    pub legal_hold: bool,
}

impl ObjectLockAttributes {
    /// Whether the object is protected against deletion as of `now`.
    pub fn protects_at(&self, now: DateTime<Utc>) -> bool {
        self.legal_hold || self.retain_until > now
    }
}

/// Credential presented with a delete attempt.
#[derive(Debug, Clone, Copy)]
pub enum DeleteCredential<'a> {
    /// The ordinary owner credential. Must always be denied for protected
    /// objects; the verifier uses this as its negative control.
    Ordinary,
    /// A time-boxed elevated session from the escalation boundary.
    Escalated(&'a EscalatedSession),
}

/// Object storage with WORM retention, queryable per object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object. Retention attributes are applied at write time per
    /// bucket policy. Overwriting a protected object is denied.
    async fn put_object(&self, key: &str, data: Bytes) -> Result<(), CofferError>;

    /// Fetch an object's lock attributes, or `None` if the object carries
    /// no retention metadata.
    async fn lock_attributes(&self, key: &str)
        -> Result<Option<ObjectLockAttributes>, CofferError>;

    /// Attempt to delete an object with the given credential.
    ///
    /// Must return `AccessDenied` for any ordinary-credential attempt
    /// against a protected object, and for escalated attempts while
    /// `retain_until` is in the future or `legal_hold` is set.
    async fn delete_object(
        &self,
        key: &str,
        credential: DeleteCredential<'_>,
    ) -> Result<(), CofferError>;
}
