//! In-memory WORM object store for tests and local mode.
//!
//! Enforces the same deletion rules the real cloud tier is provisioned
//! with: objects acquire lock attributes at write time from the bucket
//! policy, ordinary credentials can never delete, and escalated
//! credentials are honored only once retention has lapsed and no legal
//! hold is set.
//!
//! Clone-able; clones share the same underlying storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use parking_lot::RwLock;

use crate::constants::DEFAULT_RETENTION_DAYS;
use crate::error::CofferError;

use super::{DeleteCredential, ObjectLockAttributes, ObjectLockMode, ObjectStore};

/// Bucket-level retention policy applied to every object at write time.
#[derive(Debug, Clone, Copy)]
pub struct BucketRetentionPolicy {
    /// Lock mode stamped onto new objects.
    pub mode: ObjectLockMode,
    /// How long new objects are retained.
    pub retain_for: Duration,
    /// Whether new objects are written under legal hold.
    pub legal_hold: bool,
}

impl BucketRetentionPolicy {
    /// Governance mode, default retention window, no legal hold.
    pub fn governance_default() -> Self {
        Self {
            mode: ObjectLockMode::Governance,
            retain_for: Duration::days(DEFAULT_RETENTION_DAYS),
            legal_hold: false,
        }
    }

    /// Compliance mode with legal hold, default retention window.
    pub fn compliance_with_hold() -> Self {
        Self {
            mode: ObjectLockMode::Compliance,
            retain_for: Duration::days(DEFAULT_RETENTION_DAYS),
            legal_hold: true,
        }
    }
}

struct StoredObject {
    data: Bytes,
    attributes: Option<ObjectLockAttributes>,
}

/// In-memory object store enforcing WORM semantics.
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    policy: Arc<RwLock<Option<BucketRetentionPolicy>>>,
}

impl InMemoryObjectStore {
    /// Create a store with no retention policy (objects unprotected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose writes acquire the given retention attributes.
    pub fn with_retention(policy: BucketRetentionPolicy) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            policy: Arc::new(RwLock::new(Some(policy))),
        }
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    /// Stored bytes for a key, if present.
    pub fn object_bytes(&self, key: &str) -> Option<Bytes> {
        self.objects.read().get(key).map(|o| o.data.clone())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, key: &str, data: Bytes) -> Result<(), CofferError> {
        if key.is_empty() {
            return Err(CofferError::invalid_input("object key cannot be empty"));
        }

        let policy = *self.policy.read();
        let attributes = policy.map(|policy| ObjectLockAttributes {
            mode: policy.mode,
            retain_until: Utc::now() + policy.retain_for,
            legal_hold: policy.legal_hold,
        });

        let mut objects = self.objects.write();
        if let Some(existing) = objects.get(key) {
            if existing
                .attributes
                .is_some_and(|attrs| attrs.protects_at(Utc::now()))
            {
                return Err(CofferError::access_denied(format!(
                    "overwrite of protected object '{}'",
                    key
                )));
            }
        }
        objects.insert(key.to_string(), StoredObject { data, attributes });
        tracing::debug!(key, protected = attributes.is_some(), "object written");
        Ok(())
    }

    async fn lock_attributes(
        &self,
        key: &str,
    ) -> Result<Option<ObjectLockAttributes>, CofferError> {
        match self.objects.read().get(key) {
            Some(object) => Ok(object.attributes),
            None => Err(CofferError::invalid_input(format!(
                "object '{}' does not exist",
                key
            ))),
        }
    }

    async fn delete_object(
        &self,
        key: &str,
        credential: DeleteCredential<'_>,
    ) -> Result<(), CofferError> {
        let now = Utc::now();
        let mut objects = self.objects.write();
        let Some(object) = objects.get(key) else {
            return Err(CofferError::invalid_input(format!(
                "object '{}' does not exist",
                key
            )));
        };

        let protected = object
            .attributes
            .is_some_and(|attrs| attrs.protects_at(now));

        match credential {
            DeleteCredential::Ordinary => {
                // Ordinary credentials never delete from the vault bucket,
                // protected or not.
                tracing::debug!(key, "ordinary-credential delete denied");
                Err(CofferError::access_denied(format!(
                    "delete of '{}' with ordinary credential",
                    key
                )))
            }
            DeleteCredential::Escalated(session) => {
                if session.is_expired(now) {
                    return Err(CofferError::access_denied(format!(
                        "delete of '{}' with expired session",
                        key
                    )));
                }
                if protected {
                    return Err(CofferError::access_denied(format!(
                        "delete of '{}' while under retention or legal hold",
                        key
                    )));
                }
                objects.remove(key);
                tracing::info!(key, "object deleted with escalated session");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EscalatedSession;

    fn fresh_session() -> EscalatedSession {
        EscalatedSession::new("ASIA1", "sk", "tok", Utc::now() + Duration::hours(1))
    }

    fn expired_session() -> EscalatedSession {
        EscalatedSession::new("ASIA2", "sk", "tok", Utc::now() - Duration::hours(1))
    }

    #[tokio::test]
    async fn test_write_acquires_lock_attributes() {
        let store = InMemoryObjectStore::with_retention(BucketRetentionPolicy::governance_default());
        store.put_object("a.bin", Bytes::from_static(b"x")).await.expect("put");

        let attrs = store
            .lock_attributes("a.bin")
            .await
            .expect("query")
            .expect("attributes set at write time");
        assert_eq!(attrs.mode, ObjectLockMode::Governance);
        assert!(attrs.retain_until > Utc::now());
        assert!(!attrs.legal_hold);
    }

    #[tokio::test]
    async fn test_no_policy_means_no_attributes() {
        let store = InMemoryObjectStore::new();
        store.put_object("a.bin", Bytes::from_static(b"x")).await.expect("put");
        assert!(store.lock_attributes("a.bin").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn test_ordinary_delete_always_denied() {
        let store = InMemoryObjectStore::with_retention(BucketRetentionPolicy::governance_default());
        store.put_object("a.bin", Bytes::from_static(b"x")).await.expect("put");

        let err = store
            .delete_object("a.bin", DeleteCredential::Ordinary)
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::AccessDenied { .. }));
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_escalated_delete_denied_under_retention() {
        let store = InMemoryObjectStore::with_retention(BucketRetentionPolicy::governance_default());
        store.put_object("a.bin", Bytes::from_static(b"x")).await.expect("put");

        let session = fresh_session();
        let err = store
            .delete_object("a.bin", DeleteCredential::Escalated(&session))
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_escalated_delete_denied_under_legal_hold() {
        let store = InMemoryObjectStore::with_retention(BucketRetentionPolicy {
            mode: ObjectLockMode::Compliance,
            // Retention already lapsed; the hold alone must still protect.
            retain_for: Duration::seconds(-1),
            legal_hold: true,
        });
        store.put_object("a.bin", Bytes::from_static(b"x")).await.expect("put");

        let session = fresh_session();
        let err = store
            .delete_object("a.bin", DeleteCredential::Escalated(&session))
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_escalated_delete_succeeds_after_retention_lapses() {
        let store = InMemoryObjectStore::with_retention(BucketRetentionPolicy {
            mode: ObjectLockMode::Governance,
            retain_for: Duration::seconds(-1),
            legal_hold: false,
        });
        store.put_object("a.bin", Bytes::from_static(b"x")).await.expect("put");

        let session = fresh_session();
        store
            .delete_object("a.bin", DeleteCredential::Escalated(&session))
            .await
            .expect("delete after retention");
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_session_denied() {
        let store = InMemoryObjectStore::new();
        store.put_object("a.bin", Bytes::from_static(b"x")).await.expect("put");

        let session = expired_session();
        let err = store
            .delete_object("a.bin", DeleteCredential::Escalated(&session))
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_overwrite_of_protected_object_denied() {
        let store = InMemoryObjectStore::with_retention(BucketRetentionPolicy::governance_default());
        store.put_object("a.bin", Bytes::from_static(b"one")).await.expect("put");

        let err = store
            .put_object("a.bin", Bytes::from_static(b"two"))
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::AccessDenied { .. }));
        assert_eq!(store.object_bytes("a.bin").expect("object kept"), Bytes::from_static(b"one"));
    }
}
