//! Replication verification: asserts the cloud copy is tamper-evident.
//!
//! Runs after the external copy step places a file's bytes into the cloud
//! tier. Verification has two halves:
//!
//! 1. The object's lock attributes exist and still protect it (`retain_until`
//!    in the future, or legal hold set).
//! 2. A negative control: a delete attempt with the ordinary credential must
//!    be denied by the cloud tier.
//!
//! A negative control that unexpectedly succeeds means the retention
//! configuration is broken. That is a hard `ProtectionBypassed` failure, not
//! a warning: content that was supposed to be immutable is not.

use std::sync::Arc;

use chrono::Utc;

use crate::error::CofferError;

use super::{DeleteCredential, ObjectLockAttributes, ObjectStore};

/// Confirms cloud-side retention and deletion protection per object.
pub struct ReplicationVerifier {
    store: Arc<dyn ObjectStore>,
}

impl ReplicationVerifier {
    /// Create a verifier over the given cloud tier.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Verify that `object_key` is protected.
    ///
    /// Returns the object's lock attributes on success. Fails with
    /// `NotProtected` when attributes are missing or no longer protective,
    /// and with `ProtectionBypassed` when the negative-control delete
    /// succeeds.
    pub async fn verify(&self, object_key: &str) -> Result<ObjectLockAttributes, CofferError> {
        let attributes = self
            .store
            .lock_attributes(object_key)
            .await?
            .ok_or_else(|| CofferError::NotProtected {
                key: object_key.to_string(),
                reason: "object carries no lock attributes".to_string(),
            })?;

        let now = Utc::now();
        if !attributes.protects_at(now) {
            return Err(CofferError::NotProtected {
                key: object_key.to_string(),
                reason: "retention has lapsed and no legal hold is set".to_string(),
            });
        }

        // Negative control: the ordinary credential must not be able to
        // delete. An unexpected success is a protection-configuration
        // failure and aborts the workflow.
        match self
            .store
            .delete_object(object_key, DeleteCredential::Ordinary)
            .await
        {
            Err(CofferError::AccessDenied { .. }) => {
                tracing::debug!(object_key, "negative-control delete denied as expected");
            }
            Ok(()) => {
                tracing::error!(object_key, "negative-control delete SUCCEEDED; object is not protected");
                return Err(CofferError::ProtectionBypassed {
                    key: object_key.to_string(),
                });
            }
            // Any other failure is surfaced, not swallowed: the control did
            // not prove what it was supposed to prove.
            Err(other) => return Err(other),
        }

        tracing::info!(
            object_key,
            mode = ?attributes.mode,
            retain_until = %attributes.retain_until,
            legal_hold = attributes.legal_hold,
            "replica verified as protected"
        );
        Ok(attributes)
    }
}
