//! Declarative infrastructure provisioning boundary.
//!
//! The tool that actually creates the cloud bucket and its retention
//! configuration is an external collaborator. This module pins down the
//! contract the workflow relies on: apply is synchronous, idempotent, and
//! at-least-once; a failed apply aborts the workflow before any upload
//! proceeds, and must be re-run explicitly by the operator.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::CofferError;

/// Variables for a declarative apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// Cloud region for the bucket.
    pub region: String,
    /// Bucket to create with object-lock retention enabled.
    pub bucket_name: String,
    /// Identity granted ownership of the bucket.
    pub owner_arn: String,
    /// Run unattended without an interactive approval step.
    pub auto_approve: bool,
}

impl ProvisionRequest {
    /// The variables that define the desired infrastructure state.
    /// `auto_approve` is execution detail, not state.
    fn desired_state(&self) -> (&str, &str, &str) {
        (&self.region, &self.bucket_name, &self.owner_arn)
    }
}

/// Result of an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionOutcome {
    /// Whether the apply changed any infrastructure. Re-running with
    /// unchanged variables reports `false`.
    pub changed: bool,
}

/// Infrastructure-apply boundary.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Apply the requested state. Idempotent: applying the same variables
    /// twice produces no further change.
    async fn apply(&self, request: &ProvisionRequest) -> Result<ProvisionOutcome, CofferError>;
}

/// Recording provisioner for tests and local mode.
///
/// Tracks the last applied state to exercise the idempotence contract, and
/// refuses to run without `auto_approve` (there is no interactive prompt in
/// this process).
#[derive(Default)]
pub struct RecordingProvisioner {
    applied: Mutex<Option<(String, String, String)>>,
    apply_count: Mutex<u32>,
}

impl RecordingProvisioner {
    /// Create a provisioner with no applied state.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many applies actually ran.
    pub fn apply_count(&self) -> u32 {
        *self.apply_count.lock()
    }
}

#[async_trait]
impl Provisioner for RecordingProvisioner {
    async fn apply(&self, request: &ProvisionRequest) -> Result<ProvisionOutcome, CofferError> {
        if !request.auto_approve {
            return Err(CofferError::ProvisioningError {
                reason: "interactive approval is unavailable; re-run with auto_approve".to_string(),
            });
        }
        if request.bucket_name.is_empty() {
            return Err(CofferError::ProvisioningError {
                reason: "bucket_name cannot be empty".to_string(),
            });
        }

        let desired = {
            let (region, bucket, owner) = request.desired_state();
            (region.to_string(), bucket.to_string(), owner.to_string())
        };

        let mut applied = self.applied.lock();
        let changed = applied.as_ref() != Some(&desired);
        if changed {
            *applied = Some(desired);
            *self.apply_count.lock() += 1;
            tracing::info!(
                region = %request.region,
                bucket = %request.bucket_name,
                "infrastructure applied"
            );
        } else {
            tracing::debug!(bucket = %request.bucket_name, "apply is a no-op; state unchanged");
        }
        Ok(ProvisionOutcome { changed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProvisionRequest {
        ProvisionRequest {
            region: "eu-west-1".into(),
            bucket_name: "coffer-vault".into(),
            owner_arn: "arn:aws:iam::123:user/owner".into(),
            auto_approve: true,
        }
    }

    #[tokio::test]
    async fn test_first_apply_changes_infrastructure() {
        let provisioner = RecordingProvisioner::new();
        let outcome = provisioner.apply(&request()).await.expect("apply");
        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn test_reapply_with_unchanged_variables_is_a_no_op() {
        let provisioner = RecordingProvisioner::new();
        provisioner.apply(&request()).await.expect("first apply");

        let outcome = provisioner.apply(&request()).await.expect("second apply");
        assert!(!outcome.changed);
        assert_eq!(provisioner.apply_count(), 1);
    }

    #[tokio::test]
    async fn test_changed_variables_apply_again() {
        let provisioner = RecordingProvisioner::new();
        provisioner.apply(&request()).await.expect("first apply");

        let mut changed = request();
        changed.bucket_name = "coffer-vault-2".into();
        let outcome = provisioner.apply(&changed).await.expect("apply");
        assert!(outcome.changed);
        assert_eq!(provisioner.apply_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_auto_approve_fails() {
        let provisioner = RecordingProvisioner::new();
        let mut req = request();
        req.auto_approve = false;

        let err = provisioner.apply(&req).await.unwrap_err();
        assert!(matches!(err, CofferError::ProvisioningError { .. }));
        assert_eq!(provisioner.apply_count(), 0);
    }
}
