//! Error taxonomy for the vault lock and replication protocol.
//!
//! Every failure mode the control plane or the cloud boundary can report is
//! a variant here. Authorization and lock-state failures map to distinct
//! HTTP status codes at the server layer and are never downgraded to
//! warnings; verification mismatches (`ProtectionBypassed`) are hard
//! failures.

use thiserror::Error;

/// Protocol-level errors surfaced by the vault components.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CofferError {
    /// Presented bearer credential does not match the owner secret.
    #[error("credential rejected")]
    Unauthorized,

    /// A write was attempted while the vault is locked.
    #[error("vault is locked")]
    Locked,

    /// Malformed upload: empty payload, disallowed name, or oversized body.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable cause.
        reason: String,
    },

    /// Re-upload of a name already present in the catalog.
    /// Records are never overwritten or versioned.
    #[error("file '{name}' already exists in the catalog")]
    DuplicateName {
        /// The conflicting file name.
        name: String,
    },

    /// A cloud object lacks the expected retention attributes.
    #[error("object '{key}' is not protected: {reason}")]
    NotProtected {
        /// Object key that was checked.
        key: String,
        /// Why the object failed the protection check.
        reason: String,
    },

    /// The cloud tier denied an operation.
    #[error("access denied: {operation}")]
    AccessDenied {
        /// The operation that was refused.
        operation: String,
    },

    /// The negative-control delete unexpectedly succeeded. This means the
    /// cloud tier is misconfigured and content is not tamper-evident.
    #[error("protection bypassed: ordinary-credential delete of '{key}' succeeded")]
    ProtectionBypassed {
        /// Object key whose protection failed.
        key: String,
    },

    /// Second-factor exchange failed (bad, expired, or reused code).
    #[error("MFA exchange failed: {reason}")]
    MfaError {
        /// Why the exchange was refused.
        reason: String,
    },

    /// Declarative infrastructure apply failed. Aborts the workflow before
    /// any upload proceeds.
    #[error("provisioning failed: {reason}")]
    ProvisioningError {
        /// Failure detail from the provisioning boundary.
        reason: String,
    },
}

impl CofferError {
    /// Convenience constructor for `InvalidInput`.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        CofferError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for `AccessDenied`.
    pub fn access_denied(operation: impl Into<String>) -> Self {
        CofferError::AccessDenied {
            operation: operation.into(),
        }
    }

    /// Convenience constructor for `MfaError`.
    pub fn mfa(reason: impl Into<String>) -> Self {
        CofferError::MfaError {
            reason: reason.into(),
        }
    }
}
