//! Upload gateway: the single mutating entry point to local storage.
//!
//! Holds the lock state and the catalog behind one mutex so the pair
//! (read lock state, append record) executes as a single critical section.
//! A lock request arriving between an upload's state check and its append
//! is impossible by construction: both paths serialize through the same
//! lock.
//!
//! Uses `parking_lot::Mutex` (no lock poisoning, short critical sections).

use parking_lot::Mutex;

use crate::auth::AuthGuard;
use crate::constants::MAX_UPLOAD_BYTES;
use crate::error::CofferError;
use crate::vault::catalog::{validate_file_name, Catalog, FileRecord};
use crate::vault::state::VaultState;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lock state snapshot returned from transitions and status reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStatus {
    /// Whether the vault currently refuses writes.
    pub locked: bool,
    /// When the state last changed.
    pub changed_at: DateTime<Utc>,
}

/// State guarded by the single vault mutex.
struct VaultInner {
    state: VaultState,
    catalog: Catalog,
}

/// Accepts or rejects file writes based on lock state and authentication.
///
/// All mutation of local vault state flows through this type; read paths
/// (`list_files`, `lock_status`) take the same mutex, so a read immediately
/// following a successful append observes that record.
pub struct UploadGateway {
    auth: AuthGuard,
    inner: Mutex<VaultInner>,
}

impl UploadGateway {
    /// Create a gateway that starts locked with an empty catalog.
    pub fn new(auth: AuthGuard) -> Self {
        Self {
            auth,
            inner: Mutex::new(VaultInner {
                state: VaultState::new(),
                catalog: Catalog::new(),
            }),
        }
    }

    /// Transition the vault lock. Requires the owner credential.
    pub fn set_lock(&self, credential: &str, locked: bool) -> Result<LockStatus, CofferError> {
        let principal = self.auth.authorize(credential)?;

        let mut inner = self.inner.lock();
        inner.state.transition(&principal, locked);
        Ok(LockStatus {
            locked: inner.state.locked(),
            changed_at: inner.state.last_transition_at(),
        })
    }

    /// Accept an upload if the caller is authorized, the vault is unlocked,
    /// and the input is well-formed.
    ///
    /// On success the record is appended to the catalog and returned.
    /// Re-upload of an existing name is rejected with `DuplicateName`;
    /// records are never overwritten.
    pub fn accept_upload(
        &self,
        credential: &str,
        name: &str,
        content: &[u8],
    ) -> Result<FileRecord, CofferError> {
        self.auth.authorize(credential)?;

        validate_file_name(name)?;
        if content.is_empty() {
            return Err(CofferError::invalid_input("upload payload cannot be empty"));
        }
        if content.len() > MAX_UPLOAD_BYTES {
            return Err(CofferError::invalid_input(format!(
                "upload exceeds {} bytes",
                MAX_UPLOAD_BYTES
            )));
        }

        // Checksum outside the critical section; the gate and the append
        // stay inside it.
        let record = FileRecord::new(name, content);

        let mut inner = self.inner.lock();
        if inner.state.locked() {
            tracing::warn!(name, "upload refused: vault is locked");
            return Err(CofferError::Locked);
        }
        if inner.catalog.contains_name(name) {
            return Err(CofferError::DuplicateName {
                name: name.to_string(),
            });
        }
        inner.catalog.append(record.clone());
        tracing::info!(
            name,
            checksum = %record.checksum,
            size_bytes = record.size_bytes,
            "upload accepted"
        );
        Ok(record)
    }

    /// All accepted records in insertion order. Unauthenticated read path.
    pub fn list_files(&self) -> Vec<FileRecord> {
        self.inner.lock().catalog.list()
    }

    /// Current lock status. Unauthenticated read path.
    pub fn lock_status(&self) -> LockStatus {
        let inner = self.inner.lock();
        LockStatus {
            locked: inner.state.locked(),
            changed_at: inner.state.last_transition_at(),
        }
    }

    /// Number of records in the catalog.
    pub fn catalog_len(&self) -> usize {
        self.inner.lock().catalog.len()
    }
}
