//! Append-only catalog of accepted files.
//!
//! Records are created once, never edited, and never deleted locally.
//! Permanent removal of content is deliberately not a capability of this
//! tier; it only ever happens at the cloud tier through escalated
//! credentials. Listing returns records in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::MAX_FILE_NAME_BYTES;
use crate::error::CofferError;

/// Metadata for one accepted upload. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name as presented by the uploader.
    pub name: String,
    /// Hex-encoded SHA-256 of the file content.
    pub checksum: String,
    /// When the upload was accepted.
    pub uploaded_at: DateTime<Utc>,
    /// Content length in bytes.
    pub size_bytes: u64,
}

impl FileRecord {
    /// Build a record for accepted content. Checksum is computed here.
    pub fn new(name: impl Into<String>, content: &[u8]) -> Self {
        Self {
            name: name.into(),
            checksum: sha256_hex(content),
            uploaded_at: Utc::now(),
            size_bytes: content.len() as u64,
        }
    }
}

/// Hex-encoded SHA-256 digest of the input.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Validate a file name for acceptance.
///
/// Rejects empty names, names longer than [`MAX_FILE_NAME_BYTES`], path
/// separators and traversal components, and control characters.
pub fn validate_file_name(name: &str) -> Result<(), CofferError> {
    if name.is_empty() {
        return Err(CofferError::invalid_input("file name cannot be empty"));
    }
    if name.len() > MAX_FILE_NAME_BYTES {
        return Err(CofferError::invalid_input(format!(
            "file name exceeds {} bytes",
            MAX_FILE_NAME_BYTES
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(CofferError::invalid_input(
            "file name cannot contain path separators",
        ));
    }
    if name == "." || name == ".." {
        return Err(CofferError::invalid_input(
            "file name cannot be a path traversal component",
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(CofferError::invalid_input(
            "file name cannot contain control characters",
        ));
    }
    Ok(())
}

/// Insertion-ordered store of accepted file records.
///
/// Exposes exactly `append` and `list`; there is no delete or update path.
/// Owned by the gateway's mutex, which makes appends linearizable with
/// respect to reads.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<FileRecord>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record with this name already exists.
    pub fn contains_name(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    /// Append a record.
    pub fn append(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<FileRecord> {
        self.records.clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
