//! Local tier of the content vault: lock state, catalog, upload gateway.

pub mod catalog;
pub mod gateway;
pub mod state;

pub use catalog::{sha256_hex, validate_file_name, Catalog, FileRecord};
pub use gateway::{LockStatus, UploadGateway};
pub use state::VaultState;
