//! Owner secret generation.
//!
//! Single dependency on the OS secure random source. There is deliberately
//! no fallback path: if the RNG cannot be read, startup fails.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::GENERATED_SECRET_BYTES;

use super::ConfigError;

/// Generate a fresh owner secret from the OS secure RNG.
///
/// Returns a hex string of [`GENERATED_SECRET_BYTES`] random bytes.
pub fn generate_owner_secret() -> Result<String, ConfigError> {
    let mut bytes = [0u8; GENERATED_SECRET_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| ConfigError::EntropyUnavailable {
            reason: e.to_string(),
        })?;
    Ok(hex::encode(bytes))
}
