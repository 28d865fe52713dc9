//! Bearer-credential authorization against the single owner secret.
//!
//! There is exactly one identity in this system: the vault owner. A request
//! is either presented with the owner secret or it is rejected. The guard
//! keeps only the SHA-256 digest of the secret and compares digests in
//! constant time, so a partial match leaks nothing through timing.

use sha2::{Digest, Sha256};

use crate::error::CofferError;

/// Proof that a request carried the owner secret.
///
/// Can only be minted by [`AuthGuard::authorize`]; components that require
/// an authorized caller take this by reference instead of re-checking the
/// raw credential.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedPrincipal {
    _private: (),
}

/// Validates bearer credentials against the configured owner secret.
///
/// Pure check, no side effects. The raw secret is not retained.
pub struct AuthGuard {
    owner_secret_hash: [u8; 32],
}

impl AuthGuard {
    /// Create a guard for the given owner secret.
    pub fn new(owner_secret: &str) -> Self {
        Self {
            owner_secret_hash: digest(owner_secret.as_bytes()),
        }
    }

    /// Check a presented bearer credential.
    ///
    /// Returns an [`AuthorizedPrincipal`] on match, `Unauthorized` otherwise.
    pub fn authorize(&self, credential: &str) -> Result<AuthorizedPrincipal, CofferError> {
        let presented = digest(credential.as_bytes());
        if constant_time_eq(&presented, &self.owner_secret_hash) {
            Ok(AuthorizedPrincipal { _private: () })
        } else {
            Err(CofferError::Unauthorized)
        }
    }
}

/// SHA-256 digest of the input.
fn digest(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Constant-time comparison of two digests (no early exit).
fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_secret_authorizes() {
        let guard = AuthGuard::new("correct-horse-battery-staple-0123456789");
        assert!(guard
            .authorize("correct-horse-battery-staple-0123456789")
            .is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let guard = AuthGuard::new("correct-horse-battery-staple-0123456789");
        assert_eq!(
            guard.authorize("wrong-secret").unwrap_err(),
            CofferError::Unauthorized
        );
    }

    #[test]
    fn test_empty_credential_rejected() {
        let guard = AuthGuard::new("correct-horse-battery-staple-0123456789");
        assert_eq!(guard.authorize("").unwrap_err(), CofferError::Unauthorized);
    }

    #[test]
    fn test_prefix_of_secret_rejected() {
        let guard = AuthGuard::new("correct-horse-battery-staple-0123456789");
        assert!(guard.authorize("correct-horse").is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [0xAAu8; 32];
        let mut b = a;
        assert!(constant_time_eq(&a, &b));
        b[31] ^= 1;
        assert!(!constant_time_eq(&a, &b));
    }
}
