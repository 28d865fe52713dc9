//! Protocol limits and defaults.

/// Maximum accepted upload size in bytes (32 MiB).
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Maximum file name length in bytes.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Minimum owner secret length. Shorter secrets are rejected at startup.
pub const MIN_OWNER_SECRET_LEN: usize = 32;

/// Number of random bytes in a generated owner secret (hex-encoded to 64).
pub const GENERATED_SECRET_BYTES: usize = 32;

/// Required length of a time-based one-time MFA code.
pub const MFA_CODE_LEN: usize = 6;

/// Default lifetime of an escalated session in seconds (one hour, matching
/// the credential-escalation boundary; not renewable without a fresh code).
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 3600;

/// Default retention period applied by the in-memory cloud tier, in days.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Default attempt count for bounded client-side polling.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;

/// Default delay between polling attempts, in milliseconds.
pub const DEFAULT_POLL_DELAY_MS: u64 = 1000;
