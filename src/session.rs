//! Escalated-session acquisition via second-factor exchange.
//!
//! Privileged operations against protected cloud objects require a
//! time-boxed credential set obtained by exchanging an MFA device serial
//! and a one-time code at the credential-escalation boundary. The exchange
//! is one-shot: a wrong or reused code fails, it is never retried, and an
//! escalation failure never falls back to an unprivileged attempt of the
//! same operation. Sessions live in process memory only.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::constants::{DEFAULT_SESSION_LIFETIME_SECS, MFA_CODE_LEN};
use crate::error::CofferError;

/// Temporary elevated credential set with a bounded lifetime.
///
/// Never serialized and never persisted to durable storage; dropped at
/// process exit or expiry, whichever comes first. `Debug` redacts the
/// secret material.
#[derive(Clone)]
pub struct EscalatedSession {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expires_at: DateTime<Utc>,
}

impl EscalatedSession {
    /// Assemble a session from broker-issued credentials.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            expires_at,
        }
    }

    /// Temporary access key identifier.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Temporary secret key.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Session token accompanying the key pair.
    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// When the session stops being honored.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the session has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for EscalatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscalatedSession")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Boundary to the external credential-escalation service.
///
/// Implementations exchange an MFA device serial and a one-time code for
/// temporary credentials. The production adapter is external to this crate;
/// [`StaticCredentialBroker`] serves tests and local mode.
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Perform the second-factor exchange.
    async fn assume_escalated(
        &self,
        mfa_serial: &str,
        mfa_code: &str,
    ) -> Result<EscalatedSession, CofferError>;
}

/// Exchanges a second-factor proof for an elevated session.
///
/// Tracks codes it has already forwarded so a reused code is refused
/// locally without consulting the broker again.
pub struct SessionEscalator {
    broker: Arc<dyn CredentialBroker>,
    used_codes: Mutex<HashSet<(String, String)>>,
}

impl SessionEscalator {
    /// Create an escalator over the given broker.
    pub fn new(broker: Arc<dyn CredentialBroker>) -> Self {
        Self {
            broker,
            used_codes: Mutex::new(HashSet::new()),
        }
    }

    /// Exchange `mfa_serial` + `mfa_code` for an [`EscalatedSession`].
    ///
    /// One-shot: the code is marked consumed before the exchange, so a
    /// retry with the same code fails with `MfaError` even if the first
    /// attempt failed.
    pub async fn escalate(
        &self,
        mfa_serial: &str,
        mfa_code: &str,
    ) -> Result<EscalatedSession, CofferError> {
        if mfa_serial.is_empty() {
            return Err(CofferError::mfa("MFA device serial cannot be empty"));
        }
        if mfa_code.len() != MFA_CODE_LEN || !mfa_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(CofferError::mfa(format!(
                "MFA code must be {} digits",
                MFA_CODE_LEN
            )));
        }

        {
            let mut used = self.used_codes.lock();
            if !used.insert((mfa_serial.to_string(), mfa_code.to_string())) {
                tracing::warn!(mfa_serial, "reused MFA code refused");
                return Err(CofferError::mfa("one-time code already used"));
            }
        }

        let session = self.broker.assume_escalated(mfa_serial, mfa_code).await?;
        tracing::info!(
            mfa_serial,
            access_key_id = session.access_key_id(),
            expires_at = %session.expires_at(),
            "escalated session issued"
        );
        Ok(session)
    }
}

/// In-memory broker for tests and local mode.
///
/// Accepts a fixed device serial and an explicit set of currently-valid
/// codes, and mints sessions with a configurable lifetime.
pub struct StaticCredentialBroker {
    serial: String,
    valid_codes: Mutex<HashSet<String>>,
    session_lifetime: Duration,
    issued: Mutex<u64>,
}

impl StaticCredentialBroker {
    /// Create a broker for the given device serial with the default
    /// one-hour session lifetime.
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            valid_codes: Mutex::new(HashSet::new()),
            session_lifetime: Duration::seconds(DEFAULT_SESSION_LIFETIME_SECS),
            issued: Mutex::new(0),
        }
    }

    /// Override the issued session lifetime.
    pub fn with_session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    /// Mark a code as currently valid. A code is consumed when accepted,
    /// mirroring the one-time nature of TOTP codes at the real boundary.
    pub fn accept_code(&self, code: impl Into<String>) {
        self.valid_codes.lock().insert(code.into());
    }

    /// Number of sessions issued so far.
    pub fn issued_count(&self) -> u64 {
        *self.issued.lock()
    }
}

#[async_trait]
impl CredentialBroker for StaticCredentialBroker {
    async fn assume_escalated(
        &self,
        mfa_serial: &str,
        mfa_code: &str,
    ) -> Result<EscalatedSession, CofferError> {
        if mfa_serial != self.serial {
            return Err(CofferError::mfa("unknown MFA device serial"));
        }
        if !self.valid_codes.lock().remove(mfa_code) {
            return Err(CofferError::mfa("invalid or expired one-time code"));
        }

        let mut issued = self.issued.lock();
        *issued += 1;
        let n = *issued;

        Ok(EscalatedSession::new(
            format!("ASIA{:016X}", n),
            format!("secret-{:016x}", rand::random::<u64>()),
            format!("token-{:032x}", rand::random::<u128>()),
            Utc::now() + self.session_lifetime,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escalator() -> (Arc<StaticCredentialBroker>, SessionEscalator) {
        let broker = Arc::new(StaticCredentialBroker::new("arn:aws:iam::123:mfa/owner"));
        let escalator = SessionEscalator::new(broker.clone());
        (broker, escalator)
    }

    #[tokio::test]
    async fn test_valid_code_yields_session() {
        let (broker, escalator) = escalator();
        broker.accept_code("123456");

        let session = escalator
            .escalate("arn:aws:iam::123:mfa/owner", "123456")
            .await
            .expect("escalation succeeds");
        assert!(!session.is_expired(Utc::now()));
        assert!(session.access_key_id().starts_with("ASIA"));
    }

    #[tokio::test]
    async fn test_reused_code_is_refused_without_second_exchange() {
        let (broker, escalator) = escalator();
        broker.accept_code("123456");

        escalator
            .escalate("arn:aws:iam::123:mfa/owner", "123456")
            .await
            .expect("first use succeeds");

        let err = escalator
            .escalate("arn:aws:iam::123:mfa/owner", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::MfaError { .. }));
        assert_eq!(broker.issued_count(), 1, "broker consulted exactly once");
    }

    #[tokio::test]
    async fn test_wrong_code_fails_without_session() {
        let (_broker, escalator) = escalator();
        let err = escalator
            .escalate("arn:aws:iam::123:mfa/owner", "000000")
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::MfaError { .. }));
    }

    #[tokio::test]
    async fn test_malformed_code_rejected_locally() {
        let (broker, escalator) = escalator();
        broker.accept_code("123456");

        for bad in ["", "12345", "1234567", "12345a"] {
            let err = escalator
                .escalate("arn:aws:iam::123:mfa/owner", bad)
                .await
                .unwrap_err();
            assert!(matches!(err, CofferError::MfaError { .. }), "code {:?}", bad);
        }
        assert_eq!(broker.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_serial_rejected() {
        let (broker, escalator) = escalator();
        broker.accept_code("123456");

        let err = escalator
            .escalate("arn:aws:iam::123:mfa/other", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, CofferError::MfaError { .. }));
    }

    #[tokio::test]
    async fn test_session_expiry() {
        let broker = Arc::new(
            StaticCredentialBroker::new("serial").with_session_lifetime(Duration::seconds(-1)),
        );
        broker.accept_code("654321");
        let escalator = SessionEscalator::new(broker);

        let session = escalator.escalate("serial", "654321").await.expect("issued");
        assert!(session.is_expired(Utc::now()));
    }

    #[test]
    fn test_debug_redacts_secret_material() {
        let session = EscalatedSession::new("ASIA1", "supersecret", "tok", Utc::now());
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("supersecret"));
        assert!(!rendered.contains("tok\""));
        assert!(rendered.contains("<redacted>"));
    }
}
