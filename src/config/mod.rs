//! Service configuration.
//!
//! Recognized options: deploy mode, bucket name, region, owner identity,
//! MFA device serial, auto-approve flag, and the owner secret. The owner
//! secret is generated from the OS secure RNG when unset; a missing secure
//! source is a hard startup failure, never a downgrade to weaker entropy.

mod error;
mod secret;

pub use error::ConfigError;
pub use secret::generate_owner_secret;

use std::net::SocketAddr;

use clap::ValueEnum;

use crate::constants::MIN_OWNER_SECRET_LEN;

/// Which tiers this invocation manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeployMode {
    /// Local control plane only.
    Local,
    /// Cloud tier only (provision + verify).
    Cloud,
    /// Both tiers.
    Both,
}

/// Resolved configuration for the control-plane service.
#[derive(Debug, Clone)]
pub struct CofferConfig {
    /// Which tiers to manage.
    pub mode: DeployMode,
    /// Address the HTTP surface listens on.
    pub listen_addr: SocketAddr,
    /// Cloud bucket name (required for cloud modes).
    pub bucket_name: Option<String>,
    /// Cloud region.
    pub region: String,
    /// Owner identity granted bucket ownership (required for cloud modes).
    pub owner_arn: Option<String>,
    /// MFA device serial for session escalation.
    pub mfa_serial: Option<String>,
    /// Run provisioning unattended.
    pub auto_approve: bool,
    /// The owner bearer secret.
    pub owner_secret: String,
    /// Whether the secret was generated at startup (and must be surfaced
    /// to the operator once).
    pub secret_generated: bool,
}

impl CofferConfig {
    /// Resolve the owner secret: validate an explicit one, or generate a
    /// fresh one from the OS secure RNG.
    pub fn resolve_owner_secret(
        explicit: Option<String>,
    ) -> Result<(String, bool), ConfigError> {
        match explicit {
            Some(secret) => {
                if secret.len() < MIN_OWNER_SECRET_LEN {
                    return Err(ConfigError::InvalidValue {
                        key: "owner_secret".to_string(),
                        value: "<redacted>".to_string(),
                        reason: format!(
                            "must be at least {} characters",
                            MIN_OWNER_SECRET_LEN
                        ),
                    });
                }
                Ok((secret, false))
            }
            None => Ok((generate_owner_secret()?, true)),
        }
    }

    /// Validate cross-field requirements.
    ///
    /// Cloud modes need a bucket name and an owner identity; escalation
    /// needs an MFA serial.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.mode, DeployMode::Cloud | DeployMode::Both) {
            if self.bucket_name.is_none() {
                return Err(ConfigError::MissingRequired {
                    key: "bucket".to_string(),
                    hint: "cloud modes need a bucket name (--bucket)".to_string(),
                });
            }
            if self.owner_arn.is_none() {
                return Err(ConfigError::MissingRequired {
                    key: "owner-arn".to_string(),
                    hint: "cloud modes need an owner identity (--owner-arn)".to_string(),
                });
            }
            if self.mfa_serial.is_none() {
                return Err(ConfigError::MissingRequired {
                    key: "mfa-serial".to_string(),
                    hint: "privileged cloud operations need an MFA device (--mfa-serial)"
                        .to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(mode: DeployMode) -> CofferConfig {
        CofferConfig {
            mode,
            listen_addr: "127.0.0.1:8733".parse().expect("valid addr"),
            bucket_name: None,
            region: "us-east-1".to_string(),
            owner_arn: None,
            mfa_serial: None,
            auto_approve: false,
            owner_secret: "x".repeat(MIN_OWNER_SECRET_LEN),
            secret_generated: false,
        }
    }

    #[test]
    fn test_explicit_secret_accepted() {
        let (secret, generated) =
            CofferConfig::resolve_owner_secret(Some("s".repeat(MIN_OWNER_SECRET_LEN)))
                .expect("resolves");
        assert_eq!(secret.len(), MIN_OWNER_SECRET_LEN);
        assert!(!generated);
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = CofferConfig::resolve_owner_secret(Some("short".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_unset_secret_is_generated() {
        let (secret, generated) = CofferConfig::resolve_owner_secret(None).expect("generates");
        assert!(generated);
        assert!(secret.len() >= MIN_OWNER_SECRET_LEN);
    }

    #[test]
    fn test_local_mode_needs_no_cloud_options() {
        assert!(base_config(DeployMode::Local).validate().is_ok());
    }

    #[test]
    fn test_cloud_mode_requires_bucket_owner_and_mfa() {
        let mut config = base_config(DeployMode::Cloud);
        assert!(config.validate().is_err());

        config.bucket_name = Some("coffer-vault".to_string());
        assert!(config.validate().is_err());

        config.owner_arn = Some("arn:aws:iam::123:user/owner".to_string());
        assert!(config.validate().is_err());

        config.mfa_serial = Some("arn:aws:iam::123:mfa/owner".to_string());
        assert!(config.validate().is_ok());
    }
}
