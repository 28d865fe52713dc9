//! `cofferd`: the vault control-plane daemon.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use coffer::auth::AuthGuard;
use coffer::config::{CofferConfig, DeployMode};
use coffer::server::{self, AppState};
use coffer::vault::UploadGateway;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "cofferd", version, about = "Lock-gated content vault control plane")]
struct Cli {
    /// Which tiers this invocation manages.
    #[arg(long, value_enum, default_value_t = DeployMode::Local)]
    mode: DeployMode,

    /// Address the HTTP surface listens on.
    #[arg(long, default_value = "127.0.0.1:8733")]
    listen: SocketAddr,

    /// Cloud bucket name (required for cloud modes).
    #[arg(long)]
    bucket: Option<String>,

    /// Cloud region.
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Owner identity granted bucket ownership (required for cloud modes).
    #[arg(long)]
    owner_arn: Option<String>,

    /// MFA device serial used for session escalation.
    #[arg(long)]
    mfa_serial: Option<String>,

    /// Run provisioning unattended.
    #[arg(long)]
    auto_approve: bool,

    /// Owner bearer secret. Generated from the OS secure RNG when unset.
    #[arg(long, env = "COFFER_OWNER_SECRET", hide_env_values = true)]
    owner_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let (owner_secret, secret_generated) = CofferConfig::resolve_owner_secret(cli.owner_secret)?;
    let config = CofferConfig {
        mode: cli.mode,
        listen_addr: cli.listen,
        bucket_name: cli.bucket,
        region: cli.region,
        owner_arn: cli.owner_arn,
        mfa_serial: cli.mfa_serial,
        auto_approve: cli.auto_approve,
        owner_secret,
        secret_generated,
    };
    config.validate()?;

    if config.secret_generated {
        // Surfaced exactly once so the operator can authenticate; the
        // service itself keeps only the digest.
        println!("Generated owner secret: {}", config.owner_secret);
    }

    let auth = AuthGuard::new(&config.owner_secret);
    let gateway = Arc::new(UploadGateway::new(auth));

    tracing::info!(mode = ?config.mode, "starting coffer control plane");
    server::serve(config.listen_addr, AppState::new(gateway)).await
}
