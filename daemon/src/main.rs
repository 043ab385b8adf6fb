//! Arcana verification daemon — entry point for the verify endpoint.

use arcana_chain::HttpChainRpc;
use arcana_rpc::{RpcServer, VerifierConfig};
use arcana_types::WalletAddress;
use arcana_verification::VerificationService;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arcana-daemon", about = "Arcana payment verification daemon")]
struct Cli {
    /// Port for the HTTP server.
    #[arg(long, env = "ARCANA_RPC_PORT")]
    port: Option<u16>,

    /// Chain RPC node URL.
    #[arg(long, env = "ARCANA_CHAIN_RPC_URL")]
    chain_rpc_url: Option<String>,

    /// Treasury address payments must land on.
    #[arg(long, env = "ARCANA_TREASURY")]
    treasury: Option<String>,

    /// Base delay for verification retries, in milliseconds.
    #[arg(long, env = "ARCANA_RETRY_BASE_DELAY_MS")]
    retry_base_delay_ms: Option<u64>,

    /// Maximum verification attempts per request.
    #[arg(long, env = "ARCANA_RETRY_MAX_ATTEMPTS")]
    retry_max_attempts: Option<u32>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "ARCANA_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    arcana_utils::init_tracing();

    let cli = Cli::parse();

    let file_config: Option<VerifierConfig> = if let Some(ref config_path) = cli.config {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match VerifierConfig::from_toml_str(&contents) {
                Ok(cfg) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {e}, using CLI defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {e}, using CLI defaults",
                    config_path.display()
                );
                None
            }
        }
    } else {
        None
    };

    let base = file_config.unwrap_or_default();
    let config = VerifierConfig {
        rpc_port: cli.port.unwrap_or(base.rpc_port),
        chain_rpc_url: cli.chain_rpc_url.unwrap_or(base.chain_rpc_url),
        treasury: cli.treasury.unwrap_or(base.treasury),
        retry_base_delay_ms: cli
            .retry_base_delay_ms
            .unwrap_or(base.retry_base_delay_ms),
        retry_max_attempts: cli.retry_max_attempts.unwrap_or(base.retry_max_attempts),
        rate_limit_budget: base.rate_limit_budget,
        log_level: cli.log_level,
    };

    // The treasury address has no usable default and must parse.
    let treasury = WalletAddress::parse(config.treasury.as_str())
        .map_err(|e| anyhow::anyhow!("invalid treasury address '{}': {e}", config.treasury))?;

    tracing::info!(
        "Starting Arcana verifier (RPC:{}, chain:{}, treasury:{})",
        config.rpc_port,
        config.chain_rpc_url,
        treasury,
    );

    let chain = HttpChainRpc::new(config.chain_rpc_url.clone())
        .map_err(|e| anyhow::anyhow!("chain RPC client: {e}"))?;
    let server = RpcServer::new(
        config.rpc_port,
        VerificationService::new(chain),
        config.retry_policy(),
        treasury,
    );
    server.start().await?;

    tracing::info!("Arcana daemon exited cleanly");
    Ok(())
}
