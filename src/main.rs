//! Cloudflare Fabric CLI
//!
//! Lists, invokes and health-checks the Cloudflare tools from a shell.
//! Configuration is read from the environment by `CloudflareConfig::from_env`;
//! flags given on the command line override it.
//!
//! # Usage
//! ```bash
//! # Print tool definitions
//! cloudflare-fabric tools
//!
//! # Create an A record
//! cloudflare-fabric call cf_create_dns_record \
//!   --args '{"zone_id":"z1","type":"A","name":"x.example.com","content":"1.2.3.4"}'
//!
//! # Check that the token can reach the API
//! cloudflare-fabric health
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cloudflare_fabric::{tools, CloudflareConfig, FabricApp};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser)]
#[command(name = "cloudflare-fabric")]
#[command(about = "Cloudflare zones, DNS, cache, KV and analytics as agent tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Cloudflare API token (overrides CLOUDFLARE_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Default account for KV tools (overrides CLOUDFLARE_ACCOUNT_ID)
    #[arg(long)]
    account_id: Option<String>,

    /// API base URL (overrides CLOUDFLARE_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every tool definition as JSON
    Tools,

    /// Execute one tool
    Call {
        /// Tool name (e.g., cf_list_zones)
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Check that the API is reachable with the configured token
    Health,
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Tools => {
            let definitions: Vec<_> = tools::catalog().iter().map(|t| t.definition()).collect();
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }

        Commands::Call { ref name, ref args } => {
            let args: Value =
                serde_json::from_str(args).context("--args must be a JSON object")?;
            let app = build_app(&cli)?;

            let result = app
                .execute(name, args)
                .await
                .with_context(|| format!("Tool {} failed", name))?;

            println!("{}", serde_json::to_string_pretty(&result)?);
            info!("✅ {} completed", name);
        }

        Commands::Health => {
            let app = build_app(&cli)?;
            let report = app.health().await;

            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_healthy() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn build_app(cli: &Cli) -> Result<FabricApp> {
    let config = apply_overrides(CloudflareConfig::from_env(), cli);
    let app = FabricApp::from_config(config).context("Failed to configure Cloudflare client")?;
    info!("🔐 Cloudflare client ready ({} tools)", app.tools().len());
    Ok(app)
}

fn apply_overrides(mut config: CloudflareConfig, cli: &Cli) -> CloudflareConfig {
    if let Some(token) = &cli.token {
        config = config.with_token(token);
    }
    if let Some(account_id) = cli.account_id.as_deref().filter(|id| !id.is_empty()) {
        config = config.with_account_id(account_id);
    }
    if let Some(api_base) = &cli.api_base {
        config = config.with_api_base(api_base);
    }
    config
}

/// `RUST_LOG` wins; otherwise `--verbose` picks debug over info.
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(log_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
