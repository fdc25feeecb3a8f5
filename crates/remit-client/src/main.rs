//! Remit client driver binary.
//!
//! Looks up the account service and runs the demo invocation sequence:
//! read name, read balance, write name, write balance, read the combined
//! summary.
//!
//! # Usage
//!
//! ```bash
//! remit-client --registry 127.0.0.1:1099 --service-name Account
//! ```

use std::time::Duration;

use clap::Parser;
use remit_client::{AccountProxy, lookup};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Remit demo client
#[derive(Parser, Debug)]
#[command(name = "remit-client")]
#[command(about = "Remit remote-invocation demo client")]
#[command(version)]
struct Args {
    /// Registry address to look the service up against
    #[arg(short, long, default_value = "127.0.0.1:1099")]
    registry: String,

    /// Service name to resolve
    #[arg(short, long, default_value = "Account")]
    service_name: String,

    /// Per-call timeout in seconds
    #[arg(long, default_value = "5")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let call_timeout = Duration::from_secs(args.timeout_secs);

    tracing::info!("looking up {} at {}", args.service_name, args.registry);
    let target = lookup(&args.registry, &args.service_name, call_timeout).await?;
    tracing::info!("resolved {} -> {}", args.service_name, target);

    let mut proxy = AccountProxy::connect(&target, call_timeout).await?;

    tracing::info!("call account_name");
    tracing::info!("AccountName: {}", proxy.account_name().await?);

    tracing::info!("call balance");
    tracing::info!("Balance: {}", proxy.balance().await?);

    tracing::info!("call set_account_name");
    proxy.set_account_name("Money-Maker").await?;

    tracing::info!("call set_balance");
    proxy.set_balance(10_000_000_000.00).await?;

    tracing::info!("call account_info");
    tracing::info!("{}", proxy.account_info().await?);

    Ok(())
}
