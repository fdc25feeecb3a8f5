//! Remit server binary.
//!
//! # Usage
//!
//! ```bash
//! # Host the registry and the account service on the demo port
//! remit-server --registry 127.0.0.1:1099
//!
//! # Publish under a different name
//! remit-server --registry 127.0.0.1:1099 --service-name Ledger
//! ```

use clap::Parser;
use remit_server::{Server, ServerRuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Remit registry and invocation server
#[derive(Parser, Debug)]
#[command(name = "remit-server")]
#[command(about = "Remit remote-invocation demo server")]
#[command(version)]
struct Args {
    /// Registry address to create or attach to
    #[arg(short, long, default_value = "127.0.0.1:1099")]
    registry: String,

    /// Service name to publish the account under
    #[arg(short, long, default_value = "Account")]
    service_name: String,

    /// Host written into the published remote reference
    #[arg(long, default_value = "127.0.0.1")]
    advertise_host: String,

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

    tracing::info!("Remit server starting");

    let config = ServerRuntimeConfig {
        registry_addr: args.registry,
        service_name: args.service_name,
        advertise_host: args.advertise_host,
        ..Default::default()
    };

    let server = Server::bind(config).await?;

    tracing::info!("publishing {}", server.published_ref());

    server.run().await?;

    Ok(())
}
