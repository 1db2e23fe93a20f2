//! UDP media driver receiver binary.
//!
//! # Usage
//!
//! ```bash
//! media-driver --bind 0.0.0.0:40001 --max-subscriptions 4096
//! ```

use clap::Parser;
use media_driver::{Receiver, ReceiverRuntimeConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// UDP media driver receive path.
#[derive(Parser, Debug)]
#[command(name = "media-driver")]
#[command(about = "UDP media driver receive path")]
#[command(version)]
struct Args {
    /// Address to bind the UDP socket to.
    #[arg(short, long, default_value = "0.0.0.0:40001")]
    bind: String,

    /// Soft cap on concurrently subscribed channels.
    #[arg(long, default_value = "4096")]
    max_subscriptions: usize,

    /// Log level (trace, debug, info, warn, error). Overridden by `RUST_LOG`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("media driver starting");
    tracing::info!("binding to {}", args.bind);

    let config = ReceiverRuntimeConfig {
        bind_address: args.bind,
        max_subscriptions: args.max_subscriptions,
        ..Default::default()
    };

    let receiver = Receiver::bind(config).await?;
    tracing::info!("listening on {}", receiver.local_addr()?);

    receiver.run().await?;

    Ok(())
}
