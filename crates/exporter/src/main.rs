//! sysgraph-export — writes `{"cpu": …, "memory": …, "disk": …}` to a JSON
//! file on a fixed interval, for panels that cannot host the overlay.
//!
//! Run with:  `RUST_LOG=info sysgraph-export`

mod export;

use anyhow::Result;
use sysgraph_config::{default_path, load as load_config};
use sysgraph_system::SysinfoSource;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("sysgraph-export v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(default_path())?;
    let s = &config.sampler;
    let source = SysinfoSource::new(s.cpu_window(), s.timeout(), s.disk_mount.clone());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    export::run(&config.export, source, shutdown).await?;
    Ok(())
}
