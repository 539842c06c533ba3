//! sysgraph — scrolling CPU / memory / disk graphs in a Wayland overlay.
//!
//! Run with:  `RUST_LOG=info sysgraph`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging: RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("sysgraph v{} starting", env!("CARGO_PKG_VERSION"));

    sysgraph_overlay::run().map_err(Into::into)
}
