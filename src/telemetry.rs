//! Log and metric sinks for the binary. Library code only emits through
//! `tracing` / `metrics` macros and never installs anything itself.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

/// Address the Prometheus scrape endpoint binds when `metrics-exporter` is on.
pub const DEFAULT_METRICS_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 9000);

/// Compact stdout logs. `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    metrics::gauge!("zipmarket_up").set(1.0);
    tracing::info!(%addr, "prometheus exporter listening");
    Ok(())
}

// Counters still compile against the `metrics` facade; they just go nowhere.
#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    tracing::debug!(%addr, "metrics exporter disabled at build time");
    Ok(())
}
