use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use zipmarket_rs::api::{build_router, AppState};
use zipmarket_rs::config::AppConfig;
use zipmarket_rs::market_data::adapters::redfin::RedfinProvider;
use zipmarket_rs::market_data::orchestrator::MarketAnalysisService;
use zipmarket_rs::persist::memory::InMemoryMarketCache;
use zipmarket_rs::persist::postgres::PostgresMarketCache;
use zipmarket_rs::persist::MarketCacheStore;
use zipmarket_rs::telemetry;

#[derive(Debug, Parser)]
#[command(name = "zipmarket", version, about = "Market analysis API with cached, degradable lookups")]
struct Cli {
    /// Optional settings file (toml/yaml/json); env vars still win
    #[arg(long, env = "ZIPMARKET_CONFIG")]
    config: Option<String>,

    /// Overrides `bind_addr` from settings
    #[arg(long, env = "ZIPMARKET_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    telemetry::init_tracing("info,zipmarket_rs=debug")?;
    telemetry::init_metrics(telemetry::DEFAULT_METRICS_ADDR.into())?;

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    let bind_addr = cli.bind.unwrap_or_else(|| cfg.bind_addr.clone());

    // Postgres when configured, process memory otherwise
    let store: Arc<dyn MarketCacheStore> = match &cfg.database_url {
        Some(url) => {
            let pg = PostgresMarketCache::connect(url).await?;
            pg.ensure_schema().await?;
            info!("market cache backed by postgres");
            Arc::new(pg)
        }
        None => {
            warn!("DATABASE_URL not set; market cache is in-memory and lost on restart");
            Arc::new(InMemoryMarketCache::new())
        }
    };

    let provider = RedfinProvider::new(
        &cfg.market_data_base_url,
        cfg.market_data_api_key.clone(),
        cfg.provider_timeout(),
    )?;

    let service = MarketAnalysisService::new(
        store,
        Arc::new(provider),
        cfg.cache_duration(),
        cfg.demand_weights,
    );
    info!(cache_days = cfg.cache_duration_days, provider = %cfg.market_data_base_url, "market analysis service ready");

    let app = build_router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
