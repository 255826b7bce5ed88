//! Layered settings: built-in defaults, then an optional config file, then env vars.
//!
//! Env keys are the upper-cased field names (`CACHE_DURATION_DAYS`, `DATABASE_URL`, ...);
//! nested keys use `__`, e.g. `DEMAND_WEIGHTS__PRICE=0.4`.

use config::Map;
use serde::Deserialize;
use thiserror::Error;

use crate::market_data::adapters::redfin::DEFAULT_BASE_URL;
use crate::market_data::orchestrator::DEFAULT_CACHE_DURATION_DAYS;
use crate::market_data::transform::DemandWeights;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("cache_duration_days must be between 1 and 3650, got {0}")]
    InvalidCacheDuration(i64),
}

/// Ten years; anything longer is a typo and would overflow expiry timestamps.
pub const MAX_CACHE_DURATION_DAYS: i64 = 3650;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    /// No URL means the cache lives in process memory only.
    pub database_url: Option<String>,
    pub cache_duration_days: i64,
    pub market_data_base_url: String,
    pub market_data_api_key: Option<String>,
    pub market_data_timeout_secs: u64,
    #[serde(default)]
    pub demand_weights: DemandWeights,
}

impl AppConfig {
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_from(path, None)
    }

    /// Same as `load`, but reads env vars from `env` instead of the process
    /// environment when given.
    pub fn load_from(path: Option<&str>, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:3000")?
            .set_default("cache_duration_days", DEFAULT_CACHE_DURATION_DAYS)?
            .set_default("market_data_base_url", DEFAULT_BASE_URL)?
            .set_default("market_data_timeout_secs", 10)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let cfg: AppConfig = builder
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(1..=MAX_CACHE_DURATION_DAYS).contains(&self.cache_duration_days) {
            return Err(ConfigError::InvalidCacheDuration(self.cache_duration_days));
        }
        Ok(self)
    }

    pub fn cache_duration(&self) -> chrono::Duration {
        chrono::Duration::days(self.cache_duration_days)
    }

    pub fn provider_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.market_data_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(name: &str, body: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("zipmarket-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.toml", name));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn test_defaults_without_env() {
        let cfg = AppConfig::load_from(None, env(&[])).unwrap();
        assert_eq!(cfg.cache_duration_days, 14);
        assert_eq!(cfg.cache_duration(), chrono::Duration::days(14));
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.demand_weights, DemandWeights::default());
    }

    #[test]
    fn test_env_overrides_cache_duration() {
        let cfg = AppConfig::load_from(None, env(&[("CACHE_DURATION_DAYS", "30")])).unwrap();
        assert_eq!(cfg.cache_duration(), chrono::Duration::days(30));
    }

    #[test]
    fn test_env_sets_nested_demand_weight() {
        let cfg = AppConfig::load_from(None, env(&[("DEMAND_WEIGHTS__PRICE", "0.4")])).unwrap();
        assert_eq!(cfg.demand_weights.price, 0.4);
        assert_eq!(cfg.demand_weights.dom, 0.30);
    }

    #[test]
    fn test_env_wins_over_file() {
        let path = write_toml("env-wins", "cache_duration_days = 7\n");
        let cfg = AppConfig::load_from(path.to_str(), env(&[("CACHE_DURATION_DAYS", "21")])).unwrap();
        assert_eq!(cfg.cache_duration_days, 21);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_toml("file-overrides", "cache_duration_days = 7\n[demand_weights]\nprice = 0.5\n");
        let cfg = AppConfig::load_from(path.to_str(), env(&[])).unwrap();
        assert_eq!(cfg.cache_duration(), chrono::Duration::days(7));
        assert_eq!(cfg.demand_weights.price, 0.5);
        assert_eq!(cfg.demand_weights.dom, 0.30);
        assert_eq!(cfg.market_data_timeout_secs, 10);
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let path = write_toml("zero-days", "cache_duration_days = 0\n");
        assert!(matches!(
            AppConfig::load_from(path.to_str(), env(&[])),
            Err(ConfigError::InvalidCacheDuration(0))
        ));
    }

    #[test]
    fn test_rejects_huge_duration() {
        let result = AppConfig::load_from(None, env(&[("CACHE_DURATION_DAYS", "100000000")]));
        assert!(matches!(result, Err(ConfigError::InvalidCacheDuration(100_000_000))));

        let at_limit = AppConfig::load_from(None, env(&[("CACHE_DURATION_DAYS", "3650")])).unwrap();
        assert_eq!(at_limit.cache_duration_days, MAX_CACHE_DURATION_DAYS);
    }
}
