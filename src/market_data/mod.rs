// Market data module entrypoint
pub mod adapters;      // provider clients (e.g. Redfin)
pub mod fallback;      // synthetic data when nothing else answers
pub mod normaliser;    // free-text location -> ZIP
pub mod orchestrator;  // cache / live / stale / synthetic ladder
pub mod transform;     // provider payload -> MarketData + demand score
pub mod types;
