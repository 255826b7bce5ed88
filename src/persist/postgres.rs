//! Postgres-backed market cache (`market_data_cache` table).
//!
//! Uniqueness of (location_key, property_type, data_type) lives in the database;
//! `upsert` relies on `ON CONFLICT` so concurrent writers never need app-level locks.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::market_data::types::MarketData;
use crate::persist::{CacheKey, CacheRecord, CacheResult, MarketCacheStore};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS market_data_cache (
        id            BIGSERIAL PRIMARY KEY,
        location_key  TEXT        NOT NULL,
        property_type TEXT        NOT NULL,
        data_type     TEXT        NOT NULL,
        raw_data      JSONB       NOT NULL,
        parsed_data   JSONB       NOT NULL,
        fetched_at    TIMESTAMPTZ NOT NULL,
        expires_at    TIMESTAMPTZ NOT NULL
    )
"#;

const CREATE_UNIQUE_INDEX: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS market_data_cache_key_idx
    ON market_data_cache (location_key, property_type, data_type)
"#;

pub struct PostgresMarketCache {
    pool: PgPool,
}

impl PostgresMarketCache {
    pub async fn connect(database_url: &str) -> CacheResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> CacheResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_UNIQUE_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    fn record_from_row(row: &sqlx::postgres::PgRow) -> CacheResult<CacheRecord> {
        let parsed: serde_json::Value = row.try_get("parsed_data")?;
        let parsed_data: MarketData = serde_json::from_value(parsed)?;

        Ok(CacheRecord {
            key: CacheKey {
                location_key: row.try_get("location_key")?,
                property_type: row.try_get("property_type")?,
                data_type: row.try_get("data_type")?,
            },
            raw_data: row.try_get("raw_data")?,
            parsed_data,
            fetched_at: row.try_get("fetched_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }
}

#[async_trait::async_trait]
impl MarketCacheStore for PostgresMarketCache {
    async fn find_fresh(&self, key: &CacheKey, now: DateTime<Utc>) -> CacheResult<Option<CacheRecord>> {
        let row = sqlx::query(
            r#"
            SELECT location_key, property_type, data_type, raw_data, parsed_data, fetched_at, expires_at
            FROM market_data_cache
            WHERE location_key = $1 AND property_type = $2 AND data_type = $3
              AND expires_at > $4
            ORDER BY fetched_at DESC
            LIMIT 1
            "#,
        )
        .bind(&key.location_key)
        .bind(&key.property_type)
        .bind(&key.data_type)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn find_latest(&self, key: &CacheKey) -> CacheResult<Option<CacheRecord>> {
        let row = sqlx::query(
            r#"
            SELECT location_key, property_type, data_type, raw_data, parsed_data, fetched_at, expires_at
            FROM market_data_cache
            WHERE location_key = $1 AND property_type = $2 AND data_type = $3
            ORDER BY fetched_at DESC
            LIMIT 1
            "#,
        )
        .bind(&key.location_key)
        .bind(&key.property_type)
        .bind(&key.data_type)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn upsert(&self, record: &CacheRecord) -> CacheResult<()> {
        let parsed = serde_json::to_value(&record.parsed_data)?;

        sqlx::query(
            r#"
            INSERT INTO market_data_cache
                (location_key, property_type, data_type, raw_data, parsed_data, fetched_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (location_key, property_type, data_type) DO UPDATE SET
                raw_data = EXCLUDED.raw_data,
                parsed_data = EXCLUDED.parsed_data,
                fetched_at = EXCLUDED.fetched_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(&record.key.location_key)
        .bind(&record.key.property_type)
        .bind(&record.key.data_type)
        .bind(&record.raw_data)
        .bind(parsed)
        .bind(record.fetched_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fallback::synthesize_at;
    use chrono::Duration;

    // Needs a scratch database: TEST_DATABASE_URL=postgres://... cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_upsert_round_trip() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL");
        let pool = PgPool::connect(&url).await.unwrap();
        let store = PostgresMarketCache::from_pool(pool);
        store.ensure_schema().await.unwrap();

        // Postgres keeps microseconds; trim so the round trip compares equal
        let now = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
        let key = CacheKey::new("00501", "Single Family Home", "sale");
        let mut rec = CacheRecord {
            key: key.clone(),
            raw_data: serde_json::json!({ "median_sale_price": 1.0 }),
            parsed_data: synthesize_at("Holtsville NY 00501", "Single Family Home", now),
            fetched_at: now,
            expires_at: now - Duration::days(1),
        };
        store.upsert(&rec).await.unwrap();
        assert!(store.find_fresh(&key, now).await.unwrap().is_none());

        rec.expires_at = now + Duration::days(14);
        rec.parsed_data.median_price = 2.0;
        store.upsert(&rec).await.unwrap();

        let got = store.find_fresh(&key, now).await.unwrap().unwrap();
        assert_eq!(got.parsed_data.median_price, 2.0);
        assert_eq!(got.expires_at, rec.expires_at);
    }
}
