pub mod goals;
pub mod transactions;

use std::str::FromStr;

use anyhow::Context;
use bigdecimal::BigDecimal;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{config::Config, error::AppResult, models::parse_amount};

/// Opens the sqlite pool, creating the database file when it does not exist yet.
pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("invalid database url '{}'", config.database_url))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("cannot open database '{}'", config.database_url))
}

/// Adds up amounts fetched as text. An empty set sums to zero.
pub(crate) fn sum_amounts(amounts: Vec<String>) -> AppResult<BigDecimal> {
    let mut total = BigDecimal::from(0);
    for a in amounts {
        total += parse_amount(&a)?;
    }
    Ok(total)
}

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    use crate::config::Config;

    /// Fresh migrated database in a temp dir. Keep the dir alive for the test.
    pub async fn pool() -> (SqlitePool, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database_url = format!("sqlite://{}", dir.path().join("test.db").display());
        let pool = super::connect(&config).await.unwrap();
        crate::migration::migrate(&pool, &config.migrations_dir)
            .await
            .unwrap();
        (pool, dir)
    }
}
