use super::{require, CatalogError};
use crate::storage::schema::{COUNT_ASSETS, COUNT_USERS};
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub bucket_name: String,
    pub object_count: u64,
    pub endpoint: String,
    pub user_count: i64,
    pub asset_count: i64,
}

/// Object count of the bucket plus row counts of the catalog tables.
pub async fn stats(state: &AppState) -> Result<Stats, CatalogError> {
    let object_count = state.object_store.count().await?;

    let users = require(
        state.db.fetch_one(COUNT_USERS, &[]).await,
        "user count returned no row",
    )?;
    let assets = require(
        state.db.fetch_one(COUNT_ASSETS, &[]).await,
        "asset count returned no row",
    )?;

    let stats = Stats {
        bucket_name: state.config.s3.bucket_name.clone(),
        object_count,
        endpoint: state.config.rds.endpoint.clone(),
        user_count: users.get_int(0)?,
        asset_count: assets.get_int(0)?,
    };
    tracing::debug!(?stats, "Collected stats");
    Ok(stats)
}
