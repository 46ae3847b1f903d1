use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row as _, Sqlite};

use super::db::{DataAccess, DatabaseError, Fetched, Row, SqlValue};
use super::driver::{affected, bind_params, fetched_all, fetched_one};
use super::schema::SQLITE_SCHEMA;

/// SQLite-backed catalog for local development and tests.
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    /// Open or create a database file and make sure the catalog tables exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // One connection: last_insert_rowid() is per connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(opts)
            .await?;

        sqlx::raw_sql(SQLITE_SCHEMA).execute(&pool).await?;

        tracing::info!(path = %path.display(), "Opened SQLite catalog");
        Ok(Self { pool })
    }
}

fn decode_column(row: &SqliteRow, index: usize) -> Result<SqlValue, DatabaseError> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Int));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Text));
    }
    Err(DatabaseError::Decode(format!(
        "column {index} has an unsupported type"
    )))
}

fn decode_row(row: &SqliteRow) -> Result<Row, DatabaseError> {
    (0..row.len())
        .map(|i| decode_column(row, i))
        .collect::<Result<Vec<_>, _>>()
        .map(Row)
}

#[async_trait]
impl DataAccess for SqliteDatabase {
    async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Fetched<Row> {
        let result = bind_params(sqlx::query::<Sqlite>(sql), params)
            .fetch_optional(&self.pool)
            .await;
        fetched_one(result, decode_row)
    }

    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Fetched<Vec<Row>> {
        let result = bind_params(sqlx::query::<Sqlite>(sql), params)
            .fetch_all(&self.pool)
            .await;
        fetched_all(result, decode_row)
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DatabaseError> {
        let result = bind_params(sqlx::query::<Sqlite>(sql), params)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected());
        affected(result)
    }

    fn last_insert_id_sql(&self) -> &'static str {
        "SELECT last_insert_rowid()"
    }
}
