use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{MySql, Pool, Row as _};

use super::db::{DataAccess, DatabaseError, Fetched, Row, SqlValue};
use super::driver::{affected, bind_params, fetched_all, fetched_one};
use crate::config::RdsConfig;

/// MySQL-backed catalog (Amazon RDS in production).
pub struct MySqlDatabase {
    pool: Pool<MySql>,
}

impl MySqlDatabase {
    /// Connect to the server described by the `[rds]` section.
    ///
    /// The pool holds exactly one connection that is never recycled, so an insert and the
    /// following `LAST_INSERT_ID()` always share a session.
    pub async fn connect(rds: &RdsConfig) -> Result<Self, DatabaseError> {
        let opts = MySqlConnectOptions::new()
            .host(&rds.endpoint)
            .port(rds.port_number)
            .username(&rds.user_name)
            .password(&rds.user_pwd)
            .database(&rds.db_name);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(opts)
            .await?;

        tracing::info!(endpoint = %rds.endpoint, db = %rds.db_name, "Connected to MySQL");
        Ok(Self { pool })
    }
}

fn decode_column(row: &MySqlRow, index: usize) -> Result<SqlValue, DatabaseError> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Int));
    }
    // LAST_INSERT_ID() is BIGINT UNSIGNED
    if let Ok(v) = row.try_get::<Option<u64>, _>(index) {
        return match v {
            None => Ok(SqlValue::Null),
            Some(v) => i64::try_from(v)
                .map(SqlValue::Int)
                .map_err(|_| DatabaseError::Decode(format!("column {index} overflows i64: {v}"))),
        };
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map_or(SqlValue::Null, SqlValue::Text));
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return Ok(v.map_or(SqlValue::Null, |b| {
            SqlValue::Text(String::from_utf8_lossy(&b).into_owned())
        }));
    }
    Err(DatabaseError::Decode(format!(
        "column {index} has an unsupported type"
    )))
}

fn decode_row(row: &MySqlRow) -> Result<Row, DatabaseError> {
    (0..row.len())
        .map(|i| decode_column(row, i))
        .collect::<Result<Vec<_>, _>>()
        .map(Row)
}

#[async_trait]
impl DataAccess for MySqlDatabase {
    async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Fetched<Row> {
        let result = bind_params(sqlx::query::<MySql>(sql), params)
            .fetch_optional(&self.pool)
            .await;
        fetched_one(result, decode_row)
    }

    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Fetched<Vec<Row>> {
        let result = bind_params(sqlx::query::<MySql>(sql), params)
            .fetch_all(&self.pool)
            .await;
        fetched_all(result, decode_row)
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DatabaseError> {
        let result = bind_params(sqlx::query::<MySql>(sql), params)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected());
        affected(result)
    }

    fn last_insert_id_sql(&self) -> &'static str {
        "SELECT LAST_INSERT_ID()"
    }
}
