//! Plumbing shared by the sqlx drivers: parameter binding and mapping query results onto
//! [`Fetched`].

use sqlx::query::Query;
use sqlx::{Database, Encode, Type};

use super::db::{DatabaseError, Fetched, Row, SqlValue};

pub(super) fn bind_params<'q, DB>(
    mut query: Query<'q, DB, <DB as Database>::Arguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, DB, <DB as Database>::Arguments<'q>>
where
    DB: Database,
    i64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    Option<String>: Encode<'q, DB> + Type<DB>,
{
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Text(s) => query.bind(s.clone()),
        };
    }
    query
}

pub(super) fn fetched_one<R>(
    result: Result<Option<R>, sqlx::Error>,
    decode: fn(&R) -> Result<Row, DatabaseError>,
) -> Fetched<Row> {
    match result {
        Ok(Some(row)) => match decode(&row) {
            Ok(row) => Fetched::Found(row),
            Err(e) => Fetched::Failed(e),
        },
        Ok(None) => Fetched::NoMatch,
        Err(e) => {
            tracing::error!(error = %e, "fetch_one failed");
            Fetched::Failed(e.into())
        }
    }
}

pub(super) fn fetched_all<R>(
    result: Result<Vec<R>, sqlx::Error>,
    decode: fn(&R) -> Result<Row, DatabaseError>,
) -> Fetched<Vec<Row>> {
    match result {
        Ok(rows) if rows.is_empty() => Fetched::NoMatch,
        Ok(rows) => match rows.iter().map(decode).collect::<Result<Vec<_>, _>>() {
            Ok(rows) => Fetched::Found(rows),
            Err(e) => Fetched::Failed(e),
        },
        Err(e) => {
            tracing::error!(error = %e, "fetch_all failed");
            Fetched::Failed(e.into())
        }
    }
}

pub(super) fn affected(result: Result<u64, sqlx::Error>) -> Result<u64, DatabaseError> {
    result
        .inspect_err(|e| tracing::error!(error = %e, "execute failed"))
        .map_err(DatabaseError::from)
}
