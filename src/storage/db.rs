use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(Box<sqlx::Error>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(e: sqlx::Error) -> Self {
        DatabaseError::Sqlx(Box::new(e))
    }
}

/// A single column value, either bound as a statement parameter or decoded from a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// One result row, columns in select-list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(pub Vec<SqlValue>);

impl Row {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_int(&self, index: usize) -> Result<i64, DatabaseError> {
        match self.0.get(index) {
            Some(SqlValue::Int(v)) => Ok(*v),
            Some(SqlValue::Text(s)) => s.trim().parse().map_err(|_| {
                DatabaseError::Decode(format!("column {index} is not an integer: '{s}'"))
            }),
            Some(SqlValue::Null) => Err(DatabaseError::Decode(format!("column {index} is NULL"))),
            None => Err(DatabaseError::Decode(format!("column {index} out of range"))),
        }
    }

    pub fn get_text(&self, index: usize) -> Result<String, DatabaseError> {
        match self.0.get(index) {
            Some(SqlValue::Text(s)) => Ok(s.clone()),
            Some(SqlValue::Int(v)) => Ok(v.to_string()),
            Some(SqlValue::Null) => Err(DatabaseError::Decode(format!("column {index} is NULL"))),
            None => Err(DatabaseError::Decode(format!("column {index} out of range"))),
        }
    }
}

/// Outcome of a query: the driver failed, the query matched nothing, or it produced data.
/// Callers branch on all three.
#[derive(Debug)]
pub enum Fetched<T> {
    Failed(DatabaseError),
    NoMatch,
    Found(T),
}

/// Parameterized SQL access to the relational catalog.
///
/// Every implementation runs all statements on one session so that
/// [`DataAccess::last_insert_id_sql`] observes the preceding insert.
#[async_trait]
pub trait DataAccess: Send + Sync {
    /// Run a query expected to return zero or one row.
    async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Fetched<Row>;

    /// Run a query and return every row. An empty result is `NoMatch`.
    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Fetched<Vec<Row>>;

    /// Run a mutating statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DatabaseError>;

    /// Statement returning the identifier generated by the last insert on this session.
    fn last_insert_id_sql(&self) -> &'static str;
}
