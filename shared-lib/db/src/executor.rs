//! Statement execution against the pool.
//!
//! Each call checks out one connection, runs a single parameterized statement
//! and returns every row together with the column metadata of the result.
//! Rows are turned into typed records with [`QueryOutput::decode_all`], so a
//! stored procedure whose result shape drifts fails with
//! [`DatabaseError::Decode`] instead of producing a half-filled record.

use chrono::NaiveDateTime;
use sqlx::mysql::{MySqlColumn, MySqlRow};
use sqlx::pool::PoolConnection;
use sqlx::{Column, Decode, FromRow, MySql, MySqlConnection, Row, Type, TypeInfo};

use crate::pool::DbPool;
use error::DatabaseError;

/// Positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for SqlParam {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// Column metadata of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub ordinal: usize,
    pub name: String,
    pub type_name: String,
}

impl From<&MySqlColumn> for ColumnDescriptor {
    fn from(column: &MySqlColumn) -> Self {
        Self {
            ordinal: column.ordinal(),
            name: column.name().to_string(),
            type_name: column.type_info().name().to_string(),
        }
    }
}

/// Rows returned by one statement.
///
/// `columns` is read from the first row and is empty when no row came back.
pub struct QueryOutput {
    pub rows: Vec<MySqlRow>,
    pub columns: Vec<ColumnDescriptor>,
}

impl QueryOutput {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Decode every row into `T`, preserving row order.
    pub fn decode_all<T>(&self) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, MySqlRow>,
    {
        self.rows
            .iter()
            .map(|row| T::from_row(row).map_err(|e| self.decode_error(e)))
            .collect()
    }

    /// Decode the first row into `T`, if there is one.
    pub fn decode_first<T>(&self) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, MySqlRow>,
    {
        self.rows
            .first()
            .map(|row| T::from_row(row))
            .transpose()
            .map_err(|e| self.decode_error(e))
    }

    /// Decode the first column of the first row.
    pub fn first_value<T>(&self) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> Decode<'r, MySql> + Type<MySql>,
    {
        self.rows
            .first()
            .map(|row| row.try_get::<T, usize>(0))
            .transpose()
            .map_err(|e| self.decode_error(e))
    }

    fn decode_error(&self, err: sqlx::Error) -> DatabaseError {
        DatabaseError::Decode(format!(
            "{}; result columns: [{}]",
            err,
            self.column_names().join(", ")
        ))
    }
}

/// Check a connection out of `pool`. It returns to the pool when dropped.
pub async fn acquire(pool: &DbPool) -> Result<PoolConnection<MySql>, DatabaseError> {
    pool.acquire().await.map_err(map_sqlx_error)
}

/// Run `sql` on a connection checked out of `pool` for the duration of the call.
pub async fn execute(
    pool: &DbPool,
    sql: &str,
    params: &[SqlParam],
) -> Result<QueryOutput, DatabaseError> {
    let mut conn = acquire(pool).await?;
    execute_on(&mut conn, sql, params).await
}

/// Run `sql` on a connection the caller already holds.
///
/// Needed when a follow-up statement depends on session state left by the
/// first one, such as `LAST_INSERT_ID()`.
pub async fn execute_on(
    conn: &mut MySqlConnection,
    sql: &str,
    params: &[SqlParam],
) -> Result<QueryOutput, DatabaseError> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = match param {
            SqlParam::Int(value) => query.bind(*value),
            SqlParam::Text(value) => query.bind(value.clone()),
            SqlParam::DateTime(value) => query.bind(*value),
        };
    }

    let rows = query.fetch_all(&mut *conn).await.map_err(|e| {
        tracing::debug!(sql, error = %e, "statement failed");
        map_sqlx_error(e)
    })?;
    tracing::debug!(sql, rows = rows.len(), "statement executed");

    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(ColumnDescriptor::from).collect())
        .unwrap_or_default();

    Ok(QueryOutput { rows, columns })
}

/// Classify a driver error.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> DatabaseError {
    match &err {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => DatabaseError::ConnectionFailed(err.to_string()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DatabaseError::DuplicateEntry(db_err.message().to_string())
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_) => DatabaseError::Decode(err.to_string()),
        _ => DatabaseError::QueryFailed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn empty_output() -> QueryOutput {
        QueryOutput {
            rows: Vec::new(),
            columns: Vec::new(),
        }
    }

    #[test]
    fn test_param_conversions() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(SqlParam::from(7_i64), SqlParam::Int(7));
        assert_eq!(SqlParam::from("A"), SqlParam::Text("A".to_string()));
        assert_eq!(SqlParam::from(at), SqlParam::DateTime(at));
    }

    #[test]
    fn test_empty_output_decodes_to_nothing() {
        #[derive(sqlx::FromRow)]
        struct One {
            #[allow(dead_code)]
            uno: i64,
        }

        let output = empty_output();
        assert!(output.is_empty());
        assert!(output.decode_all::<One>().unwrap().is_empty());
        assert!(output.decode_first::<One>().unwrap().is_none());
        assert!(output.first_value::<u64>().unwrap().is_none());
    }

    #[test]
    fn test_error_classification() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            DatabaseError::ConnectionFailed(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            DatabaseError::NotFound
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::ColumnNotFound("estado".to_string())),
            DatabaseError::Decode(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::Protocol("bad packet".to_string())),
            DatabaseError::QueryFailed(_)
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_execute_returns_rows_and_columns() {
        let config = crate::DbConfig::from_env().expect("DB_* variables required");
        let pool = crate::create_pool(&config).await.expect("pool creation failed");

        let output = execute(&pool, "SELECT ? AS uno, ? AS nombre", &[1_i64.into(), "A".into()])
            .await
            .expect("query failed");

        assert_eq!(output.len(), 1);
        assert_eq!(output.column_names(), vec!["uno", "nombre"]);
        assert_eq!(output.first_value::<i64>().unwrap(), Some(1));
    }
}
