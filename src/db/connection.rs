use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Postgres, Row, Sqlite, Transaction};

/// The supported relational engines. Selection is a configuration-time
/// decision; adding an engine means adding one more variant here and in
/// `DbPool`/`DbTransaction`, the writer is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

impl FromStr for DbEngine {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbEngine::Postgres),
            "sqlite" => Ok(DbEngine::Sqlite),
            other => anyhow::bail!("unsupported database engine: {other}"),
        }
    }
}

impl std::fmt::Display for DbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbEngine::Postgres => write!(f, "postgres"),
            DbEngine::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// One bind value for a parameterized statement. Owned so statements can be
/// assembled without borrowing from the record tree.
#[derive(Debug, Clone)]
pub enum SqlArg {
    Text(Option<String>),
    Int(Option<i64>),
    Float(Option<f64>),
    Bool(Option<bool>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlArg {
    pub fn text(value: &Option<String>) -> Self {
        SqlArg::Text(value.clone())
    }

    pub fn id(value: i64) -> Self {
        SqlArg::Int(Some(value))
    }

    pub fn opt_id(value: Option<i64>) -> Self {
        SqlArg::Int(value)
    }

    pub fn float(value: f64) -> Self {
        SqlArg::Float(Some(value))
    }

    pub fn flag(value: bool) -> Self {
        SqlArg::Bool(Some(value))
    }

    pub fn timestamp(value: Option<DateTime<Utc>>) -> Self {
        SqlArg::Timestamp(value)
    }
}

/// Engine-agnostic connection pool.
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    pub async fn connect(engine: DbEngine, url: &str) -> Result<Self, sqlx::Error> {
        match engine {
            DbEngine::Postgres => Ok(DbPool::Postgres(PgPool::connect(url).await?)),
            DbEngine::Sqlite => {
                let options = SqliteConnectOptions::from_str(url)?
                    .create_if_missing(true)
                    .foreign_keys(true);
                // One connection: processing is sequential per document, and
                // an in-memory database only exists on the connection that
                // created it.
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options)
                    .await?;
                Ok(DbPool::Sqlite(pool))
            }
        }
    }

    pub fn engine(&self) -> DbEngine {
        match self {
            DbPool::Postgres(_) => DbEngine::Postgres,
            DbPool::Sqlite(_) => DbEngine::Sqlite,
        }
    }

    /// Open the per-document transaction.
    pub async fn begin(&self) -> Result<DbTransaction, sqlx::Error> {
        match self {
            DbPool::Postgres(pool) => Ok(DbTransaction::Postgres(pool.begin().await?)),
            DbPool::Sqlite(pool) => Ok(DbTransaction::Sqlite(pool.begin().await?)),
        }
    }

    /// Run a statement outside any transaction (schema bootstrap).
    pub async fn execute_raw(&self, sql: &str) -> Result<(), sqlx::Error> {
        match self {
            DbPool::Postgres(pool) => {
                sqlx::query(sql).execute(pool).await?;
            }
            DbPool::Sqlite(pool) => {
                sqlx::query(sql).execute(pool).await?;
            }
        }
        Ok(())
    }
}

/// A single open transaction, engine resolved at runtime. `$N` placeholders
/// bind positionally on both engines.
pub enum DbTransaction {
    Postgres(Transaction<'static, Postgres>),
    Sqlite(Transaction<'static, Sqlite>),
}

impl DbTransaction {
    /// Run an insert that does not need its generated key.
    pub async fn execute(&mut self, sql: &str, args: &[SqlArg]) -> Result<(), sqlx::Error> {
        match self {
            DbTransaction::Postgres(tx) => {
                bind_pg(sqlx::query(sql), args).execute(&mut **tx).await?;
            }
            DbTransaction::Sqlite(tx) => {
                bind_sqlite(sqlx::query(sql), args).execute(&mut **tx).await?;
            }
        }
        Ok(())
    }

    /// Run an insert and capture the surrogate key of the new row. Postgres
    /// supports `RETURNING id`; SQLite reports `last_insert_rowid()` on the
    /// statement result instead.
    pub async fn insert_returning_id(
        &mut self,
        sql: &str,
        args: &[SqlArg],
    ) -> Result<i64, sqlx::Error> {
        match self {
            DbTransaction::Postgres(tx) => {
                let sql = format!("{sql} RETURNING id");
                let row = bind_pg(sqlx::query(&sql), args).fetch_one(&mut **tx).await?;
                row.try_get::<i64, _>(0)
            }
            DbTransaction::Sqlite(tx) => {
                let result = bind_sqlite(sqlx::query(sql), args).execute(&mut **tx).await?;
                Ok(result.last_insert_rowid())
            }
        }
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        match self {
            DbTransaction::Postgres(tx) => tx.commit().await,
            DbTransaction::Sqlite(tx) => tx.commit().await,
        }
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        match self {
            DbTransaction::Postgres(tx) => tx.rollback().await,
            DbTransaction::Sqlite(tx) => tx.rollback().await,
        }
    }
}

fn bind_pg<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    args: &[SqlArg],
) -> Query<'q, Postgres, PgArguments> {
    for arg in args {
        query = match arg {
            SqlArg::Text(value) => query.bind(value.clone()),
            SqlArg::Int(value) => query.bind(*value),
            SqlArg::Float(value) => query.bind(*value),
            SqlArg::Bool(value) => query.bind(*value),
            SqlArg::Timestamp(value) => query.bind(*value),
        };
    }
    query
}

fn bind_sqlite<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: &[SqlArg],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlArg::Text(value) => query.bind(value.clone()),
            SqlArg::Int(value) => query.bind(*value),
            SqlArg::Float(value) => query.bind(*value),
            SqlArg::Bool(value) => query.bind(*value),
            SqlArg::Timestamp(value) => query.bind(*value),
        };
    }
    query
}
