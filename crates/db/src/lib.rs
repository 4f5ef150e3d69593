//! Database crate: owns the SQLite pool and applies module schema steps at startup.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

const SCHEMA_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    module     TEXT NOT NULL,
    id         TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (module, id)
);";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to connect to database '{url}': {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("schema step {module}/{id} failed: {source}")]
    Schema {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("database error: {0}")]
    Query(#[from] sqlx::Error),
}

/// One schema statement batch contributed by a module.
#[derive(Debug, Clone, Copy)]
pub struct SchemaStep<'a> {
    pub module: &'a str,
    pub id: &'a str,
    pub sql: &'a str,
}

/// Cloneable handle to the connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for `url`, creating the database file if needed.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| DbError::Connect {
                url: url.to_string(),
                source,
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|source| DbError::Connect {
                url: url.to_string(),
                source,
            })?;

        tracing::info!(target: "bookshelf-db", url, max_connections, "database pool ready");
        Ok(Self { pool })
    }

    /// Private in-memory database. Pinned to a single connection that never
    /// expires, since every new SQLite memory connection starts empty.
    pub async fn in_memory() -> Result<Self, DbError> {
        let url = "sqlite::memory:";
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| DbError::Connect {
                url: url.to_string(),
                source,
            })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|source| DbError::Connect {
                url: url.to_string(),
                source,
            })?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(target: "bookshelf-db", "database pool closed");
    }

    /// Run every step not yet recorded in `schema_migrations`, each in its own
    /// transaction. Returns how many steps ran.
    pub async fn apply_schema(&self, steps: &[SchemaStep<'_>]) -> Result<usize, DbError> {
        sqlx::raw_sql(SCHEMA_TABLE).execute(&self.pool).await?;

        let mut applied = 0;
        for step in steps {
            let seen: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM schema_migrations WHERE module = ? AND id = ?",
            )
            .bind(step.module)
            .bind(step.id)
            .fetch_one(&self.pool)
            .await?;

            if seen > 0 {
                tracing::debug!(target: "bookshelf-db", module = step.module, id = step.id, "schema step already applied");
                continue;
            }

            let schema_err = |source| DbError::Schema {
                module: step.module.to_string(),
                id: step.id.to_string(),
                source,
            };

            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(step.sql)
                .execute(&mut *tx)
                .await
                .map_err(schema_err)?;
            sqlx::query("INSERT INTO schema_migrations (module, id) VALUES (?, ?)")
                .bind(step.module)
                .bind(step.id)
                .execute(&mut *tx)
                .await
                .map_err(schema_err)?;
            tx.commit().await?;

            tracing::info!(target: "bookshelf-db", module = step.module, id = step.id, "schema step applied");
            applied += 1;
        }

        Ok(applied)
    }
}
