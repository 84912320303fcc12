use async_trait::async_trait;
use jiff::Timestamp;
use relink_core::repository::{ReadRepository, Repository, Result};
use relink_core::{LinkRecord, ShortCode, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// SQLite implementation of the repository contract.
///
/// Every mutation is a single conditional statement, so SQLite's own write
/// serialization provides the per-record atomicity: inserts use
/// `ON CONFLICT DO NOTHING`, retargets touch only `target_url` and click
/// increments only `clicks`.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing pool. The schema must already exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `database_url` and applies migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        info!(database_url = %database_url, "sqlite link store ready");
        Ok(repository)
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// The pool is pinned to one never-recycled connection, since every
    /// connection to `sqlite::memory:` sees its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))
    }
}

/// Current time truncated to the millisecond precision of the `created_at` column.
fn now_millis() -> Result<Timestamp> {
    Timestamp::from_millisecond(Timestamp::now().as_millisecond())
        .map_err(|e| StorageError::InvalidData(format!("clock out of range: {e}")))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &SqliteRow) -> Result<LinkRecord> {
    let code: String = row.try_get("code").map_err(map_sqlx_error)?;
    let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;
    let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let clicks_raw: i64 = row.try_get("clicks").map_err(map_sqlx_error)?;

    let code = ShortCode::new(code).map_err(|e| StorageError::InvalidData(e.to_string()))?;
    let created_at = Timestamp::from_millisecond(created_at_raw).map_err(|e| {
        StorageError::InvalidData(format!(
            "invalid created_at timestamp '{}': {e}",
            created_at_raw
        ))
    })?;
    let clicks = u64::try_from(clicks_raw).map_err(|_| {
        StorageError::InvalidData(format!("negative click count {} for {}", clicks_raw, code))
    })?;

    Ok(LinkRecord {
        code,
        target_url,
        created_at,
        clicks,
    })
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(
            r#"
            SELECT code, target_url, created_at, clicks
            FROM links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert_if_absent(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord> {
        let created_at = now_millis()?;

        let result = sqlx::query(
            r#"
            INSERT INTO links (code, target_url, created_at, clicks)
            VALUES (?, ?, ?, 0)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(code.as_str())
        .bind(target_url)
        .bind(created_at.as_millisecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => Ok(LinkRecord {
                code: code.clone(),
                target_url: target_url.to_owned(),
                created_at,
                clicks: 0,
            }),
            Ok(_) => Err(StorageError::Conflict(code.to_string())),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn retarget(&self, code: &ShortCode, target_url: &str) -> Result<LinkRecord> {
        let row = sqlx::query(
            r#"
            UPDATE links
            SET target_url = ?
            WHERE code = ?
            RETURNING code, target_url, created_at, clicks
            "#,
        )
        .bind(target_url)
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => record_from_row(&row),
            None => Err(StorageError::NotFound(code.to_string())),
        }
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE code = ?
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(code.to_string()));
        }
        Ok(())
    }
}
