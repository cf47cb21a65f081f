//! SQLite-backed persistence for versions, offline periods and bugs.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Bug, BugWithVersion, OfflinePeriod, Version, VersionRecord};
use crate::stats;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS versions (
    id           TEXT PRIMARY KEY,
    version      TEXT NOT NULL UNIQUE,
    release_date TEXT NOT NULL,
    is_offline   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS offline_periods (
    id           TEXT PRIMARY KEY,
    version_id   TEXT NOT NULL REFERENCES versions(id) ON DELETE CASCADE,
    offline_date TEXT NOT NULL,
    online_date  TEXT
);

CREATE TABLE IF NOT EXISTS bugs (
    id             TEXT PRIMARY KEY,
    version_id     TEXT NOT NULL REFERENCES versions(id) ON DELETE CASCADE,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL,
    developer_code TEXT NOT NULL,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_periods_version ON offline_periods(version_id);
CREATE INDEX IF NOT EXISTS idx_bugs_version ON bugs(version_id);
"#;

const SELECT_VERSION: &str = "SELECT id, version, release_date, is_offline FROM versions";

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (or create) the database file and make sure the schema exists.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::init(pool).await
    }

    /// In-memory database for tests. Capped at one connection since every
    /// `:memory:` connection is its own database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self> {
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// All versions (newest release first) with bugs and offline periods
    /// attached, periods most-recent-first for the history display.
    pub async fn list_versions(&self) -> Result<Vec<VersionRecord>> {
        let versions: Vec<Version> =
            sqlx::query_as(&format!("{SELECT_VERSION} ORDER BY release_date DESC"))
                .fetch_all(&self.pool)
                .await?;

        let mut records = Vec::with_capacity(versions.len());
        for version in versions {
            let bugs: Vec<Bug> = sqlx::query_as(
                "SELECT id, version_id, title, description, developer_code, created_at \
                 FROM bugs WHERE version_id = ?1 ORDER BY created_at DESC",
            )
            .bind(&version.id)
            .fetch_all(&self.pool)
            .await?;

            let offline_periods: Vec<OfflinePeriod> = sqlx::query_as(
                "SELECT id, version_id, offline_date, online_date \
                 FROM offline_periods WHERE version_id = ?1 ORDER BY offline_date DESC",
            )
            .bind(&version.id)
            .fetch_all(&self.pool)
            .await?;

            let total_offline_ms = stats::total_offline_ms(&offline_periods);
            records.push(VersionRecord {
                version,
                bugs,
                offline_periods,
                total_offline_ms,
            });
        }
        Ok(records)
    }

    pub async fn get_version(&self, id: &str) -> Result<Version> {
        sqlx::query_as(&format!("{SELECT_VERSION} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound("version"))
    }

    /// Insert a new version. A duplicate label surfaces as a distinct
    /// conflict so the UI can say "already exists".
    pub async fn create_version(
        &self,
        label: &str,
        release_date: DateTime<Utc>,
    ) -> Result<Version> {
        let id = Uuid::new_v4().to_string();
        let inserted = sqlx::query(
            "INSERT INTO versions (id, version, release_date, is_offline) VALUES (?1, ?2, ?3, 0)",
        )
        .bind(&id)
        .bind(label)
        .bind(release_date)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => self.get_version(&id).await,
            Err(e) if is_unique_violation(&e) => {
                Err(Error::Conflict(format!("version {label} already exists")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Flip a version's offline flag, recording the transition in its period
    /// history. Both writes run in one transaction so the flag and the
    /// period rows cannot drift apart.
    ///
    /// Going offline always appends a fresh open period, even when one is
    /// already open (the UI only offers the toggle in a consistent state, so
    /// an extra open period means the caller raced itself and the oldest one
    /// stays open). Going online stamps the most recently opened period and
    /// is a silent no-op when none exists; the flag is updated either way.
    pub async fn set_offline(
        &self,
        id: &str,
        offline: bool,
        now: DateTime<Utc>,
    ) -> Result<Version> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<Version> = sqlx::query_as(&format!("{SELECT_VERSION} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(Error::NotFound("version"));
        }

        if offline {
            sqlx::query(
                "INSERT INTO offline_periods (id, version_id, offline_date, online_date) \
                 VALUES (?1, ?2, ?3, NULL)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        } else {
            let open: Option<OfflinePeriod> = sqlx::query_as(
                "SELECT id, version_id, offline_date, online_date FROM offline_periods \
                 WHERE version_id = ?1 AND online_date IS NULL \
                 ORDER BY offline_date DESC LIMIT 1",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(period) = open {
                sqlx::query("UPDATE offline_periods SET online_date = ?1 WHERE id = ?2")
                    .bind(now)
                    .bind(&period.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("UPDATE versions SET is_offline = ?1 WHERE id = ?2")
            .bind(offline)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let updated: Version = sqlx::query_as(&format!("{SELECT_VERSION} WHERE id = ?1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a version; its bugs and offline periods go with it.
    pub async fn delete_version(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM versions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("version"));
        }
        Ok(())
    }

    /// All bugs, newest first, each carrying its version label.
    pub async fn list_bugs(&self) -> Result<Vec<BugWithVersion>> {
        let bugs = sqlx::query_as(
            "SELECT b.id, b.version_id, b.title, b.description, b.developer_code, \
                    b.created_at, v.version \
             FROM bugs b JOIN versions v ON v.id = b.version_id \
             ORDER BY b.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(bugs)
    }

    pub async fn create_bug(
        &self,
        version_id: &str,
        title: &str,
        description: &str,
        developer_code: &str,
    ) -> Result<BugWithVersion> {
        let version = self.get_version(version_id).await?;

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        sqlx::query(
            "INSERT INTO bugs (id, version_id, title, description, developer_code, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&id)
        .bind(version_id)
        .bind(title)
        .bind(description)
        .bind(developer_code)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(BugWithVersion {
            id,
            version_id: version_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            developer_code: developer_code.to_string(),
            created_at,
            version: version.version,
        })
    }

    pub async fn delete_bug(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM bugs WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("bug"));
        }
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
