//! Database entities as they travel between the store, the stats module and
//! the JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tracked software release, identified by a unique label.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Version {
    pub id: String,
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub is_offline: bool,
}

/// A time interval during which a version was marked unavailable. Open while
/// `online_date` is null.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OfflinePeriod {
    pub id: String,
    pub version_id: String,
    pub offline_date: DateTime<Utc>,
    pub online_date: Option<DateTime<Utc>>,
}

impl OfflinePeriod {
    /// Length in milliseconds, present only once the period has closed.
    pub fn duration_ms(&self) -> Option<i64> {
        self.online_date
            .map(|online| (online - self.offline_date).num_milliseconds())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bug {
    pub id: String,
    pub version_id: String,
    pub title: String,
    pub description: String,
    pub developer_code: String,
    pub created_at: DateTime<Utc>,
}

/// Bug row joined with the label of the version it was reported against.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BugWithVersion {
    pub id: String,
    pub version_id: String,
    pub title: String,
    pub description: String,
    pub developer_code: String,
    pub created_at: DateTime<Utc>,
    pub version: String,
}

/// A version with its relations attached, as handed to the stats module and
/// the dashboard. Periods come most-recent-first, bugs newest-first.
#[derive(Debug, Clone, Serialize)]
pub struct VersionRecord {
    #[serde(flatten)]
    pub version: Version,
    pub bugs: Vec<Bug>,
    pub offline_periods: Vec<OfflinePeriod>,
    pub total_offline_ms: i64,
}

impl VersionRecord {
    pub fn bug_count(&self) -> usize {
        self.bugs.len()
    }
}
