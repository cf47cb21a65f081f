//! Aggregate statistics over versions, their offline history and their bugs.
//!
//! Every function here is a pure computation over rows the store already
//! fetched; nothing holds state between calls.

use serde::Serialize;

use crate::model::{OfflinePeriod, VersionRecord};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;

/// How many entries the developer leaderboard keeps.
pub const TOP_DEVELOPER_LIMIT: usize = 5;

/// A duration attributed to the version it belongs to, carrying both the raw
/// millisecond value and the display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDuration {
    pub version: String,
    pub duration_ms: i64,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeveloperCount {
    pub code: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostBuggyVersion {
    pub version: String,
    pub bug_count: usize,
}

/// Everything the stats endpoint reports in one shot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub version_with_most_bugs: Option<MostBuggyVersion>,
    pub top_developers: Vec<DeveloperCount>,
    pub shortest_offline: Option<VersionDuration>,
    pub shortest_online: Option<VersionDuration>,
    pub total_bugs: usize,
    pub total_versions: usize,
    pub active_versions: usize,
}

pub fn dashboard_stats(versions: &[VersionRecord]) -> DashboardStats {
    DashboardStats {
        version_with_most_bugs: version_with_most_bugs(versions),
        top_developers: top_developers(versions, TOP_DEVELOPER_LIMIT),
        shortest_offline: shortest_offline_period(versions),
        shortest_online: shortest_online_interval(versions),
        total_bugs: versions.iter().map(VersionRecord::bug_count).sum(),
        total_versions: versions.len(),
        active_versions: active_version_count(versions),
    }
}

/// Renders a millisecond duration at the two coarsest units that apply:
/// `"3d 4h"`, `"1h 30m"` or `"2m"`.
pub fn format_duration(ms: i64) -> String {
    let days = ms / MS_PER_DAY;
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Total time spent offline, summed over completed periods. An open period
/// contributes nothing until it closes.
pub fn total_offline_ms(periods: &[OfflinePeriod]) -> i64 {
    periods.iter().filter_map(OfflinePeriod::duration_ms).sum()
}

/// The shortest completed offline interval across every version. Open
/// periods never qualify; ties keep the first period encountered.
pub fn shortest_offline_period(versions: &[VersionRecord]) -> Option<VersionDuration> {
    let mut shortest: Option<VersionDuration> = None;

    for record in versions {
        for period in &record.offline_periods {
            let Some(duration_ms) = period.duration_ms() else {
                continue;
            };
            if shortest
                .as_ref()
                .map_or(true, |s| duration_ms < s.duration_ms)
            {
                shortest = Some(VersionDuration {
                    version: record.version.version.clone(),
                    duration_ms,
                    duration: format_duration(duration_ms),
                });
            }
        }
    }

    shortest
}

/// How quickly a version first went offline after its release, minimized
/// across all versions. A version that never went offline has no
/// first-offline latency; a recorded offline event at or before the release
/// date is treated as bad data (clock skew, manual entry) and skipped.
pub fn shortest_online_interval(versions: &[VersionRecord]) -> Option<VersionDuration> {
    let mut shortest: Option<VersionDuration> = None;

    for record in versions {
        let Some(first_offline) = record.offline_periods.iter().map(|p| p.offline_date).min()
        else {
            continue;
        };
        let duration_ms = (first_offline - record.version.release_date).num_milliseconds();
        if duration_ms <= 0 {
            continue;
        }
        if shortest
            .as_ref()
            .map_or(true, |s| duration_ms < s.duration_ms)
        {
            shortest = Some(VersionDuration {
                version: record.version.version.clone(),
                duration_ms,
                duration: format_duration(duration_ms),
            });
        }
    }

    shortest
}

/// The version carrying the most bugs. Ties keep the earliest version in the
/// supplied ordering; when no version has any bugs the first one still wins,
/// which is how the dashboard seeds the comparison.
pub fn version_with_most_bugs(versions: &[VersionRecord]) -> Option<MostBuggyVersion> {
    let mut best = versions.first();

    for record in versions {
        if record.bug_count() > best.map_or(0, |b| b.bug_count()) {
            best = Some(record);
        }
    }

    best.map(|record| MostBuggyVersion {
        version: record.version.version.clone(),
        bug_count: record.bug_count(),
    })
}

/// Bug counts grouped by developer code, highest first, truncated to
/// `limit`. The sort is stable, so equal counts stay in first-reported
/// order. Codes are compared as stored (uppercased at the API boundary).
pub fn top_developers(versions: &[VersionRecord], limit: usize) -> Vec<DeveloperCount> {
    let mut counts: Vec<DeveloperCount> = Vec::new();

    for bug in versions.iter().flat_map(|v| &v.bugs) {
        match counts.iter_mut().find(|c| c.code == bug.developer_code) {
            Some(entry) => entry.count += 1,
            None => counts.push(DeveloperCount {
                code: bug.developer_code.clone(),
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Versions currently online.
pub fn active_version_count(versions: &[VersionRecord]) -> usize {
    versions.iter().filter(|v| !v.version.is_offline).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bug, Version};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn period(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> OfflinePeriod {
        OfflinePeriod {
            id: Uuid::new_v4().to_string(),
            version_id: "v".into(),
            offline_date: start,
            online_date: end,
        }
    }

    fn bug(code: &str) -> Bug {
        Bug {
            id: Uuid::new_v4().to_string(),
            version_id: "v".into(),
            title: "crash".into(),
            description: "it crashed".into(),
            developer_code: code.into(),
            created_at: ts(0),
        }
    }

    fn record(
        label: &str,
        release: DateTime<Utc>,
        periods: Vec<OfflinePeriod>,
        bugs: Vec<Bug>,
    ) -> VersionRecord {
        let total_offline_ms = total_offline_ms(&periods);
        VersionRecord {
            version: Version {
                id: Uuid::new_v4().to_string(),
                version: label.into(),
                release_date: release,
                is_offline: periods.iter().any(|p| p.online_date.is_none()),
            },
            bugs,
            offline_periods: periods,
            total_offline_ms,
        }
    }

    #[test]
    fn format_duration_picks_coarsest_units() {
        assert_eq!(format_duration(90_000_000), "1d 1h");
        assert_eq!(format_duration(5_400_000), "1h 30m");
        assert_eq!(format_duration(120_000), "2m");
        assert_eq!(format_duration(0), "0m");
    }

    #[test]
    fn total_offline_skips_open_periods() {
        let periods = vec![
            period(ts(0), Some(ts(10))),
            period(ts(20), None),
            period(ts(30), Some(ts(35))),
        ];
        assert_eq!(total_offline_ms(&periods), 15 * 60_000);
    }

    #[test]
    fn shortest_offline_ignores_open_periods_and_picks_global_min() {
        let versions = vec![
            record("1.0.0", ts(0), vec![period(ts(0), Some(ts(60)))], vec![]),
            record(
                "1.1.0",
                ts(0),
                vec![period(ts(0), None), period(ts(100), Some(ts(102)))],
                vec![],
            ),
        ];
        let shortest = shortest_offline_period(&versions).unwrap();
        assert_eq!(shortest.version, "1.1.0");
        assert_eq!(shortest.duration_ms, 2 * 60_000);
        assert_eq!(shortest.duration, "2m");
    }

    #[test]
    fn shortest_offline_is_none_without_completed_periods() {
        let versions = vec![
            record("1.0.0", ts(0), vec![period(ts(0), None)], vec![]),
            record("1.1.0", ts(0), vec![], vec![]),
        ];
        assert_eq!(shortest_offline_period(&versions), None);
    }

    #[test]
    fn shortest_offline_ties_keep_first_encountered() {
        let versions = vec![
            record("1.0.0", ts(0), vec![period(ts(0), Some(ts(5)))], vec![]),
            record("1.1.0", ts(0), vec![period(ts(0), Some(ts(5)))], vec![]),
        ];
        assert_eq!(shortest_offline_period(&versions).unwrap().version, "1.0.0");
    }

    #[test]
    fn shortest_online_uses_earliest_offline_per_version() {
        let versions = vec![
            record(
                "1.0.0",
                ts(0),
                // Stored most-recent-first; the earliest one counts.
                vec![period(ts(500), Some(ts(510))), period(ts(90), Some(ts(95)))],
                vec![],
            ),
            record("1.1.0", ts(0), vec![period(ts(30), None)], vec![]),
        ];
        let shortest = shortest_online_interval(&versions).unwrap();
        assert_eq!(shortest.version, "1.1.0");
        assert_eq!(shortest.duration_ms, 30 * 60_000);
    }

    #[test]
    fn shortest_online_skips_offline_before_release() {
        let versions = vec![
            // Offline recorded before the release date: bad data, skipped.
            record("0.9.0", ts(100), vec![period(ts(50), Some(ts(60)))], vec![]),
            record("1.0.0", ts(0), vec![period(ts(45), None)], vec![]),
        ];
        let shortest = shortest_online_interval(&versions).unwrap();
        assert_eq!(shortest.version, "1.0.0");
    }

    #[test]
    fn shortest_online_is_none_when_nothing_qualifies() {
        let versions = vec![
            record("1.0.0", ts(0), vec![], vec![]),
            record("1.1.0", ts(100), vec![period(ts(100), Some(ts(110)))], vec![]),
        ];
        // First never went offline, second went offline at its release instant.
        assert_eq!(shortest_online_interval(&versions), None);
    }

    #[test]
    fn top_developers_counts_and_orders() {
        let versions = vec![
            record(
                "1.0.0",
                ts(0),
                vec![],
                vec![bug("AAA"), bug("BBB"), bug("AAA")],
            ),
            record("1.1.0", ts(0), vec![], vec![bug("CCC"), bug("AAA"), bug("BBB")]),
        ];
        let top = top_developers(&versions, TOP_DEVELOPER_LIMIT);
        assert_eq!(
            top,
            vec![
                DeveloperCount { code: "AAA".into(), count: 3 },
                DeveloperCount { code: "BBB".into(), count: 2 },
                DeveloperCount { code: "CCC".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn top_developers_truncates_to_limit() {
        let bugs = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"]
            .into_iter()
            .map(bug)
            .collect();
        let versions = vec![record("1.0.0", ts(0), vec![], bugs)];
        assert_eq!(top_developers(&versions, 5).len(), 5);
    }

    #[test]
    fn top_developers_ties_stay_in_first_reported_order() {
        let versions = vec![record(
            "1.0.0",
            ts(0),
            vec![],
            vec![bug("ZZZ"), bug("AAA")],
        )];
        let top = top_developers(&versions, 5);
        assert_eq!(top[0].code, "ZZZ");
        assert_eq!(top[1].code, "AAA");
    }

    #[test]
    fn most_buggy_version_prefers_strictly_greater() {
        let versions = vec![
            record("1.0.0", ts(0), vec![], vec![bug("AAA")]),
            record("1.1.0", ts(0), vec![], vec![bug("BBB")]),
            record("1.2.0", ts(0), vec![], vec![bug("CCC"), bug("CCC")]),
        ];
        let most = version_with_most_bugs(&versions).unwrap();
        assert_eq!(most.version, "1.2.0");
        assert_eq!(most.bug_count, 2);
    }

    #[test]
    fn most_buggy_version_falls_back_to_first() {
        let versions = vec![
            record("1.0.0", ts(0), vec![], vec![]),
            record("1.1.0", ts(0), vec![], vec![]),
        ];
        assert_eq!(
            version_with_most_bugs(&versions).unwrap().version,
            "1.0.0"
        );
        assert_eq!(version_with_most_bugs(&[]), None);
    }

    #[test]
    fn active_versions_counts_online_only() {
        let versions = vec![
            record("1.0.0", ts(0), vec![period(ts(10), None)], vec![]),
            record("1.1.0", ts(0), vec![period(ts(10), Some(ts(20)))], vec![]),
            record("1.2.0", ts(0), vec![], vec![]),
        ];
        assert_eq!(active_version_count(&versions), 2);
    }

    #[test]
    fn dashboard_stats_totals() {
        let versions = vec![
            record("1.0.0", ts(0), vec![period(ts(10), Some(ts(40)))], vec![bug("AAA")]),
            record("1.1.0", ts(0), vec![], vec![bug("AAA"), bug("BBB")]),
        ];
        let stats = dashboard_stats(&versions);
        assert_eq!(stats.total_bugs, 3);
        assert_eq!(stats.total_versions, 2);
        assert_eq!(stats.active_versions, 2);
        assert_eq!(stats.version_with_most_bugs.unwrap().version, "1.1.0");
        assert_eq!(stats.shortest_offline.unwrap().duration, "30m");
        assert_eq!(stats.shortest_online.unwrap().duration, "10m");
    }
}
