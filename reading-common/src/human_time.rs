//! Human-readable relative time ("time ago") in Simplified Chinese
//!
//! Used by experience listings so the mini-program can show when each quiz
//! attempt happened without doing date math on the client.

use chrono::{DateTime, Utc};

const SECONDS_PER_MINUTE: i64 = 60;
const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_YEAR: i64 = 365;
const MONTHS_PER_YEAR: i64 = 12;

/// Format the distance from `then` to `now` as a Chinese "time ago" label.
///
/// Thresholds (all divisions floor):
/// - < 60 seconds → `刚刚`
/// - < 60 minutes → `N分钟前`
/// - < 24 hours → `N小时前`
/// - < 30 days → `N天前`
/// - < 12 months (30-day months) → `N个月前`
/// - otherwise → `N年前` (365-day years)
///
/// Timestamps in the future are treated as "just now".
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use reading_common::human_time::format_time_ago;
///
/// let now = Utc::now();
/// assert_eq!(format_time_ago(now - Duration::seconds(10), now), "刚刚");
/// assert_eq!(format_time_ago(now - Duration::minutes(5), now), "5分钟前");
/// assert_eq!(format_time_ago(now - Duration::days(3), now), "3天前");
/// ```
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let minutes = seconds.div_euclid(SECONDS_PER_MINUTE);
    let hours = minutes.div_euclid(MINUTES_PER_HOUR);
    let days = hours.div_euclid(HOURS_PER_DAY);
    let months = days.div_euclid(DAYS_PER_MONTH);
    let years = days.div_euclid(DAYS_PER_YEAR);

    if seconds < SECONDS_PER_MINUTE {
        "刚刚".to_string()
    } else if minutes < MINUTES_PER_HOUR {
        format!("{}分钟前", minutes)
    } else if hours < HOURS_PER_DAY {
        format!("{}小时前", hours)
    } else if days < DAYS_PER_MONTH {
        format!("{}天前", days)
    } else if months < MONTHS_PER_YEAR {
        format!("{}个月前", months)
    } else {
        format!("{}年前", years)
    }
}

/// Same as [`format_time_ago`] measured against the current time
pub fn time_ago_from_now(then: DateTime<Utc>) -> String {
    format_time_ago(then, Utc::now())
}
