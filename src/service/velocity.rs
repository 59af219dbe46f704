//! Commit velocity: grouping commits into the current and previous period
//! and into per-day (or per-month) buckets.
//!
//! All calendar math runs on the UTC clock. Weeks start on Sunday.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::AppError;
use crate::model::Commit;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Length of the period commits are compared over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VelocityFormat {
    #[default]
    Week,
    Month,
    Year,
}

impl VelocityFormat {
    pub const ALL: [VelocityFormat; 3] = [
        VelocityFormat::Week,
        VelocityFormat::Month,
        VelocityFormat::Year,
    ];

    /// Adjective used in reports, e.g. "weekly"
    pub fn adjective(&self) -> &'static str {
        match self {
            VelocityFormat::Week => "weekly",
            VelocityFormat::Month => "monthly",
            VelocityFormat::Year => "yearly",
        }
    }

    pub fn period_name(&self) -> &'static str {
        match self {
            VelocityFormat::Week => "week",
            VelocityFormat::Month => "month",
            VelocityFormat::Year => "year",
        }
    }

    fn bucket_labels(&self) -> Vec<String> {
        match self {
            VelocityFormat::Week => WEEKDAYS.iter().map(|d| d.to_string()).collect(),
            VelocityFormat::Month => (1..=31).map(|d| d.to_string()).collect(),
            VelocityFormat::Year => MONTHS.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn bucket_index(&self, date: &DateTime<Utc>) -> usize {
        match self {
            VelocityFormat::Week => date.weekday().num_days_from_sunday() as usize,
            VelocityFormat::Month => date.day0() as usize,
            VelocityFormat::Year => date.month0() as usize,
        }
    }
}

impl fmt::Display for VelocityFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.period_name())
    }
}

impl FromStr for VelocityFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Ok(VelocityFormat::Week),
            "month" | "monthly" => Ok(VelocityFormat::Month),
            "year" | "yearly" => Ok(VelocityFormat::Year),
            other => Err(AppError::Configuration(format!(
                "Unknown velocity format '{}' (expected week, month or year)",
                other
            ))),
        }
    }
}

/// Commits split into the current and the previous period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowedCommits {
    pub current: Vec<Commit>,
    pub previous: Vec<Commit>,
}

/// Number of commits falling on one weekday, day of month, or month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub label: String,
    pub count: usize,
}

/// Aggregates handed to the presenters
#[derive(Debug, Clone)]
pub struct VelocityReport {
    pub format: VelocityFormat,
    pub current: usize,
    pub previous: usize,
    pub current_buckets: Vec<DayBucket>,
    pub previous_buckets: Vec<DayBucket>,
    /// Commits of both periods, in retrieval order
    pub commits: Vec<Commit>,
}

impl VelocityReport {
    /// Change from the previous period in percent; `None` when the previous period is empty
    pub fn change_percent(&self) -> Option<f64> {
        if self.previous == 0 {
            return None;
        }
        Some((self.current as f64 - self.previous as f64) / self.previous as f64 * 100.0)
    }

    /// Commits gained (positive) or lost (negative) against the previous period
    pub fn difference(&self) -> i64 {
        self.current as i64 - self.previous as i64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Velocity {
    format: VelocityFormat,
}

impl Velocity {
    pub fn new(format: VelocityFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> VelocityFormat {
        self.format
    }

    /// Midnight at the start of the period containing `now`
    pub fn period_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let start = match self.format {
            VelocityFormat::Week => {
                today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
            }
            VelocityFormat::Month => {
                NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today)
            }
            VelocityFormat::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        };
        Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN))
    }

    /// Start of the period before the current one
    pub fn previous_period_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let start = self.period_start(now);
        match self.format {
            VelocityFormat::Week => start - Duration::weeks(1),
            VelocityFormat::Month => start.checked_sub_months(Months::new(1)).unwrap_or(start),
            VelocityFormat::Year => start.checked_sub_months(Months::new(12)).unwrap_or(start),
        }
    }

    pub fn is_within_current(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.period_start(now) < date && date < now
    }

    pub fn is_within_previous(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.previous_period_start(now) < date && date < self.period_start(now)
    }

    pub fn group_by_window(&self, commits: &[Commit], now: DateTime<Utc>) -> WindowedCommits {
        let start = self.period_start(now);
        let previous_start = self.previous_period_start(now);

        let mut windows = WindowedCommits::default();
        for commit in commits {
            if start < commit.date && commit.date < now {
                windows.current.push(commit.clone());
            } else if previous_start < commit.date && commit.date < start {
                windows.previous.push(commit.clone());
            }
        }
        windows
    }

    /// Count commits per weekday (week), day of month (month) or month (year).
    ///
    /// Every label is present, in calendar order, even when its count is zero.
    pub fn group_by_day(&self, commits: &[Commit]) -> Vec<DayBucket> {
        let mut buckets: Vec<DayBucket> = self
            .format
            .bucket_labels()
            .into_iter()
            .map(|label| DayBucket { label, count: 0 })
            .collect();

        for commit in commits {
            if let Some(bucket) = buckets.get_mut(self.format.bucket_index(&commit.date)) {
                bucket.count += 1;
            }
        }
        buckets
    }

    /// Predicate that turns true on commits older than the previous period.
    ///
    /// Commit pages arrive newest first, so once a page holds such a commit no
    /// later page can contribute to either window.
    pub fn stop_predicate(&self, now: DateTime<Utc>) -> impl Fn(&Commit) -> bool + Send + Sync {
        let previous_start = self.previous_period_start(now);
        move |commit: &Commit| commit.date < previous_start
    }

    pub fn summarize(&self, commits: &[Commit], now: DateTime<Utc>) -> VelocityReport {
        let windows = self.group_by_window(commits, now);
        let current_buckets = self.group_by_day(&windows.current);
        let previous_buckets = self.group_by_day(&windows.previous);

        let mut in_range: Vec<Commit> = commits
            .iter()
            .filter(|c| self.previous_period_start(now) < c.date && c.date < now)
            .cloned()
            .collect();
        in_range.sort_by(|a, b| b.date.cmp(&a.date));

        VelocityReport {
            format: self.format,
            current: windows.current.len(),
            previous: windows.previous.len(),
            current_buckets,
            previous_buckets,
            commits: in_range,
        }
    }
}
