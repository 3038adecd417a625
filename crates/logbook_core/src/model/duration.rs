//! Named retention periods and their millisecond magnitudes.
//!
//! # Invariants
//! - `Forever` is numerically the largest magnitude and is the "do not
//!   evict" sentinel.
//! - `AllTime` sits one below `Forever` so it never compares equal to the
//!   sentinel; a sweep with `AllTime` scans but removes nothing in
//!   practice.

/// Closed set of retention period names selectable by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetentionPeriod {
    Now,
    OneSecond,
    OneMinute,
    OneHour,
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    ThreeYears,
    AllTime,
    Forever,
}

impl RetentionPeriod {
    /// Every recognized period, shortest to longest.
    pub const ALL: [RetentionPeriod; 14] = [
        RetentionPeriod::Now,
        RetentionPeriod::OneSecond,
        RetentionPeriod::OneMinute,
        RetentionPeriod::OneHour,
        RetentionPeriod::OneDay,
        RetentionPeriod::OneWeek,
        RetentionPeriod::OneMonth,
        RetentionPeriod::ThreeMonths,
        RetentionPeriod::SixMonths,
        RetentionPeriod::OneYear,
        RetentionPeriod::TwoYears,
        RetentionPeriod::ThreeYears,
        RetentionPeriod::AllTime,
        RetentionPeriod::Forever,
    ];

    /// Display name as stored in the retention setting's value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Now => "Now",
            Self::OneSecond => "One Second",
            Self::OneMinute => "One Minute",
            Self::OneHour => "One Hour",
            Self::OneDay => "One Day",
            Self::OneWeek => "One Week",
            Self::OneMonth => "One Month",
            Self::ThreeMonths => "Three Months",
            Self::SixMonths => "Six Months",
            Self::OneYear => "One Year",
            Self::TwoYears => "Two Years",
            Self::ThreeYears => "Three Years",
            Self::AllTime => "All Time",
            Self::Forever => "Forever",
        }
    }

    /// Parses a stored name. Unknown names are a recoverable condition for
    /// the eviction sweep, so this returns `Option` instead of an error.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == value)
    }

    /// Retention window magnitude in milliseconds.
    pub fn as_millis(self) -> i64 {
        match self {
            Self::Now => 1,
            Self::OneSecond => 1_000,
            Self::OneMinute => 60_000,
            Self::OneHour => 3_600_000,
            Self::OneDay => 86_400_000,
            Self::OneWeek => 604_800_000,
            Self::OneMonth => 2_592_000_000,
            Self::ThreeMonths => 7_776_000_000,
            Self::SixMonths => 15_552_000_000,
            Self::OneYear => 31_536_000_000,
            Self::TwoYears => 63_072_000_000,
            Self::ThreeYears => 94_608_000_000,
            Self::AllTime => 9_007_199_254_740_990,
            Self::Forever => 9_007_199_254_740_991,
        }
    }

    /// Whether a resolved magnitude suppresses eviction entirely.
    pub fn suppresses_eviction(magnitude_ms: i64) -> bool {
        magnitude_ms >= Self::Forever.as_millis()
    }
}
