use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{AppError, AppResult};

/// Longest accepted lookback window, roughly a century.
const MAX_LOOKBACK_DAYS: i64 = 36_525;

/// How far back commit collection reaches for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommitCutoff {
    /// Start of the current local day.
    #[default]
    Today,
    Lookback(Duration),
    /// Local midnight of a calendar date.
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

impl CommitCutoff {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("today") {
            return Some(CommitCutoff::Today);
        }
        if let Some(hours) = value.strip_suffix('h') {
            return hours
                .parse::<u32>()
                .ok()
                .and_then(|h| Duration::try_hours(i64::from(h)))
                .and_then(lookback);
        }
        if let Some(days) = value.strip_suffix('d') {
            return days
                .parse::<u32>()
                .ok()
                .and_then(|d| Duration::try_days(i64::from(d)))
                .and_then(lookback);
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Some(CommitCutoff::Date(date));
        }
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|instant| CommitCutoff::Instant(instant.with_timezone(&Utc)))
    }

    /// Resolves the policy against the moment a run starts.
    pub fn resolve(&self, now: DateTime<FixedOffset>) -> AppResult<DateTime<Utc>> {
        match self {
            CommitCutoff::Today => Ok(local_midnight(now.date_naive(), now.offset())),
            CommitCutoff::Lookback(window) => now
                .checked_sub_signed(*window)
                .map(|start| start.with_timezone(&Utc))
                .ok_or_else(|| {
                    AppError::Configuration(format!(
                        "commit cutoff {self} reaches before the earliest representable time"
                    ))
                }),
            CommitCutoff::Date(date) => Ok(local_midnight(*date, now.offset())),
            CommitCutoff::Instant(instant) => Ok(*instant),
        }
    }
}

fn lookback(window: Duration) -> Option<CommitCutoff> {
    (window <= Duration::days(MAX_LOOKBACK_DAYS)).then_some(CommitCutoff::Lookback(window))
}

impl fmt::Display for CommitCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitCutoff::Today => f.write_str("today"),
            CommitCutoff::Lookback(window) if window.num_hours() % 24 == 0 => {
                write!(f, "{}d", window.num_days())
            }
            CommitCutoff::Lookback(window) => write!(f, "{}h", window.num_hours()),
            CommitCutoff::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            CommitCutoff::Instant(instant) => f.write_str(&instant.to_rfc3339()),
        }
    }
}

fn local_midnight(date: NaiveDate, offset: &FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
