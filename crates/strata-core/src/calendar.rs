//! Calendar-aligned bucket periods.
//!
//! Buckets start on calendar boundaries rather than at fixed offsets from the
//! data: years on January 1st, months on the 1st, weeks on Monday, days at
//! midnight. All arithmetic is in UTC.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike as _, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Output granularity requested by the caller.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMode {
    #[default]
    Year,
    Month,
    Week,
    Day,
    /// No resampling: the original age bands are returned as they are.
    Raw,
}

impl ResampleMode {
    /// The calendar period to aggregate into, `None` for [`ResampleMode::Raw`].
    #[must_use]
    pub fn period(self) -> Option<Period> {
        match self {
            Self::Year => Some(Period::Year),
            Self::Month => Some(Period::Month),
            Self::Week => Some(Period::Week),
            Self::Day => Some(Period::Day),
            Self::Raw => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for ResampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl From<Period> for ResampleMode {
    fn from(period: Period) -> Self {
        match period {
            Period::Year => Self::Year,
            Period::Month => Self::Month,
            Period::Week => Self::Week,
            Period::Day => Self::Day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown resample mode '{input}', expected one of: year, month, week, day, raw")]
pub struct ParseResampleModeError {
    #[error(not(source))]
    pub input: String,
}

impl FromStr for ResampleMode {
    type Err = ParseResampleModeError;

    /// Accepts the mode names and the single-letter frequency aliases
    /// (`A`/`Y`, `M`, `W`, `D`), case-insensitively. `no` is a synonym of `raw`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.to_ascii_lowercase().as_str() {
            "year" | "a" | "y" => Self::Year,
            "month" | "m" => Self::Month,
            "week" | "w" => Self::Week,
            "day" | "d" => Self::Day,
            "raw" | "no" => Self::Raw,
            _ => {
                return Err(ParseResampleModeError {
                    input: s.to_owned(),
                });
            }
        };
        Ok(mode)
    }
}

/// A calendar bucket size, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Period {
    #[display("year")]
    Year,
    #[display("month")]
    Month,
    #[display("week")]
    Week,
    #[display("day")]
    Day,
}

impl Period {
    /// The next finer period tried when this one is too loose.
    ///
    /// `year → month → day`; `week` also falls back to `day`; `day` is final.
    #[must_use]
    pub fn finer(self) -> Option<Self> {
        match self {
            Self::Year => Some(Self::Month),
            Self::Month | Self::Week => Some(Self::Day),
            Self::Day => None,
        }
    }

    /// Start of the period containing `date`.
    #[must_use]
    pub fn floor(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Year => date.with_ordinal(1),
            Self::Month => date.with_day(1),
            Self::Week => {
                date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            }
            Self::Day => Some(date),
        }
    }

    /// Start of the period following the one starting at `boundary`.
    #[must_use]
    pub fn advance(self, boundary: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Year => NaiveDate::from_ymd_opt(boundary.year() + 1, 1, 1),
            Self::Month => boundary.checked_add_months(Months::new(1)),
            Self::Week => boundary.checked_add_days(Days::new(7)),
            Self::Day => boundary.checked_add_days(Days::new(1)),
        }
    }

    /// Bucket boundaries covering `[start, finish]`.
    ///
    /// The first boundary is the first period start at or after `start`;
    /// boundaries follow until one reaches `finish`. Returns `None` if the
    /// calendar overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chrono::{TimeZone as _, Utc};
    /// # use strata_core::calendar::Period;
    /// let start = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
    /// let finish = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
    /// let starts = Period::Month.bucket_starts(start, finish).unwrap();
    /// let dates = starts.iter().map(|d| d.date_naive().to_string()).collect::<Vec<_>>();
    /// assert_eq!(dates, ["2024-04-01", "2024-05-01", "2024-06-01"]);
    /// ```
    #[must_use]
    pub fn bucket_starts(
        self,
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    ) -> Option<Vec<DateTime<Utc>>> {
        let mut boundary = self.floor(start.date_naive())?;
        if midnight(boundary) < start {
            boundary = self.advance(boundary)?;
        }

        let mut starts = vec![midnight(boundary)];
        while midnight(boundary) < finish {
            boundary = self.advance(boundary)?;
            starts.push(midnight(boundary));
        }
        Some(starts)
    }

    /// Start of the period that ends right before `boundary`.
    #[must_use]
    pub fn period_before(self, boundary: NaiveDate) -> Option<NaiveDate> {
        self.floor(boundary.pred_opt()?)
    }
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
