//! # Report Periods
//!
//! Reports are asked for in business days ("1 Oct to 7 Oct") and evaluated
//! against UTC timestamps in storage.
//!
//! ```text
//! ?startDate=2026-10-01&endDate=2026-10-07      business offset +05:30
//!        │                       │
//!        ▼                       ▼
//! 2026-10-01 00:00:00.000   2026-10-07 23:59:59.999   (local, inclusive)
//!        │                       │
//!        ▼                       ▼
//! 2026-09-30T18:30:00Z      2026-10-07T18:29:59.999Z  (bound in SQL)
//! ```
//!
//! The clock is never read here; callers pass "today".

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::{CoreResult, ValidationError};

/// Inclusive UTC range covering whole business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportPeriod {
    /// Covers `first` 00:00:00.000 through `last` 23:59:59.999 at `offset`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{FixedOffset, NaiveDate};
    /// use vanledger_core::period::ReportPeriod;
    ///
    /// let ist = FixedOffset::east_opt(330 * 60).unwrap();
    /// let day = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    /// let period = ReportPeriod::days(day, day, ist).unwrap();
    /// assert_eq!(period.start().to_rfc3339(), "2026-09-30T18:30:00+00:00");
    /// ```
    pub fn days(first: NaiveDate, last: NaiveDate, offset: FixedOffset) -> CoreResult<Self> {
        if first > last {
            return Err(ValidationError::Exceeds {
                field: "startDate".to_string(),
                limit: last.to_string(),
            }
            .into());
        }

        let start = first.and_hms_milli_opt(0, 0, 0, 0).ok_or_else(|| bad_date("startDate"))?;
        let end = last.and_hms_milli_opt(23, 59, 59, 999).ok_or_else(|| bad_date("endDate"))?;

        Ok(ReportPeriod {
            start: to_utc(start, offset, "startDate")?,
            end: to_utc(end, offset, "endDate")?,
        })
    }

    /// Resolves optional query bounds.
    ///
    /// Neither given: today. One given: that single day. Both: the range.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
        offset: FixedOffset,
    ) -> CoreResult<Self> {
        let first = start.or(end).unwrap_or(today);
        let last = end.or(start).unwrap_or(today);
        ReportPeriod::days(first, last, offset)
    }

    /// The single business day containing `now`.
    pub fn today(now: DateTime<Utc>, offset: FixedOffset) -> CoreResult<Self> {
        let today = business_date(now, offset);
        ReportPeriod::days(today, today, offset)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Calendar date at the business location for a UTC instant.
pub fn business_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

fn to_utc(local: NaiveDateTime, offset: FixedOffset, field: &str) -> CoreResult<DateTime<Utc>> {
    local
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| bad_date(field).into())
}

fn bad_date(field: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "date is out of range".to_string(),
    }
}
