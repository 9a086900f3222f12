//! The local calendar day as a UTC range

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use daybrief_domain::{DigestError, Result};

/// One local calendar day in `tz`, expressed as the UTC instants the
/// calendar query needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub tz: Tz,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// `[local midnight of date, local midnight of the next date)`.
    pub fn for_date(date: NaiveDate, tz: Tz) -> Result<Self> {
        let next = date
            .succ_opt()
            .ok_or_else(|| DigestError::Internal(format!("no day after {date}")))?;

        Ok(Self {
            date,
            tz,
            start: local_midnight(date, tz)?,
            end: local_midnight(next, tz)?,
        })
    }

    /// Today in `tz`.
    pub fn today(tz: Tz) -> Result<Self> {
        Self::for_date(today_in(tz), tz)
    }
}

/// The current calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let midnight: NaiveDateTime = date.and_time(NaiveTime::default());
    // Zones that skip midnight for DST start the day at the first valid instant.
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| DigestError::Internal(format!("{date} has no local midnight in {tz}")))
}
