//! Campus wall-clock helpers.
//!
//! Class sessions are scheduled in local date/time while code expiry is an
//! absolute UTC instant. These helpers convert between the two using the
//! configured `UTC_OFFSET_MINUTES`.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use crate::config;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(config::utc_offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix())
}

/// Converts a UTC instant to campus local time.
pub fn to_local(now: DateTime<Utc>) -> NaiveDateTime {
    now.with_timezone(&offset()).naive_local()
}

/// Converts a campus local time back to its UTC instant.
pub fn from_local(local: NaiveDateTime) -> DateTime<Utc> {
    (local - Duration::seconds(offset().local_minus_utc() as i64)).and_utc()
}

/// Current campus local date and time.
pub fn local_now() -> NaiveDateTime {
    to_local(Utc::now())
}

/// Monday and Sunday of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Duration::days(day.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}
