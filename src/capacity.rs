use crate::journal::{ClearanceOutcome, ClearanceRecord};
use crate::weather::WeatherReading;
use chrono::{NaiveDateTime, Timelike};

/// Calendar-minute bucket, not a sliding window: 10:00:59 and 10:01:00 land
/// in different buckets even though one second apart. Kept as-is for
/// compatibility with existing tower procedure.
fn same_minute(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour() && a.minute() == b.minute()
}

/// Under reduced visibility the tower grants at most one clearance per
/// wall-clock minute; otherwise there is no throttling. Only granted
/// clearances count against the bucket.
pub fn allows(
    weather: Option<WeatherReading>,
    history: &[ClearanceRecord],
    now: NaiveDateTime,
) -> bool {
    let restricted = weather.map(|w| w.reduced_visibility()).unwrap_or(false);
    if !restricted {
        return true;
    }
    !history
        .iter()
        .any(|r| r.outcome == ClearanceOutcome::Autorizado && same_minute(r.timestamp, now))
}
