//! Price aggregation over a start-date window

use chrono::{DateTime, Utc};

use crate::models::Subscription;

/// Sum the prices of records whose `start_date` lies strictly inside
/// `(window_start, window_end)`.
///
/// A missing `window_start` leaves the lower side open. A missing
/// `window_end` is the zero instant, which no start date precedes, so the
/// sum is 0. Records without a start date never count.
pub fn sum_prices(
    records: &[Subscription],
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
) -> i64 {
    records
        .iter()
        .filter(|record| match record.start_date {
            Some(start) => {
                window_start.map_or(true, |lo| start > lo)
                    && window_end.is_some_and(|hi| start < hi)
            }
            None => false,
        })
        .fold(0i64, |total, record| total.saturating_add(record.price))
}
