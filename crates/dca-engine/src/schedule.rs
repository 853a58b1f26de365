//! Purchase schedule generation.

use chrono::{Duration, Months, NaiveDate};

use dca_core::types::Frequency;

/// Generate the ordered purchase dates for `[start, end]`, both inclusive.
///
/// Daily, weekly, and biweekly schedules step by a fixed number of days.
/// Monthly schedules are anchored to the start date: each entry is the start
/// date plus N calendar months, keeping its day-of-month and clamping to the
/// last day of shorter months. Anchoring avoids drift — a schedule starting
/// Jan 31 hits Feb 29 and then Mar 31, not Mar 28.
///
/// Returns an empty list when `start > end`; the engine treats that as a
/// configuration error rather than a zero-purchase simulation.
pub fn purchase_dates(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut step: u32 = 0;

    loop {
        let date = match frequency {
            Frequency::Daily => start + Duration::days(step as i64),
            Frequency::Weekly => start + Duration::days(7 * step as i64),
            Frequency::Biweekly => start + Duration::days(14 * step as i64),
            Frequency::Monthly => start + Months::new(step),
        };
        if date > end {
            break;
        }
        dates.push(date);
        step += 1;
    }

    dates
}
