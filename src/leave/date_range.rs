use chrono::NaiveDate;

/// Inclusive day count between two calendar dates.
///
/// A same-day leave counts as 1 day. Precondition: `to >= from` — the
/// validator checks range ordering before asking for a span, this function
/// does not clamp.
pub fn days_between_inclusive(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_day_counts_as_one() {
        assert_eq!(days_between_inclusive(d(2025, 3, 10), d(2025, 3, 10)), 1);
    }

    #[test]
    fn consecutive_days() {
        assert_eq!(days_between_inclusive(d(2025, 3, 10), d(2025, 3, 11)), 2);
    }

    #[test]
    fn spans_month_boundary() {
        // Jan 1 .. Feb 5 = 31 + 5 = 36 days
        assert_eq!(days_between_inclusive(d(2025, 1, 1), d(2025, 2, 5)), 36);
    }

    #[test]
    fn spans_leap_february() {
        assert_eq!(days_between_inclusive(d(2024, 2, 28), d(2024, 3, 1)), 3);
    }
}
