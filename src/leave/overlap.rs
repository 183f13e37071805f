use crate::leave::date_range::days_between_inclusive;
use crate::model::leave_request::LeaveStatus;
use chrono::NaiveDate;

/// Inclusive calendar date range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange { from, to }
    }

    pub fn days(&self) -> i64 {
        days_between_inclusive(self.from, self.to)
    }
}

/// Snapshot of one existing leave record, as much as overlap reasoning needs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExistingLeave {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub status: LeaveStatus,
}

/// Standard inclusive interval test: a same-day boundary touch counts.
pub fn overlaps(a: &DateRange, b: &DateRange) -> bool {
    a.from <= b.to && a.to >= b.from
}

/// All existing records that claim at least one day of the candidate range.
///
/// Rejected and cancelled records have released their dates and are skipped.
/// The caller formats a message from the first conflict, but submission is
/// blocked whenever the returned set is non-empty.
pub fn find_conflicts<'a>(
    candidate: &DateRange,
    existing: &'a [ExistingLeave],
) -> Vec<&'a ExistingLeave> {
    existing
        .iter()
        .filter(|record| !record.status.releases_dates())
        .filter(|record| {
            overlaps(
                candidate,
                &DateRange::new(record.from_date, record.to_date),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn approved(from: NaiveDate, to: NaiveDate) -> ExistingLeave {
        ExistingLeave {
            from_date: from,
            to_date: to,
            status: LeaveStatus::Approved,
        }
    }

    #[test]
    fn boundary_touch_is_a_conflict() {
        let existing = vec![approved(d(2025, 3, 10), d(2025, 3, 15))];
        let candidate = DateRange::new(d(2025, 3, 15), d(2025, 3, 20));
        assert_eq!(find_conflicts(&candidate, &existing).len(), 1);
    }

    #[test]
    fn adjacent_day_is_not_a_conflict() {
        let existing = vec![approved(d(2025, 3, 10), d(2025, 3, 15))];
        let candidate = DateRange::new(d(2025, 3, 16), d(2025, 3, 20));
        assert!(find_conflicts(&candidate, &existing).is_empty());
    }

    #[test]
    fn contained_range_conflicts() {
        let existing = vec![approved(d(2025, 3, 1), d(2025, 3, 31))];
        let candidate = DateRange::new(d(2025, 3, 10), d(2025, 3, 12));
        assert_eq!(find_conflicts(&candidate, &existing).len(), 1);
    }

    #[test]
    fn terminal_records_release_their_dates() {
        let mut rejected = approved(d(2025, 3, 10), d(2025, 3, 15));
        rejected.status = LeaveStatus::Rejected;
        let mut cancelled = approved(d(2025, 3, 12), d(2025, 3, 18));
        cancelled.status = LeaveStatus::Cancelled;

        let candidate = DateRange::new(d(2025, 3, 11), d(2025, 3, 13));
        assert!(find_conflicts(&candidate, &[rejected, cancelled]).is_empty());
    }

    #[test]
    fn pending_records_still_claim_dates() {
        let mut pending = approved(d(2025, 3, 10), d(2025, 3, 15));
        pending.status = LeaveStatus::Pending;

        let candidate = DateRange::new(d(2025, 3, 14), d(2025, 3, 16));
        assert_eq!(find_conflicts(&candidate, &[pending]).len(), 1);
    }

    #[test]
    fn all_conflicts_are_returned() {
        let existing = vec![
            approved(d(2025, 3, 1), d(2025, 3, 5)),
            approved(d(2025, 3, 8), d(2025, 3, 9)),
            approved(d(2025, 4, 1), d(2025, 4, 2)),
        ];
        let candidate = DateRange::new(d(2025, 3, 4), d(2025, 3, 8));
        let conflicts = find_conflicts(&candidate, &existing);
        assert_eq!(conflicts.len(), 2);
        // First conflict in record order feeds the user-facing message.
        assert_eq!(conflicts[0].from_date, d(2025, 3, 1));
    }

    #[test]
    fn same_day_range_counts_one_day() {
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 1));
        assert_eq!(range.days(), 1);
    }
}
