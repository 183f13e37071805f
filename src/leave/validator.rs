use crate::leave::balance::{
    available_days, has_sufficient_balance, leave_type_offered, LeaveBalances,
};
use crate::leave::date_range::days_between_inclusive;
use crate::leave::overlap::{find_conflicts, DateRange, ExistingLeave};
use crate::model::leave_request::LeaveType;
use crate::model::role::Role;
use crate::model::trainer::TrainerCategory;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Field an error is keyed by. Keys match what the client renders inline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Field {
    LeaveType,
    FromDate,
    ToDate,
    DateRange,
    Overlapping,
    Balance,
    Reason,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::LeaveType => "leaveType",
            Field::FromDate => "fromDate",
            Field::ToDate => "toDate",
            Field::DateRange => "dateRange",
            Field::Overlapping => "overlapping",
            Field::Balance => "balance",
            Field::Reason => "reason",
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Field -> message map for one validation pass. Never persisted.
///
/// An empty map is the single submit gate: it implies no overlap as well,
/// there is no separate overlap flag to keep in sync.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Policy knobs for a validation pass. Defaults mirror the deployed rules.
#[derive(Debug, Clone)]
pub struct LeavePolicy {
    /// Minimum full days between today and the leave start.
    pub min_advance_notice_days: i64,
    /// Longest allowed inclusive span for one request.
    pub max_span_days: i64,
    pub min_reason_words: usize,
    pub min_reason_chars: usize,
    pub max_reason_chars: usize,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        LeavePolicy {
            min_advance_notice_days: 1,
            max_span_days: 30,
            min_reason_words: 7,
            min_reason_chars: 30,
            max_reason_chars: 500,
        }
    }
}

/// Candidate application as submitted.
#[derive(Debug, Clone)]
pub struct LeaveApplication {
    pub leave_type: LeaveType,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: String,
}

/// Everything validation needs about the applicant, passed explicitly so a
/// pass is deterministic: no ambient store, no clock reads.
#[derive(Debug, Clone, Copy)]
pub struct ApplicantSnapshot<'a> {
    pub role: Role,
    pub category: TrainerCategory,
    pub balances: &'a LeaveBalances,
    pub existing: &'a [ExistingLeave],
}

/// Runs all rule checks and aggregates violations. Rules are independent and
/// cumulative; nothing short-circuits, except that span, overlap and balance
/// checks need a well-formed range and are skipped when `to < from`.
pub fn validate(
    application: &LeaveApplication,
    snapshot: &ApplicantSnapshot<'_>,
    today: NaiveDate,
    policy: &LeavePolicy,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_advance_notice(application, today, policy, &mut errors);
    let range_ok = check_range(application, policy, &mut errors);
    if range_ok {
        check_overlap(application, snapshot, &mut errors);
        check_balance(application, snapshot, &mut errors);
    }
    check_reason(&application.reason, policy, &mut errors);

    errors
}

fn check_advance_notice(
    application: &LeaveApplication,
    today: NaiveDate,
    policy: &LeavePolicy,
    errors: &mut ValidationErrors,
) {
    if application.from_date < today {
        errors.insert(Field::FromDate, "Leave cannot start in the past");
        return;
    }
    let notice = (application.from_date - today).num_days();
    if notice < policy.min_advance_notice_days {
        errors.insert(
            Field::FromDate,
            format!(
                "Leave must be applied at least {} day(s) in advance",
                policy.min_advance_notice_days
            ),
        );
    }
}

/// Returns true when the range is well-formed and within the span limit;
/// the later rules only run against a well-formed range.
fn check_range(
    application: &LeaveApplication,
    policy: &LeavePolicy,
    errors: &mut ValidationErrors,
) -> bool {
    if application.to_date < application.from_date {
        errors.insert(Field::ToDate, "End date cannot be before start date");
        return false;
    }
    let span = days_between_inclusive(application.from_date, application.to_date);
    if span > policy.max_span_days {
        errors.insert(
            Field::DateRange,
            format!(
                "Leave cannot span more than {} days ({} requested)",
                policy.max_span_days, span
            ),
        );
    }
    true
}

fn check_overlap(
    application: &LeaveApplication,
    snapshot: &ApplicantSnapshot<'_>,
    errors: &mut ValidationErrors,
) {
    let candidate = DateRange::new(application.from_date, application.to_date);
    let conflicts = find_conflicts(&candidate, snapshot.existing);
    if let Some(first) = conflicts.first() {
        errors.insert(
            Field::Overlapping,
            format!(
                "Dates overlap an existing {} leave from {} to {}",
                first.status, first.from_date, first.to_date
            ),
        );
    }
}

fn check_balance(
    application: &LeaveApplication,
    snapshot: &ApplicantSnapshot<'_>,
    errors: &mut ValidationErrors,
) {
    // HR balances are unlimited by construction; skip the whole rule.
    if snapshot.role == Role::Hr {
        return;
    }

    if !leave_type_offered(snapshot.category, application.leave_type) {
        errors.insert(
            Field::LeaveType,
            format!(
                "{} leave is not offered for contracted trainers",
                application.leave_type
            ),
        );
        return;
    }

    let requested = days_between_inclusive(application.from_date, application.to_date);
    let available = available_days(snapshot.role, snapshot.balances, application.leave_type);
    if !has_sufficient_balance(available, requested) {
        errors.insert(
            Field::Balance,
            format!(
                "Insufficient {} leave balance: {} available, {} required",
                application.leave_type, available, requested
            ),
        );
    }
}

/// Word count and character length are checked together; a reason that fails
/// both still produces exactly one error on the field.
fn check_reason(reason: &str, policy: &LeavePolicy, errors: &mut ValidationErrors) {
    let words = reason.split_whitespace().count();
    let chars = reason.trim().chars().count();

    let message = if words < policy.min_reason_words {
        Some(format!(
            "Reason must contain at least {} words",
            policy.min_reason_words
        ))
    } else if chars < policy.min_reason_chars {
        Some(format!(
            "Reason must be at least {} characters",
            policy.min_reason_chars
        ))
    } else if chars > policy.max_reason_chars {
        Some(format!(
            "Reason must not exceed {} characters",
            policy.max_reason_chars
        ))
    } else {
        None
    };

    if let Some(message) = message {
        errors.insert(Field::Reason, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::balance::Balance;
    use crate::model::leave_request::LeaveStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: (i32, u32, u32) = (2025, 3, 1);

    fn today() -> NaiveDate {
        d(TODAY.0, TODAY.1, TODAY.2)
    }

    fn valid_reason() -> String {
        "Attending a family function out of town for several days".to_string()
    }

    fn application(from: NaiveDate, to: NaiveDate) -> LeaveApplication {
        LeaveApplication {
            leave_type: LeaveType::Casual,
            from_date: from,
            to_date: to,
            reason: valid_reason(),
        }
    }

    fn balances(available: i64) -> LeaveBalances {
        let mut b = LeaveBalances::all_zero();
        b.casual.available = Balance::Finite(available);
        b.sick.available = Balance::Finite(available);
        b.paid.available = Balance::Finite(available);
        b
    }

    fn snapshot<'a>(balances: &'a LeaveBalances, existing: &'a [ExistingLeave]) -> ApplicantSnapshot<'a> {
        ApplicantSnapshot {
            role: Role::Trainer,
            category: TrainerCategory::Permanent,
            balances,
            existing,
        }
    }

    #[test]
    fn fully_valid_application_produces_empty_map() {
        let b = balances(10);
        let snap = snapshot(&b, &[]);
        let app = application(d(2025, 3, 10), d(2025, 3, 12));

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn inverted_range_reports_to_date_and_skips_later_rules() {
        let b = balances(0); // would also fail balance if it ran
        let existing = vec![ExistingLeave {
            from_date: d(2025, 3, 1),
            to_date: d(2025, 3, 31),
            status: LeaveStatus::Approved,
        }];
        let snap = snapshot(&b, &existing);
        let app = application(d(2025, 3, 12), d(2025, 3, 10));

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::ToDate));
        assert!(!errors.contains(Field::Overlapping));
        assert!(!errors.contains(Field::Balance));
    }

    #[test]
    fn span_over_thirty_days_reports_date_range() {
        let b = balances(60);
        let snap = snapshot(&b, &[]);
        // Mar 10 .. Apr 14 = 36 days
        let app = application(d(2025, 3, 10), d(2025, 4, 14));

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::DateRange));
    }

    #[test]
    fn span_of_exactly_thirty_days_is_allowed() {
        let b = balances(60);
        let snap = snapshot(&b, &[]);
        // Mar 10 .. Apr 8 = 30 days
        let app = application(d(2025, 3, 10), d(2025, 4, 8));

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(!errors.contains(Field::DateRange));
    }

    #[test]
    fn past_start_date_reports_from_date() {
        let b = balances(10);
        let snap = snapshot(&b, &[]);
        let app = application(d(2025, 2, 27), d(2025, 2, 28));

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert_eq!(
            errors.get(Field::FromDate),
            Some("Leave cannot start in the past")
        );
    }

    #[test]
    fn same_day_start_violates_advance_notice() {
        let b = balances(10);
        let snap = snapshot(&b, &[]);
        let app = application(today(), today());

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::FromDate));
    }

    #[test]
    fn boundary_overlap_is_flagged_adjacent_is_not() {
        let b = balances(30);
        let existing = vec![ExistingLeave {
            from_date: d(2025, 3, 10),
            to_date: d(2025, 3, 15),
            status: LeaveStatus::Approved,
        }];
        let snap = snapshot(&b, &existing);

        let touching = application(d(2025, 3, 15), d(2025, 3, 20));
        let errors = validate(&touching, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::Overlapping));

        let adjacent = application(d(2025, 3, 16), d(2025, 3, 20));
        let errors = validate(&adjacent, &snap, today(), &LeavePolicy::default());
        assert!(!errors.contains(Field::Overlapping));
    }

    #[test]
    fn insufficient_balance_message_reports_available_and_required() {
        let b = balances(2);
        let snap = snapshot(&b, &[]);
        let app = application(d(2025, 3, 10), d(2025, 3, 14)); // 5 days

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert_eq!(
            errors.get(Field::Balance),
            Some("Insufficient casual leave balance: 2 available, 5 required")
        );
    }

    #[test]
    fn hr_skips_balance_check_entirely() {
        let b = balances(0);
        let mut snap = snapshot(&b, &[]);
        snap.role = Role::Hr;
        let app = application(d(2025, 3, 10), d(2025, 3, 20));

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(!errors.contains(Field::Balance));
        assert!(errors.is_empty());
    }

    #[test]
    fn contracted_sick_leave_rejected_regardless_of_stored_balance() {
        let b = balances(100);
        let mut snap = snapshot(&b, &[]);
        snap.category = TrainerCategory::Contracted;
        let mut app = application(d(2025, 3, 10), d(2025, 3, 11));
        app.leave_type = LeaveType::Sick;

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::LeaveType));
        assert!(!errors.contains(Field::Balance));
    }

    #[test]
    fn contracted_paid_leave_is_offered() {
        let b = balances(10);
        let mut snap = snapshot(&b, &[]);
        snap.category = TrainerCategory::Contracted;
        let mut app = application(d(2025, 3, 10), d(2025, 3, 11));
        app.leave_type = LeaveType::Paid;

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn short_reason_produces_exactly_one_reason_error() {
        let b = balances(10);
        let snap = snapshot(&b, &[]);
        let mut app = application(d(2025, 3, 10), d(2025, 3, 11));
        // 2 words, 16 chars: fails both word-count and character-count rules.
        app.reason = "Family emergency".to_string();

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::Reason));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn overlong_reason_is_rejected() {
        let b = balances(10);
        let snap = snapshot(&b, &[]);
        let mut app = application(d(2025, 3, 10), d(2025, 3, 11));
        app.reason = "word ".repeat(150); // 750 chars

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::Reason));
    }

    #[test]
    fn rules_accumulate_without_short_circuit() {
        let b = balances(1);
        let existing = vec![ExistingLeave {
            from_date: d(2025, 3, 10),
            to_date: d(2025, 3, 12),
            status: LeaveStatus::Pending,
        }];
        let snap = snapshot(&b, &existing);
        let mut app = application(d(2025, 3, 11), d(2025, 3, 14));
        app.reason = "too short".to_string();

        let errors = validate(&app, &snap, today(), &LeavePolicy::default());
        assert!(errors.contains(Field::Overlapping));
        assert!(errors.contains(Field::Balance));
        assert!(errors.contains(Field::Reason));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn errors_serialize_keyed_by_field_name() {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::FromDate, "bad");
        errors.insert(Field::Reason, "short");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["fromDate"], "bad");
        assert_eq!(json["reason"], "short");
    }
}
