use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Sick,
    Casual,
    Paid,
}

/// Lifecycle: `Pending` -> `Approved` | `Rejected` | `Cancelled`.
/// Terminal states are final; rejected/cancelled records release their dates.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn releases_dates(&self) -> bool {
        matches!(self, LeaveStatus::Rejected | LeaveStatus::Cancelled)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub trainer_id: u64,
    #[schema(example = "casual")]
    pub leave_type: String,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = 3)]
    pub number_of_days: i64,
    #[schema(example = "Attending a family function out of town for several days")]
    pub reason: String,
    #[schema(example = "pending")]
    pub status: String,
    /// Set when the applicant holds the HR role; such requests can only be
    /// approved or rejected by an admin.
    #[schema(example = false)]
    pub requires_admin: bool,
    #[schema(example = "2026-03-01T00:00:00Z", format = "date-time", value_type = String)]
    pub applied_on: Option<DateTime<Utc>>,
}
