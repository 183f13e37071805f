use crate::api::attendance::{AttendanceFilter, ClockPayload};
use crate::api::leave::{ApplyLeave, LeaveFilter, LeaveListResponse, LeaveResponse};
use crate::api::trainer::{CreateTrainer, TrainerListResponse, TrainerQuery};
use crate::hierarchy::{HierarchyNode, TrainerSummary};
use crate::leave::balance::{Balance, LeaveBalances, TypeBalance};
use crate::model::attendance::Attendance;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::trainer::{Trainer, TrainerCategory};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TrainerSync API",
        version = "1.0.0",
        description = r#"
## TrainerSync — Workforce Management for Trainers

This API powers **TrainerSync**, a workforce-management system for tracking
trainer attendance and leave within an organization.

### Key Features
- **Leave Management**
  - Apply for leave with server-side validation (advance notice, span limit,
    overlap detection, balance sufficiency, reason quality)
  - Approve/reject/cancel flows with role-based routing (HR applications
    require Admin approval)
  - Per-type leave balances with monthly accrual and yearly rollover
- **Attendance Management**
  - Daily clock-in / clock-out with geolocation capture
- **Trainer Management**
  - Provision, update, list and view trainer profiles
  - Manager/subordinate hierarchy (team trees)

### Security
Most endpoints are protected using **JWT Bearer authentication**.
Only authorized roles such as **Admin** or **HR** can access sensitive operations.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- Validation failures return a field-keyed error map

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::apply_leave,
        crate::api::leave::leave_list,
        crate::api::leave::leave_history,
        crate::api::leave::leave_balance,
        crate::api::leave::get_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::cancel_leave,
        crate::api::leave::accrue_balances,
        crate::api::leave::rollover_balances,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::my_attendance,

        crate::api::trainer::create_trainer,
        crate::api::trainer::get_trainer,
        crate::api::trainer::list_trainers,
        crate::api::trainer::update_trainer,
        crate::api::trainer::delete_trainer,
        crate::api::trainer::get_team
    ),
    components(
        schemas(
            ApplyLeave,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            LeaveType,
            LeaveStatus,
            LeaveRequest,
            Balance,
            TypeBalance,
            LeaveBalances,
            ClockPayload,
            AttendanceFilter,
            Attendance,
            CreateTrainer,
            TrainerQuery,
            Trainer,
            TrainerCategory,
            TrainerListResponse,
            TrainerSummary,
            HierarchyNode
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Trainer", description = "Trainer management APIs"),
        (name = "Hierarchy", description = "Manager/subordinate hierarchy APIs"),
    )
)]
pub struct ApiDoc;
