use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::leave::balance::{Balance, LeaveBalances, TypeBalance};
use crate::leave::overlap::ExistingLeave;
use crate::leave::validator::{validate, ApplicantSnapshot, Field, LeaveApplication};
use crate::model::leave_request::{LeaveStatus, LeaveType};
use crate::model::role::Role;
use crate::model::trainer::TrainerCategory;
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, MySqlPool};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = "casual")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "Attending a family function out of town for several days")]
    pub reason: String,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    /// leave application id
    pub id: u64,
    /// trainer for whom the leave is applied
    #[schema(example = 1000)]
    pub trainer_id: u64,
    #[schema(example = "casual", value_type = String)]
    pub leave_type: String,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = 3)]
    /// inclusive day count, derived server-side
    pub number_of_days: i64,
    #[schema(example = "pending", value_type = String)]
    pub status: String,
    #[schema(example = "2026-03-01T00:00:00Z", format = "date-time", value_type = String)]
    pub applied_on: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 123)]
    /// Filter by trainer ID
    pub trainer_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = "casual")]
    /// Filter by leave type
    pub leave_type: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/* =========================
Snapshot loaders
========================= */

async fn load_category(
    pool: &MySqlPool,
    trainer_id: u64,
) -> Result<Option<TrainerCategory>, sqlx::Error> {
    let category: Option<String> =
        sqlx::query_scalar("SELECT category FROM trainers WHERE id = ?")
            .bind(trainer_id)
            .fetch_optional(pool)
            .await?;

    Ok(category.and_then(|c| c.parse().ok()))
}

async fn load_balances(pool: &MySqlPool, trainer_id: u64) -> Result<LeaveBalances, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, Option<i64>, i64, i64)>(
        r#"
        SELECT leave_type, available, used, carry_forward
        FROM leave_balances
        WHERE trainer_id = ?
        "#,
    )
    .bind(trainer_id)
    .fetch_all(pool)
    .await?;

    let mut balances = LeaveBalances::all_zero();
    for (leave_type, available, used, carry_forward) in rows {
        if let Ok(lt) = leave_type.parse::<LeaveType>() {
            *balances.get_mut(lt) = TypeBalance {
                available: Balance::from_stored(available),
                used,
                carry_forward,
            };
        }
    }
    Ok(balances)
}

async fn load_existing_leaves(
    pool: &MySqlPool,
    trainer_id: u64,
) -> Result<Vec<ExistingLeave>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (NaiveDate, NaiveDate, String)>(
        r#"
        SELECT from_date, to_date, status
        FROM leave_requests
        WHERE trainer_id = ?
        "#,
    )
    .bind(trainer_id)
    .fetch_all(pool)
    .await?;

    // The engine drops terminal records again; parsing failures are skipped.
    Ok(rows
        .into_iter()
        .filter_map(|(from_date, to_date, status)| {
            status.parse::<LeaveStatus>().ok().map(|status| ExistingLeave {
                from_date,
                to_date,
                status,
            })
        })
        .collect())
}

/* =========================
Apply for leave
========================= */
/// Swagger doc for apply_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = ApplyLeave,
        description = "Leave application payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave application submitted",
         body = Object,
         example = json!({
            "message": "Leave application submitted",
            "status": "pending",
            "id": 42,
            "number_of_days": 3
         })
        ),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "errors": { "reason": "Reason must contain at least 7 words" }
        })),
        (status = 409, description = "Dates overlap an existing leave", body = Object, example = json!({
            "message": "Dates overlap an existing approved leave from 2026-03-10 to 2026-03-15",
            "errors": { "overlapping": "Dates overlap an existing approved leave from 2026-03-10 to 2026-03-15" }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    let trainer_id = auth.require_trainer_profile()?;

    let category = load_category(pool.get_ref(), trainer_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, trainer_id, "Failed to load trainer category");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .ok_or_else(|| actix_web::error::ErrorForbidden("No trainer profile"))?;

    let balances = load_balances(pool.get_ref(), trainer_id).await.map_err(|e| {
        tracing::error!(error = %e, trainer_id, "Failed to load leave balances");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let existing = load_existing_leaves(pool.get_ref(), trainer_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, trainer_id, "Failed to load leave history");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let application = LeaveApplication {
        leave_type: payload.leave_type,
        from_date: payload.from_date,
        to_date: payload.to_date,
        reason: payload.reason.clone(),
    };
    let snapshot = ApplicantSnapshot {
        role: auth.role,
        category,
        balances: &balances,
        existing: &existing,
    };

    let errors = validate(
        &application,
        &snapshot,
        Utc::now().date_naive(),
        &config.leave_policy(),
    );

    // Overlap is a conflict with existing records, not a malformed request.
    if let Some(message) = errors.get(Field::Overlapping) {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": message,
            "errors": errors
        })));
    }
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "errors": errors
        })));
    }

    let number_of_days =
        crate::leave::date_range::days_between_inclusive(payload.from_date, payload.to_date);
    let requires_admin = auth.role == Role::Hr;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (trainer_id, leave_type, from_date, to_date, number_of_days, reason, status, requires_admin)
        VALUES (?, ?, ?, ?, ?, ?, 'pending', ?)
        "#,
    )
    .bind(trainer_id)
    .bind(payload.leave_type.to_string())
    .bind(payload.from_date)
    .bind(payload.to_date)
    .bind(number_of_days)
    .bind(payload.reason.trim())
    .bind(requires_admin)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, trainer_id, "Failed to create leave application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave application submitted",
        "status": "pending",
        "id": result.last_insert_id(),
        "number_of_days": number_of_days
    })))
}

/* =========================
Approve leave
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave application not found or already processed", body = Object, example = json!({
            "message": "Leave application not found or already processed"
        })),
        (status = 409, description = "Balance drained since the application was made", body = Object, example = json!({
            "message": "Insufficient balance to approve this leave"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let row = sqlx::query_as::<_, (u64, String, i64, bool, String)>(
        r#"
        SELECT trainer_id, leave_type, number_of_days, requires_admin, status
        FROM leave_requests
        WHERE id = ?
        FOR UPDATE
        "#,
    )
    .bind(leave_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some((trainer_id, leave_type, number_of_days, requires_admin, status)) = row else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or already processed"
        })));
    };

    // HR applications route to admins only.
    if requires_admin {
        auth.require_admin()?;
    }

    if status != "pending" {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or already processed"
        })));
    }

    // HR balances are unlimited by construction; everyone else consumes the
    // ledger atomically with the status flip.
    if !requires_admin {
        let available: Option<Option<i64>> = sqlx::query_scalar(
            r#"
            SELECT available FROM leave_balances
            WHERE trainer_id = ? AND leave_type = ?
            FOR UPDATE
            "#,
        )
        .bind(trainer_id)
        .bind(&leave_type)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to lock leave balance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        let sufficient = match available {
            Some(None) => true, // unlimited
            Some(Some(n)) => n >= number_of_days,
            None => false, // no ledger row at all
        };
        if !sufficient {
            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                "message": "Insufficient balance to approve this leave"
            })));
        }

        sqlx::query(
            r#"
            UPDATE leave_balances
            SET used = used + ?,
                available = CASE WHEN available IS NULL THEN NULL ELSE available - ? END
            WHERE trainer_id = ? AND leave_type = ?
            "#,
        )
        .bind(number_of_days)
        .bind(number_of_days)
        .bind(trainer_id)
        .bind(&leave_type)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to consume leave balance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'approved'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Approve leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to commit approval");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave approved"
    })))
}

/* =========================
Reject leave
========================= */
/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected successfully", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Leave application not found or already processed", body = Object, example = json!({
            "message": "Leave application not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    let requires_admin: Option<bool> =
        sqlx::query_scalar("SELECT requires_admin FROM leave_requests WHERE id = ?")
            .bind(leave_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, leave_id, "Failed to fetch leave application");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    match requires_admin {
        Some(true) => auth.require_admin()?,
        Some(false) => {}
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Leave application not found or already processed"
            })))
        }
    }

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'rejected'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Reject leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave rejected"
    })))
}

/* =========================
Cancel leave (owner)
========================= */
/// Swagger doc for cancel_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled", body = Object, example = json!({
            "message": "Leave cancelled"
        })),
        (status = 400, description = "Leave application not found or no longer actionable", body = Object, example = json!({
            "message": "Leave application not found or no longer actionable"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let trainer_id = auth.require_trainer_profile()?;
    let leave_id = path.into_inner();

    // Only the applicant may cancel, and only while still pending.
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'cancelled'
        WHERE id = ?
        AND trainer_id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .bind(trainer_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Cancel leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or no longer actionable"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave cancelled"
    })))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to fetch")
    ),
    responses(
        (status = 200, description = "Leave application found", body = crate::model::leave_request::LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found", body = Object, example = json!({
            "message": "Leave application not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, crate::model::leave_request::LeaveRequest>(
        r#"
        SELECT
            id,
            trainer_id,
            leave_type,
            from_date,
            to_date,
            number_of_days,
            reason,
            status,
            requires_admin,
            applied_on
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => {
            // Owners may view their own; everyone else needs HR/Admin.
            if auth.trainer_id != Some(data.trainer_id) {
                auth.require_hr_or_admin()?;
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave application not found"
        }))),
    }
}

async fn paginated_leaves(
    pool: &MySqlPool,
    where_sql: String,
    args: Vec<FilterValue<'_>>,
    page: u64,
    per_page: u64,
) -> actix_web::Result<LeaveListResponse> {
    let offset = (page - 1) * per_page;

    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count leave applications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, trainer_id, leave_type, from_date, to_date, number_of_days, status, applied_on
        FROM leave_requests
        {}
        ORDER BY applied_on DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    })
}

/// for getting leave applications endpoint (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(trainer_id) = query.trainer_id {
        where_sql.push_str(" AND trainer_id = ?");
        args.push(FilterValue::U64(trainer_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    if let Some(leave_type) = query.leave_type.as_deref() {
        where_sql.push_str(" AND leave_type = ?");
        args.push(FilterValue::Str(leave_type));
    }

    let response = paginated_leaves(pool.get_ref(), where_sql, args, page, per_page).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// own leave history endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/history",
    params(
        ("page" = Option<u64>, Query, description = "Pagination page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated own leave history", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let trainer_id = auth.require_trainer_profile()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let where_sql = String::from(" WHERE trainer_id = ?");
    let args = vec![FilterValue::U64(trainer_id)];

    let response = paginated_leaves(pool.get_ref(), where_sql, args, page, per_page).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// own leave balances endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    responses(
        (status = 200, description = "Per-type leave balances", body = LeaveBalances, example = json!({
            "sick": { "available": 8, "used": 2, "carryForward": 0 },
            "casual": { "available": 5, "used": 1, "carryForward": 2 },
            "paid": { "available": "Unlimited", "used": 4, "carryForward": 0 }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    // HR reads as unlimited whatever the ledger table holds.
    if auth.role == Role::Hr {
        return Ok(HttpResponse::Ok().json(LeaveBalances::all_unlimited()));
    }

    let trainer_id = auth.require_trainer_profile()?;

    let balances = load_balances(pool.get_ref(), trainer_id).await.map_err(|e| {
        tracing::error!(error = %e, trainer_id, "Failed to load leave balances");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(balances))
}

/* =========================
Accrual & rollover (Admin)
========================= */
/// monthly accrual run endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave/balance/accrue",
    responses(
        (status = 200, description = "Monthly accrual applied", body = Object, example = json!({
            "message": "Monthly accrual applied",
            "balances_updated": 42
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn accrue_balances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let policy = config.accrual_policy();

    // Permanent trainers accrue on finite balances; contracted balances are
    // fixed and NULL (unlimited) has nothing to accrue into.
    let result = sqlx::query(
        r#"
        UPDATE leave_balances lb
        JOIN trainers t ON t.id = lb.trainer_id
        SET lb.available = lb.available + ?
        WHERE t.category = 'permanent'
        AND lb.available IS NOT NULL
        "#,
    )
    .bind(policy.monthly_accrual_days)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Monthly accrual failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        balances_updated = result.rows_affected(),
        days = policy.monthly_accrual_days,
        "Monthly accrual applied"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Monthly accrual applied",
        "balances_updated": result.rows_affected()
    })))
}

/// yearly rollover run endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave/balance/rollover",
    responses(
        (status = 200, description = "Yearly rollover applied", body = Object, example = json!({
            "message": "Yearly rollover applied",
            "balances_updated": 42
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn rollover_balances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let policy = config.accrual_policy();

    // Unused finite balance carries into carry_forward up to the cap;
    // available resets and the next accrual runs rebuild it.
    let result = sqlx::query(
        r#"
        UPDATE leave_balances
        SET carry_forward = LEAST(GREATEST(available, 0), ?),
            available = 0,
            used = 0
        WHERE available IS NOT NULL
        "#,
    )
    .bind(policy.rollover_cap_days)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Yearly rollover failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        balances_updated = result.rows_affected(),
        cap = policy.rollover_cap_days,
        "Yearly rollover applied"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Yearly rollover applied",
        "balances_updated": result.rows_affected()
    })))
}
