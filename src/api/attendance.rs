use crate::auth::auth::AuthUser;
use crate::model::attendance::Attendance;
use chrono::NaiveDate;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

/// Coordinates captured by the client at the moment of clocking.
/// The server only records them; acquisition is the client's problem.
#[derive(Deserialize, ToSchema)]
pub struct ClockPayload {
    #[schema(example = 23.8103)]
    pub latitude: f64,
    #[schema(example = 90.4125)]
    pub longitude: f64,
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    request_body = ClockPayload,
    responses(
        (status = 200, description = "Clocked in successfully", body = Object, example = json!({
            "message": "Clocked in successfully"
        })),
        (status = 400, description = "Already clocked in today", body = Object, example = json!({
            "message": "Already clocked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockPayload>,
) -> actix_web::Result<impl Responder> {
    let trainer_id = auth.require_trainer_profile()?;

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (trainer_id, date, clock_in, clock_in_lat, clock_in_lng)
        VALUES (?, CURDATE(), CURTIME(), ?, ?)
        "#,
    )
    .bind(trainer_id)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Clocked in successfully"
        }))),

        Err(e) => {
            // Duplicate clock-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already clocked in today"
                    })));
                }
            }

            tracing::error!(error = %e, trainer_id, "Clock-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Clock-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/clock-out",
    request_body = ClockPayload,
    responses(
        (status = 200, description = "Clocked out successfully", body = Object, example = json!({
            "message": "Clocked out successfully"
        })),
        (status = 400, description = "No active clock-in found for today", body = Object, example = json!({
            "message": "No active clock-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockPayload>,
) -> actix_web::Result<impl Responder> {
    let trainer_id = auth.require_trainer_profile()?;

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET clock_out = CURTIME(),
            clock_out_lat = ?,
            clock_out_lng = ?
        WHERE trainer_id = ?
        AND date = CURDATE()
        AND clock_out IS NULL
        "#,
    )
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(trainer_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, trainer_id, "Clock-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active clock-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clocked out successfully"
    })))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    #[schema(example = "2026-03-01")]
    /// Earliest date to include
    pub from: Option<NaiveDate>,
    #[schema(example = "2026-03-31")]
    /// Latest date to include
    pub to: Option<NaiveDate>,
}

/// Own attendance records endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Own attendance records, newest first", body = [Attendance]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    let trainer_id = auth.require_trainer_profile()?;

    let mut sql = String::from(
        "SELECT id, trainer_id, date, clock_in, clock_out, \
         clock_in_lat, clock_in_lng, clock_out_lat, clock_out_lng \
         FROM attendance WHERE trainer_id = ?",
    );
    if query.from.is_some() {
        sql.push_str(" AND date >= ?");
    }
    if query.to.is_some() {
        sql.push_str(" AND date <= ?");
    }
    sql.push_str(" ORDER BY date DESC");

    let mut db_query = sqlx::query_as::<_, Attendance>(&sql).bind(trainer_id);
    if let Some(from) = query.from {
        db_query = db_query.bind(from);
    }
    if let Some(to) = query.to {
        db_query = db_query.bind(to);
    }

    let records = db_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, trainer_id, "Failed to fetch attendance records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}
