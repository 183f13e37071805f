use crate::{
    auth::auth::AuthUser,
    hierarchy,
    model::trainer::{Trainer, TrainerCategory},
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Columns an update payload may touch. `category` is deliberately absent:
/// the trainer category is immutable after provisioning.
const UPDATABLE_COLUMNS: &[&str] = &[
    "trainer_code",
    "first_name",
    "last_name",
    "email",
    "phone",
    "manager_id",
    "hire_date",
    "status",
];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateTrainer {
    #[schema(example = "TRN-300", value_type = String)]
    pub trainer_code: String,
    #[schema(example = "first name", value_type = String)]
    pub first_name: String,
    #[schema(example = "last name", value_type = String)]
    pub last_name: String,
    #[schema(example = "john@email.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "permanent")]
    pub category: TrainerCategory,
    #[schema(example = 7, value_type = Option<u64>)]
    pub manager_id: Option<u64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
    /// Starting finite balance for each offered leave type; omit for the
    /// category defaults (permanent paid leave is provisioned unlimited).
    #[schema(example = 10, value_type = Option<i64>)]
    pub initial_balance: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrainerQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<String>,
    pub manager_id: Option<u64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TrainerListResponse {
    pub data: Vec<Trainer>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 5)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Trainer
#[utoipa::path(
    post,
    path = "/api/v1/trainers",
    request_body = CreateTrainer,
    responses(
        (status = 200, description = "Trainer created successfully", body = Object, example = json!({
            "message": "Trainer created successfully"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Trainer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_trainer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateTrainer>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        r#"
        INSERT INTO trainers
        (trainer_code, first_name, last_name, email, category, manager_id, hire_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.trainer_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(payload.category.to_string())
    .bind(payload.manager_id)
    .bind(payload.hire_date)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create trainer");
        ErrorInternalServerError("Something went wrong, Contact with system admin")
    })?;

    let trainer_id = result.last_insert_id();

    // Seed the ledger. Contracted trainers only get a paid-leave row; a
    // permanent trainer's paid leave is unlimited (NULL) per policy.
    let initial = payload.initial_balance.unwrap_or(0);
    let rows: Vec<(&str, Option<i64>)> = match payload.category {
        TrainerCategory::Permanent => vec![
            ("sick", Some(initial)),
            ("casual", Some(initial)),
            ("paid", None),
        ],
        TrainerCategory::Contracted => vec![("paid", Some(initial))],
    };

    for (leave_type, available) in rows {
        sqlx::query(
            r#"
            INSERT INTO leave_balances (trainer_id, leave_type, available, used, carry_forward)
            VALUES (?, ?, ?, 0, 0)
            "#,
        )
        .bind(trainer_id)
        .bind(leave_type)
        .bind(available)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, trainer_id, leave_type, "Failed to seed leave balance");
            ErrorInternalServerError("Something went wrong, Contact with system admin")
        })?;
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit trainer creation");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Trainer created successfully",
        "id": trainer_id
    })))
}

// -------------------- Handler --------------------

#[utoipa::path(
    get,
    path = "/api/v1/trainers",
    params(
        ("page",  Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("category", Query, description = "Filter by trainer category"),
        ("manager_id", Query, description = "Filter by manager"),
        ("status", Query, description = "Filter by status"),
        ("search", Query, description = "Search by name or email")
    ),
    responses(
        (status = 200, description = "Paginated trainer list", body = TrainerListResponse)
    ),
    tag = "Trainer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_trainers(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TrainerQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<sqlx::types::JsonValue> = Vec::new();

    if let Some(category) = &query.category {
        conditions.push("category = ?");
        bindings.push(category.clone().into());
    }

    if let Some(manager_id) = query.manager_id {
        conditions.push("manager_id = ?");
        bindings.push(manager_id.into());
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone().into());
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone().into());
        bindings.push(like.clone().into());
        bindings.push(like.into());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM trainers {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting trainers");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count trainers");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM trainers {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching trainers");

    let mut data_query = sqlx::query_as::<_, Trainer>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let trainers = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch trainers");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(TrainerListResponse {
        data: trainers,
        page,
        per_page,
        total,
    }))
}

/// Update Trainer
#[utoipa::path(
    put,
    path = "/api/v1/trainers/{trainer_id}",
    params(
        ("trainer_id", Path, description = "Trainer ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Trainer updated successfully", body = Object, example = json!({
            "message": "Trainer updated successfully"
        })),
        (status = 400, description = "Payload contains a field that cannot be updated"),
        (status = 404, description = "Trainer not found", body = Object, example = json!({
            "message": "Trainer not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Trainer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_trainer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let trainer_id = path.into_inner();

    let update = build_update_sql("trainers", &body, "id", trainer_id, UPDATABLE_COLUMNS)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Trainer not found"));
    }

    Ok(HttpResponse::Ok().body("Trainer updated successfully"))
}

/// Delete Trainer
#[utoipa::path(
    delete,
    path = "/api/v1/trainers/{trainer_id}",
    params(
        ("trainer_id", Path, description = "Trainer ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Trainer not found", body = Object, example = json!({
            "message": "Trainer not found"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Trainer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_trainer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let trainer_id = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM trainers WHERE id = ?"#)
        .bind(trainer_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Trainer not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, trainer_id, "Failed to delete trainer");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Get Trainer by ID
#[utoipa::path(
    get,
    path = "/api/v1/trainers/{trainer_id}",
    params(
        ("trainer_id", Path, description = "Trainer ID")
    ),
    responses(
        (status = 200, description = "Trainer found", body = Trainer),
        (status = 404, description = "Trainer not found", body = Object, example = json!({
            "message": "Trainer not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Trainer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_trainer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let trainer_id: u64 = path.into_inner();

    // Own profile is visible to its trainer; others need HR/Admin.
    if auth.trainer_id != Some(trainer_id) {
        auth.require_hr_or_admin()?;
    }

    let trainer = sqlx::query_as::<_, Trainer>(
        r#"
        SELECT
            id,
            trainer_code,
            first_name,
            last_name,
            email,
            phone,
            category,
            manager_id,
            hire_date,
            status
        FROM trainers
        WHERE id = ?
        "#,
    )
    .bind(trainer_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, trainer_id, "Failed to fetch trainer");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match trainer {
        Some(t) => Ok(HttpResponse::Ok().json(t)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Trainer not found"
        }))),
    }
}

/// Subordinate tree for a trainer
#[utoipa::path(
    get,
    path = "/api/v1/trainers/{trainer_id}/team",
    params(
        ("trainer_id", Path, description = "Root trainer ID")
    ),
    responses(
        (status = 200, description = "Subordinate tree", body = hierarchy::HierarchyNode),
        (status = 404, description = "Trainer not found", body = Object, example = json!({
            "message": "Trainer not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Hierarchy",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_team(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let trainer_id: u64 = path.into_inner();

    // Managers can see their own subtree; anything else needs HR/Admin.
    if auth.trainer_id != Some(trainer_id) {
        auth.require_hr_or_admin()?;
    }

    let tree = hierarchy::subordinate_tree(pool.get_ref(), trainer_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, trainer_id, "Failed to build subordinate tree");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match tree {
        Some(node) => Ok(HttpResponse::Ok().json(node)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Trainer not found"
        }))),
    }
}
