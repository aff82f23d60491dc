use crate::auth::auth::AuthUser;
use crate::model::leave_type::LeaveType;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveType {
    #[schema(example = "Annual Leave")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 20)]
    pub max_days_per_year: u32,
    pub requires_approval: bool,
    pub is_paid: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeaveType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub max_days_per_year: Option<u32>,
    pub requires_approval: Option<bool>,
    pub is_paid: Option<bool>,
}

fn internal(e: sqlx::Error, what: &str) -> actix_web::Error {
    error!(error = %e, "{}", what);
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

const COLUMNS: &str =
    "id, name, description, max_days_per_year, requires_approval, is_paid, is_active";

/// List leave types
#[utoipa::path(
    get,
    path = "/api/leavetypes",
    responses((status = 200, description = "All leave types", body = [LeaveType])),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let types = sqlx::query_as::<_, LeaveType>(&format!(
        "SELECT {} FROM leave_types ORDER BY name",
        COLUMNS
    ))
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to list leave types"))?;

    Ok(HttpResponse::Ok().json(types))
}

/// Fetch a leave type
#[utoipa::path(
    get,
    path = "/api/leavetypes/{id}",
    params(("id" = u64, Path, description = "Leave type id")),
    responses(
        (status = 200, description = "Leave type", body = LeaveType),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn get_leave_type(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_type = sqlx::query_as::<_, LeaveType>(&format!(
        "SELECT {} FROM leave_types WHERE id = ?",
        COLUMNS
    ))
    .bind(path.into_inner())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to fetch leave type"))?;

    match leave_type {
        Some(t) => Ok(HttpResponse::Ok().json(t)),
        None => Ok(HttpResponse::NotFound().json(json!({"message": "Leave type not found"}))),
    }
}

/// Create a leave type
#[utoipa::path(
    post,
    path = "/api/leavetypes",
    request_body = CreateLeaveType,
    responses(
        (status = 201, description = "Leave type created"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn create_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveType>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_types
            (name, description, max_days_per_year, requires_approval, is_paid, is_active)
        VALUES (?, ?, ?, ?, ?, TRUE)
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.max_days_per_year)
    .bind(payload.requires_approval)
    .bind(payload.is_paid)
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to create leave type"))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave type created",
        "id": result.last_insert_id()
    })))
}

/// Update a leave type
#[utoipa::path(
    put,
    path = "/api/leavetypes/{id}",
    params(("id" = u64, Path, description = "Leave type id")),
    request_body = UpdateLeaveType,
    responses(
        (status = 200, description = "Leave type updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn update_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeaveType>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        UPDATE leave_types
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            max_days_per_year = COALESCE(?, max_days_per_year),
            requires_approval = COALESCE(?, requires_approval),
            is_paid = COALESCE(?, is_paid)
        WHERE id = ?
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.max_days_per_year)
    .bind(payload.requires_approval)
    .bind(payload.is_paid)
    .bind(path.into_inner())
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to update leave type"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Leave type not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Leave type updated"})))
}

async fn set_active(
    auth: &AuthUser,
    pool: &MySqlPool,
    id: u64,
    active: bool,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("UPDATE leave_types SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| internal(e, "Failed to change leave type state"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Leave type not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({
        "message": if active { "Leave type activated" } else { "Leave type deactivated" }
    })))
}

/// Activate a leave type
#[utoipa::path(
    put,
    path = "/api/leavetypes/{id}/activate",
    params(("id" = u64, Path, description = "Leave type id")),
    responses((status = 200, description = "Activated"), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn activate_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), true).await
}

/// Deactivate a leave type
#[utoipa::path(
    put,
    path = "/api/leavetypes/{id}/deactivate",
    params(("id" = u64, Path, description = "Leave type id")),
    responses((status = 200, description = "Deactivated"), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn deactivate_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), false).await
}

/// Delete a leave type
#[utoipa::path(
    delete,
    path = "/api/leavetypes/{id}",
    params(("id" = u64, Path, description = "Leave type id")),
    responses(
        (status = 200, description = "Leave type deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Leave type is referenced by existing requests")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn delete_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("DELETE FROM leave_types WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => {
            Ok(HttpResponse::NotFound().json(json!({"message": "Leave type not found"})))
        }
        Ok(_) => Ok(HttpResponse::Ok().json(json!({"message": "Leave type deleted"}))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::Conflict()
                        .json(json!({"message": "Leave type is still in use"})));
                }
            }
            Err(internal(e, "Failed to delete leave type"))
        }
    }
}
