use crate::auth::auth::AuthUser;
use crate::model::department::Department;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateDepartment {
    #[schema(example = "Engineering")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn internal(e: sqlx::Error, what: &str) -> actix_web::Error {
    error!(error = %e, "{}", what);
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, description = "All departments", body = [Department])),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn list_departments(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let departments = sqlx::query_as::<_, Department>(
        "SELECT id, name, description, is_active FROM departments ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to list departments"))?;

    Ok(HttpResponse::Ok().json(departments))
}

/// Fetch a department
#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn get_department(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let department = sqlx::query_as::<_, Department>(
        "SELECT id, name, description, is_active FROM departments WHERE id = ?",
    )
    .bind(path.into_inner())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to fetch department"))?;

    match department {
        Some(d) => Ok(HttpResponse::Ok().json(d)),
        None => Ok(HttpResponse::NotFound().json(json!({"message": "Department not found"}))),
    }
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn create_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateDepartment>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        "INSERT INTO departments (name, description, is_active) VALUES (?, ?, TRUE)",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to create department"))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Department created",
        "id": result.last_insert_id()
    })))
}

/// Update a department
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department id")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn update_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateDepartment>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        UPDATE departments
        SET name = COALESCE(?, name), description = COALESCE(?, description)
        WHERE id = ?
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(path.into_inner())
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to update department"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Department not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Department updated"})))
}

async fn set_active(
    auth: &AuthUser,
    pool: &MySqlPool,
    id: u64,
    active: bool,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("UPDATE departments SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| internal(e, "Failed to change department state"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Department not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({
        "message": if active { "Department activated" } else { "Department deactivated" }
    })))
}

/// Activate a department
#[utoipa::path(
    put,
    path = "/api/departments/{id}/activate",
    params(("id" = u64, Path, description = "Department id")),
    responses((status = 200, description = "Activated"), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn activate_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), true).await
}

/// Deactivate a department
#[utoipa::path(
    put,
    path = "/api/departments/{id}/deactivate",
    params(("id" = u64, Path, description = "Department id")),
    responses((status = 200, description = "Deactivated"), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn deactivate_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), false).await
}

/// Delete a department
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Department still has employees")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn delete_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => {
            Ok(HttpResponse::NotFound().json(json!({"message": "Department not found"})))
        }
        Ok(_) => Ok(HttpResponse::Ok().json(json!({"message": "Department deleted"}))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::Conflict()
                        .json(json!({"message": "Department still has employees"})));
                }
            }
            Err(internal(e, "Failed to delete department"))
        }
    }
}
