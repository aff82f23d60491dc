use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::model::role::Role;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    #[schema(example = 4)]
    pub role_id: u8,
    pub employee_id: Option<u64>,
}

/// Password hash never leaves the database through this endpoint.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub role_id: u8,
    pub employee_id: Option<u64>,
    pub is_active: bool,
}

fn internal(e: sqlx::Error, what: &str) -> actix_web::Error {
    error!(error = %e, "{}", what);
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// List user accounts
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "User accounts", body = [UserResponse]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let users = sqlx::query_as::<_, UserResponse>(
        "SELECT id, username, role_id, employee_id, is_active FROM users ORDER BY username",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to list users"))?;

    Ok(HttpResponse::Ok().json(users))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Username taken")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn create_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if Role::from_id(payload.role_id).is_none() {
        return Ok(HttpResponse::BadRequest().json(json!({"message": "Unknown role id"})));
    }

    let hashed = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let result = sqlx::query(
        "INSERT INTO users (username, password, role_id, employee_id, is_active) VALUES (?, ?, ?, ?, TRUE)",
    )
    .bind(payload.username.trim())
    .bind(&hashed)
    .bind(payload.role_id)
    .bind(payload.employee_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(r) => Ok(HttpResponse::Created().json(json!({
            "message": "User created",
            "id": r.last_insert_id()
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(
                        HttpResponse::Conflict().json(json!({"message": "Username already exists"}))
                    );
                }
            }
            Err(internal(e, "Failed to create user"))
        }
    }
}

async fn set_active(
    auth: &AuthUser,
    pool: &MySqlPool,
    id: u64,
    active: bool,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| internal(e, "Failed to change user state"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "User not found"})));
    }

    // The refresh flow only checks that the token's jti is still stored,
    // so a deactivated account must lose its sessions here.
    if !active {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| internal(e, "Failed to revoke refresh tokens"))?;
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": if active { "User activated" } else { "User deactivated" }
    })))
}

/// Activate a user account
#[utoipa::path(
    put,
    path = "/api/users/{id}/activate",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Activated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn activate_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), true).await
}

/// Deactivate a user account
///
/// Blocks new logins and drops the account's stored refresh tokens.
#[utoipa::path(
    put,
    path = "/api/users/{id}/deactivate",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Deactivated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn deactivate_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), false).await
}
