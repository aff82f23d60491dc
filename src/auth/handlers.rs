use crate::{
    auth::{
        jwt::{TokenIdentity, generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    models::{LoginReqDto, TokenType, UserReq, UserSql},
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

// auth end points

/// User registration handler. Admin-driven in practice: the UI creates an
/// employee record first, then the account that points at it.
pub async fn register(user: web::Json<UserReq>, pool: web::Data<MySqlPool>) -> impl Responder {
    let username = user.username.trim();
    let password = &user.password;

    if username.is_empty() || password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "Username and password must not be empty"
        }));
    }

    let hashed = match hash_password(password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            }));
        }
    };

    let result = sqlx::query(
        r#"INSERT INTO users (username, password, role_id, employee_id) VALUES (?, ?, ?, ?)"#,
    )
    .bind(username)
    .bind(&hashed)
    .bind(user.role_id)
    .bind(user.employee_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "User registered successfully"
        })),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return HttpResponse::Conflict().json(json!({
                        "error": "Username already exists"
                    }));
                }
            }
            error!(error = %e, "Failed to register user");
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            }))
        }
    }
}

#[derive(Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    // 1. Basic validation
    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    // 2. Fetch user, with the linked employee's department for the token
    debug!("Fetching user from database");

    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT u.id, u.username, u.password, u.role_id, u.employee_id, e.department_id
        FROM users u
        LEFT JOIN employees e ON e.id = u.employee_id
        WHERE u.username = ? AND u.is_active = TRUE
        "#,
    )
    .bind(&user.username)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    // 3. Verify password
    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Password verified");

    let identity = TokenIdentity {
        user_id: db_user.id,
        username: db_user.username.clone(),
        role: db_user.role_id,
        employee_id: db_user.employee_id,
        department_id: db_user.department_id,
    };

    // 4. Generate tokens
    let access_token = generate_access_token(&identity, &config.jwt_secret, config.access_token_ttl);
    let (refresh_token, refresh_claims) =
        generate_refresh_token(&identity, &config.jwt_secret, config.refresh_token_ttl);

    // 5. Store refresh token
    debug!(
        user_id = db_user.id,
        jti = %refresh_claims.jti,
        "Storing refresh token"
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(db_user.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // 6. Update last_login_at (non-fatal)
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE username = ?")
        .bind(&user.username)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
        // intentionally not failing login
    }

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
    })
}

#[derive(Deserialize)]
pub struct RefreshReq {
    refresh_token: String,
}

pub async fn refresh_token(
    payload: web::Json<RefreshReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    // 1. Verify signature and expiry
    let claims = match verify_token(&payload.refresh_token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            info!(error = %e, "Refresh token rejected");
            return HttpResponse::Unauthorized().json(json!({
                "error": "Invalid or expired refresh token"
            }));
        }
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().json(json!({
            "error": "Not a refresh token"
        }));
    }

    // 2. The jti must still be on record (logout revokes it)
    let known = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM refresh_tokens WHERE jti = ? AND user_id = ?)",
    )
    .bind(&claims.jti)
    .bind(claims.user_id)
    .fetch_one(pool.get_ref())
    .await
    .unwrap_or(false);

    if !known {
        info!(user_id = claims.user_id, "Refresh token revoked or unknown");
        return HttpResponse::Unauthorized().json(json!({
            "error": "Refresh token revoked"
        }));
    }

    // 3. Issue a fresh access token with the same identity
    let identity = TokenIdentity {
        user_id: claims.user_id,
        username: claims.sub.clone(),
        role: claims.role,
        employee_id: claims.employee_id,
        department_id: claims.department_id,
    };

    let access_token = generate_access_token(&identity, &config.jwt_secret, config.access_token_ttl);

    HttpResponse::Ok().json(json!({ "access_token": access_token }))
}

pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let token = match req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        Some(t) => t,
        None => {
            return HttpResponse::Unauthorized().json(json!({"error": "Missing token"}));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => {
            return HttpResponse::Unauthorized().json(json!({"error": "Invalid token"}));
        }
    };

    // Revoke every refresh token for the user; sessions on other devices
    // go too, which is what the UI's logout button promises.
    if let Err(e) = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(claims.user_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh tokens");
        return HttpResponse::InternalServerError().finish();
    }

    info!(user_id = claims.user_id, "Logged out");
    HttpResponse::Ok().json(json!({"message": "Logged out"}))
}
