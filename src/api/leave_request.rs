use crate::auth::auth::AuthUser;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::workflow::{self, LeaveAction, TransitionError};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct TransitionReq {
    /// Optional approver/owner comment; replaces any earlier comment.
    pub comments: Option<String>,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, employee_id, department_manager_id, leave_type_id,
           start_date, end_date, total_days, reason, status, comments, created_at
    FROM leave_requests
"#;

async fn fetch_all(pool: &MySqlPool) -> Result<Vec<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(&format!("{} ORDER BY created_at DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
}

async fn fetch_by_id(pool: &MySqlPool, id: u64) -> Result<Option<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List leave requests the caller may see
#[utoipa::path(
    get,
    path = "/api/leaverequests",
    responses(
        (status = 200, description = "Leave requests visible to the caller", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn list_leave_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let all = fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let visible = workflow::visible_requests(&all, &auth.actor());
    Ok(HttpResponse::Ok().json(visible))
}

/// List leave requests waiting on the caller's approval gate
#[utoipa::path(
    get,
    path = "/api/leaverequests/pending",
    responses(
        (status = 200, description = "Requests pending the caller's action", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn pending_leave_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let all = fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let pending = workflow::pending_approvals(&all, &auth.actor());
    Ok(HttpResponse::Ok().json(pending))
}

/// Fetch a single leave request
#[utoipa::path(
    get,
    path = "/api/leaverequests/{id}",
    params(("id" = u64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not visible to the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn get_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = fetch_by_id(pool.get_ref(), leave_id).await.map_err(|e| {
        error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // A request outside the caller's visibility reads as not-found, so the
    // endpoint does not leak which ids exist.
    match leave {
        Some(leave)
            if !workflow::visible_requests(std::slice::from_ref(&leave), &auth.actor())
                .is_empty() =>
        {
            Ok(HttpResponse::Ok().json(leave))
        }
        _ => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

/// Create a leave request for the logged-in employee
#[utoipa::path(
    post,
    path = "/api/leaverequests",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "id": 1
        })),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn create_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    // Inclusive day count; a one-day leave is start == end.
    let total_days = (payload.end_date - payload.start_date).num_days() as u32 + 1;

    // The first approval gate is the employee's manager. Managers without
    // one of their own route to themselves and cancel instead.
    let manager_id = sqlx::query_scalar::<_, Option<u64>>(
        "SELECT manager_id FROM employees WHERE id = ? AND is_active = TRUE",
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to resolve department manager");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let department_manager_id = match manager_id {
        Some(manager) => manager.unwrap_or(employee_id),
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "No active employee record for this account"
            })));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, department_manager_id, leave_type_id,
             start_date, end_date, total_days, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(department_manager_id)
    .bind(payload.leave_type_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(total_days)
    .bind(&payload.reason)
    .bind(LeaveStatus::Pending)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Leave request submitted",
        "id": result.last_insert_id()
    })))
}

/// Shared body of the approve/reject/cancel endpoints: load the request,
/// let the workflow decide, persist with an optimistic status guard.
async fn transition(
    auth: &AuthUser,
    pool: &MySqlPool,
    leave_id: u64,
    action: LeaveAction,
    comments: Option<&str>,
) -> actix_web::Result<HttpResponse> {
    let leave = fetch_by_id(pool, leave_id)
        .await
        .map_err(|e| {
            error!(error = %e, leave_id, "Failed to fetch leave request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .ok_or_else(|| actix_web::error::ErrorNotFound("Leave request not found"))?;

    let updated = match workflow::apply(&leave, &auth.actor(), action, comments) {
        Ok(updated) => updated,
        Err(TransitionError::UnauthorizedTransition) => {
            return Ok(HttpResponse::Forbidden().json(serde_json::json!({
                "message": "You may not perform this action on this request"
            })));
        }
        Err(e @ (TransitionError::AlreadyTerminal | TransitionError::InvalidTransition)) => {
            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    // Guard on the status the decision was made against; if the row moved
    // on since the fetch, zero rows match and the caller gets a conflict.
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, comments = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(updated.status)
    .bind(&updated.comments)
    .bind(leave_id)
    .bind(leave.status)
    .execute(pool)
    .await
    .map_err(|e| {
        error!(error = %e, leave_id, "Failed to persist leave transition");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": "Leave request was already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(updated))
}

/// Approve a leave request at the caller's gate
#[utoipa::path(
    put,
    path = "/api/leaverequests/{id}/approve",
    params(("id" = u64, Path, description = "Leave request id")),
    request_body = TransitionReq,
    responses(
        (status = 200, description = "Request approved", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the required approver"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Request already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn approve_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<TransitionReq>,
) -> actix_web::Result<impl Responder> {
    transition(
        &auth,
        pool.get_ref(),
        path.into_inner(),
        LeaveAction::Approve,
        payload.comments.as_deref(),
    )
    .await
}

/// Reject a leave request at the caller's gate
#[utoipa::path(
    put,
    path = "/api/leaverequests/{id}/reject",
    params(("id" = u64, Path, description = "Leave request id")),
    request_body = TransitionReq,
    responses(
        (status = 200, description = "Request rejected", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the required approver"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Request already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn reject_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<TransitionReq>,
) -> actix_web::Result<impl Responder> {
    transition(
        &auth,
        pool.get_ref(),
        path.into_inner(),
        LeaveAction::Reject,
        payload.comments.as_deref(),
    )
    .await
}

/// Cancel the caller's own leave request
#[utoipa::path(
    put,
    path = "/api/leaverequests/{id}/cancel",
    params(("id" = u64, Path, description = "Leave request id")),
    request_body = TransitionReq,
    responses(
        (status = 200, description = "Request cancelled", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own this request"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Request already finalized")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn cancel_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<TransitionReq>,
) -> actix_web::Result<impl Responder> {
    transition(
        &auth,
        pool.get_ref(),
        path.into_inner(),
        LeaveAction::Cancel,
        payload.comments.as_deref(),
    )
    .await
}

/// Delete a leave request
#[utoipa::path(
    delete,
    path = "/api/leaverequests/{id}",
    params(("id" = u64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveRequest"
)]
pub async fn delete_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();
    let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
        .bind(leave_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, leave_id, "Failed to delete leave request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Leave request deleted"})))
}
