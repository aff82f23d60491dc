use crate::auth::auth::AuthUser;
use crate::model::leave_balance::{LeaveBalance, remaining_days};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveBalance {
    pub employee_id: u64,
    pub leave_type_id: u64,
    #[schema(example = 2026)]
    pub year: u32,
    #[schema(example = 20)]
    pub total_days: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeaveBalance {
    pub total_days: Option<u32>,
    pub used_days: Option<u32>,
}

fn internal(e: sqlx::Error, what: &str) -> actix_web::Error {
    error!(error = %e, "{}", what);
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

const SELECT: &str = r#"
    SELECT lb.id, lb.employee_id, lb.leave_type_id, lt.name AS leave_type_name,
           lb.year, lb.total_days, lb.used_days
    FROM leave_balances lb
    JOIN leave_types lt ON lt.id = lb.leave_type_id
"#;

fn with_remaining(rows: Vec<LeaveBalance>) -> Vec<LeaveBalance> {
    rows.into_iter()
        .map(|mut b| {
            b.remaining_days = remaining_days(b.total_days, b.used_days);
            b
        })
        .collect()
}

/// Account owners may read their own balances; HR and admins may read
/// anyone's.
fn require_self_or_hr(auth: &AuthUser, employee_id: u64) -> actix_web::Result<()> {
    if auth.employee_id == Some(employee_id) {
        return Ok(());
    }
    auth.require_hr_or_admin()
}

/// List an employee's leave balances
#[utoipa::path(
    get,
    path = "/api/leave-balances/employee/{employee_id}",
    params(("employee_id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Balances for the employee", body = [LeaveBalance]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveBalance"
)]
pub async fn list_employee_balances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    require_self_or_hr(&auth, employee_id)?;

    let rows = sqlx::query_as::<_, LeaveBalance>(&format!(
        "{} WHERE lb.employee_id = ? ORDER BY lb.year DESC, lt.name",
        SELECT
    ))
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to list leave balances"))?;

    Ok(HttpResponse::Ok().json(with_remaining(rows)))
}

/// List an employee's leave balances for one year
#[utoipa::path(
    get,
    path = "/api/leave-balances/employee/{employee_id}/year/{year}",
    params(
        ("employee_id" = u64, Path, description = "Employee id"),
        ("year" = u32, Path, description = "Calendar year")
    ),
    responses(
        (status = 200, description = "Balances for the year", body = [LeaveBalance]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveBalance"
)]
pub async fn list_employee_balances_by_year(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, u32)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, year) = path.into_inner();
    require_self_or_hr(&auth, employee_id)?;

    let rows = sqlx::query_as::<_, LeaveBalance>(&format!(
        "{} WHERE lb.employee_id = ? AND lb.year = ? ORDER BY lt.name",
        SELECT
    ))
    .bind(employee_id)
    .bind(year)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to list leave balances"))?;

    Ok(HttpResponse::Ok().json(with_remaining(rows)))
}

/// Create a leave balance
#[utoipa::path(
    post,
    path = "/api/leave-balances",
    request_body = CreateLeaveBalance,
    responses(
        (status = 201, description = "Leave balance created"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Balance already exists for this employee, type and year")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveBalance"
)]
pub async fn create_leave_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveBalance>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_balances (employee_id, leave_type_id, year, total_days, used_days)
        VALUES (?, ?, ?, ?, 0)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.leave_type_id)
    .bind(payload.year)
    .bind(payload.total_days)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(r) => Ok(HttpResponse::Created().json(json!({
            "message": "Leave balance created",
            "id": r.last_insert_id()
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::Conflict().json(
                        json!({"message": "Balance already exists for this employee, type and year"}),
                    ));
                }
            }
            Err(internal(e, "Failed to create leave balance"))
        }
    }
}

/// Update a leave balance
#[utoipa::path(
    put,
    path = "/api/leave-balances/{id}",
    params(("id" = u64, Path, description = "Leave balance id")),
    request_body = UpdateLeaveBalance,
    responses(
        (status = 200, description = "Leave balance updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveBalance"
)]
pub async fn update_leave_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeaveBalance>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        UPDATE leave_balances
        SET total_days = COALESCE(?, total_days),
            used_days = COALESCE(?, used_days)
        WHERE id = ?
        "#,
    )
    .bind(payload.total_days)
    .bind(payload.used_days)
    .bind(path.into_inner())
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to update leave balance"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Leave balance not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Leave balance updated"})))
}

/// Delete a leave balance
#[utoipa::path(
    delete,
    path = "/api/leave-balances/{id}",
    params(("id" = u64, Path, description = "Leave balance id")),
    responses(
        (status = 200, description = "Leave balance deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveBalance"
)]
pub async fn delete_leave_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("DELETE FROM leave_balances WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(|e| internal(e, "Failed to delete leave balance"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Leave balance not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Leave balance deleted"})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn auth(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "someone".into(),
            role,
            employee_id,
            department_id: Some(10),
        }
    }

    #[test]
    fn employees_read_only_their_own_balances() {
        let me = auth(Role::Employee, Some(7));
        assert!(require_self_or_hr(&me, 7).is_ok());
        assert!(require_self_or_hr(&me, 8).is_err());
    }

    #[test]
    fn hr_and_admin_read_any_balance() {
        assert!(require_self_or_hr(&auth(Role::HrManager, None), 7).is_ok());
        assert!(require_self_or_hr(&auth(Role::Admin, None), 7).is_ok());
    }

    #[test]
    fn managers_are_not_exempt_from_the_ownership_check() {
        let manager = auth(Role::DepartmentManager, Some(3));
        assert!(require_self_or_hr(&manager, 4).is_err());
    }

    #[test]
    fn accounts_without_a_profile_own_nothing() {
        let orphan = auth(Role::Employee, None);
        assert!(require_self_or_hr(&orphan, 0).is_err());
    }
}
