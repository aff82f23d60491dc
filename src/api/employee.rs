use crate::auth::auth::AuthUser;
use crate::model::employee::Employee;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP001")]
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "ayse.yilmaz@company.com", format = "email", value_type = String)]
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: u64,
    pub manager_id: Option<u64>,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub department_id: Option<u64>,
    pub manager_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct EmployeeQuery {
    /// Restrict to one department
    pub department_id: Option<u64>,
}

fn internal(e: sqlx::Error, what: &str) -> actix_web::Error {
    error!(error = %e, "{}", what);
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

const COLUMNS: &str = "id, employee_number, first_name, last_name, email, phone_number, \
                       department_id, manager_id, hire_date, is_active";

/// List employees, optionally by department
#[utoipa::path(
    get,
    path = "/api/employees",
    params(("department_id", Query, description = "Filter by department")),
    responses((status = 200, description = "Employees", body = [Employee])),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let employees = match query.department_id {
        Some(department_id) => {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {} FROM employees WHERE department_id = ? ORDER BY last_name, first_name",
                COLUMNS
            ))
            .bind(department_id)
            .fetch_all(pool.get_ref())
            .await
        }
        None => {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {} FROM employees ORDER BY last_name, first_name",
                COLUMNS
            ))
            .fetch_all(pool.get_ref())
            .await
        }
    }
    .map_err(|e| internal(e, "Failed to list employees"))?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Fetch an employee
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee", body = Employee),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {} FROM employees WHERE id = ?",
        COLUMNS
    ))
    .bind(path.into_inner())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to fetch employee"))?;

    match employee {
        Some(e) => Ok(HttpResponse::Ok().json(e)),
        None => Ok(HttpResponse::NotFound().json(json!({"message": "Employee not found"}))),
    }
}

/// List the employees reporting to a manager
#[utoipa::path(
    get,
    path = "/api/employees/subordinates/{manager_id}",
    params(("manager_id" = u64, Path, description = "Manager's employee id")),
    responses((status = 200, description = "Subordinates", body = [Employee])),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_subordinates(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {} FROM employees WHERE manager_id = ? ORDER BY last_name, first_name",
        COLUMNS
    ))
    .bind(path.into_inner())
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to list subordinates"))?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees
            (employee_number, first_name, last_name, email, phone_number,
             department_id, manager_id, hire_date, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, TRUE)
        "#,
    )
    .bind(&payload.employee_number)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone_number)
    .bind(payload.department_id)
    .bind(payload.manager_id)
    .bind(payload.hire_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to create employee"))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Employee created",
        "id": result.last_insert_id()
    })))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        UPDATE employees
        SET first_name = COALESCE(?, first_name),
            last_name = COALESCE(?, last_name),
            email = COALESCE(?, email),
            phone_number = COALESCE(?, phone_number),
            department_id = COALESCE(?, department_id),
            manager_id = COALESCE(?, manager_id)
        WHERE id = ?
        "#,
    )
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone_number)
    .bind(payload.department_id)
    .bind(payload.manager_id)
    .bind(path.into_inner())
    .execute(pool.get_ref())
    .await
    .map_err(|e| internal(e, "Failed to update employee"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Employee not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({"message": "Employee updated"})))
}

async fn set_active(
    auth: &AuthUser,
    pool: &MySqlPool,
    id: u64,
    active: bool,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("UPDATE employees SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| internal(e, "Failed to change employee state"))?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"message": "Employee not found"})));
    }
    Ok(HttpResponse::Ok().json(json!({
        "message": if active { "Employee activated" } else { "Employee deactivated" }
    })))
}

/// Activate an employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}/activate",
    params(("id" = u64, Path, description = "Employee id")),
    responses((status = 200, description = "Activated"), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn activate_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), true).await
}

/// Deactivate an employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}/deactivate",
    params(("id" = u64, Path, description = "Employee id")),
    responses((status = 200, description = "Deactivated"), (status = 404, description = "Not found")),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn deactivate_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), false).await
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Employee is referenced by other records")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => {
            Ok(HttpResponse::NotFound().json(json!({"message": "Employee not found"})))
        }
        Ok(_) => Ok(HttpResponse::Ok().json(json!({"message": "Employee deleted"}))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::Conflict().json(
                        json!({"message": "Employee is referenced by other records"}),
                    ));
                }
            }
            Err(internal(e, "Failed to delete employee"))
        }
    }
}
