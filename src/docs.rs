use crate::api::department::{CreateDepartment, UpdateDepartment};
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::leave_balance::{CreateLeaveBalance, UpdateLeaveBalance};
use crate::api::leave_request::{CreateLeaveRequest, TransitionReq};
use crate::api::leave_type::{CreateLeaveType, UpdateLeaveType};
use crate::api::user::{CreateUser, UserResponse};
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::leave_type::LeaveType;
use crate::workflow::LeaveAction;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave Management System

REST backend for an HR leave-management system.

### Key Features
- **Leave Requests**
  - Submit, list, and cancel leave requests
  - Two-gate approval: department manager first, then HR manager
  - Role-filtered views and per-gate pending queues
- **Leave Balances**
  - Yearly allowances per employee and leave type
- **Departments, Employees, Leave Types**
  - CRUD with soft activate/deactivate
- **User Accounts**
  - Admin-managed accounts linked to employee records

### Security
All endpoints outside `/auth` require **JWT Bearer authentication**.
Roles: SystemAdmin, HrManager, DepartmentManager, Employee.
"#,
    ),
    paths(
        crate::api::leave_request::list_leave_requests,
        crate::api::leave_request::pending_leave_requests,
        crate::api::leave_request::get_leave_request,
        crate::api::leave_request::create_leave_request,
        crate::api::leave_request::approve_leave_request,
        crate::api::leave_request::reject_leave_request,
        crate::api::leave_request::cancel_leave_request,
        crate::api::leave_request::delete_leave_request,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::list_subordinates,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::activate_employee,
        crate::api::employee::deactivate_employee,
        crate::api::employee::delete_employee,

        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::activate_department,
        crate::api::department::deactivate_department,
        crate::api::department::delete_department,

        crate::api::leave_type::list_leave_types,
        crate::api::leave_type::get_leave_type,
        crate::api::leave_type::create_leave_type,
        crate::api::leave_type::update_leave_type,
        crate::api::leave_type::activate_leave_type,
        crate::api::leave_type::deactivate_leave_type,
        crate::api::leave_type::delete_leave_type,

        crate::api::leave_balance::list_employee_balances,
        crate::api::leave_balance::list_employee_balances_by_year,
        crate::api::leave_balance::create_leave_balance,
        crate::api::leave_balance::update_leave_balance,
        crate::api::leave_balance::delete_leave_balance,

        crate::api::user::list_users,
        crate::api::user::create_user,
        crate::api::user::activate_user,
        crate::api::user::deactivate_user
    ),
    components(
        schemas(
            LeaveRequest,
            LeaveStatus,
            LeaveAction,
            CreateLeaveRequest,
            TransitionReq,
            Employee,
            CreateEmployee,
            UpdateEmployee,
            Department,
            CreateDepartment,
            UpdateDepartment,
            LeaveType,
            CreateLeaveType,
            UpdateLeaveType,
            LeaveBalance,
            CreateLeaveBalance,
            UpdateLeaveBalance,
            CreateUser,
            UserResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "LeaveRequest", description = "Leave request and approval workflow APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "LeaveType", description = "Leave type management APIs"),
        (name = "LeaveBalance", description = "Yearly leave allowance APIs"),
        (name = "User", description = "User account APIs"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
