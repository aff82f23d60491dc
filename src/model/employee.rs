use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_number": "EMP001",
        "first_name": "Ayse",
        "last_name": "Yilmaz",
        "email": "ayse.yilmaz@company.com",
        "phone_number": "+905551234567",
        "department_id": 10,
        "manager_id": 3,
        "hire_date": "2024-01-01",
        "is_active": true
    })
)]
pub struct Employee {
    pub id: u64,
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub department_id: u64,
    /// Department manager this employee reports to; None for top-level
    /// managers.
    pub manager_id: Option<u64>,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    pub is_active: bool,
}
