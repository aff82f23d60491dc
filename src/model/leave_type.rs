use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveType {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub max_days_per_year: u32,
    pub requires_approval: bool,
    pub is_paid: bool,
    pub is_active: bool,
}
