use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Integer-coded leave request status. The codes are part of the wire and
/// database contract, so they must not be reordered.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, sqlx::Type, ToSchema,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum LeaveStatus {
    Pending = 0,
    ApprovedByDepartmentManager = 1,
    ApprovedByHrManager = 2,
    RejectedByDepartmentManager = 3,
    RejectedByHrManager = 4,
    Cancelled = 5,
}

impl LeaveStatus {
    /// Terminal statuses accept no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LeaveStatus::ApprovedByHrManager
                | LeaveStatus::RejectedByDepartmentManager
                | LeaveStatus::RejectedByHrManager
                | LeaveStatus::Cancelled
        )
    }
}

impl From<LeaveStatus> for u8 {
    fn from(status: LeaveStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for LeaveStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(LeaveStatus::Pending),
            1 => Ok(LeaveStatus::ApprovedByDepartmentManager),
            2 => Ok(LeaveStatus::ApprovedByHrManager),
            3 => Ok(LeaveStatus::RejectedByDepartmentManager),
            4 => Ok(LeaveStatus::RejectedByHrManager),
            5 => Ok(LeaveStatus::Cancelled),
            other => Err(format!("unknown leave status code: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    /// Employee the leave is for; immutable after creation.
    pub employee_id: u64,
    /// Manager whose approval the first gate requires; resolved from the
    /// employee record at creation time and immutable afterwards.
    pub department_manager_id: u64,
    pub leave_type_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Inclusive day count between start and end date.
    pub total_days: u32,
    pub reason: Option<String>,
    #[schema(example = 0, value_type = u8)]
    pub status: LeaveStatus,
    /// Single-slot approver comment, overwritten at each transition.
    pub comments: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
