use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Yearly leave allowance for one employee and leave type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 7,
        "leave_type_id": 2,
        "leave_type_name": "Annual Leave",
        "year": 2026,
        "total_days": 20,
        "used_days": 5,
        "remaining_days": 15
    })
)]
pub struct LeaveBalance {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type_id: u64,
    /// Filled from leave_types on read; not a column of leave_balances.
    pub leave_type_name: String,
    pub year: u32,
    pub total_days: u32,
    pub used_days: u32,
    /// Derived, not stored.
    #[sqlx(default)]
    pub remaining_days: u32,
}

/// Days still available. Overspent balances clamp to zero rather than
/// wrapping.
pub fn remaining_days(total_days: u32, used_days: u32) -> u32 {
    total_days.saturating_sub(used_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn remaining_is_total_minus_used() {
        assert_eq!(remaining_days(20, 5), 15);
        assert_eq!(remaining_days(20, 0), 20);
    }

    #[test]
    fn overspent_balance_clamps_to_zero() {
        assert_eq!(remaining_days(10, 14), 0);
    }
}
