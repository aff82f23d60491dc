use std::collections::HashSet;

use super::Actor;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::role::Role;

/// Subset of `all` the actor may view.
///
/// Admin and HR managers see everything. A department manager sees the
/// requests routed to them for approval plus their own. An employee sees
/// only their own.
pub fn visible_requests(all: &[LeaveRequest], actor: &Actor) -> Vec<LeaveRequest> {
    let mut seen = HashSet::new();
    all.iter()
        .filter(|req| match actor.role {
            Role::Admin | Role::HrManager => true,
            Role::DepartmentManager => {
                req.department_manager_id == actor.employee_id
                    || req.employee_id == actor.employee_id
            }
            Role::Employee => req.employee_id == actor.employee_id,
        })
        .filter(|req| seen.insert(req.id))
        .cloned()
        .collect()
}

/// Subset of `all` waiting on the actor's approval gate.
///
/// Department managers get the pending requests routed to them; HR managers
/// get every department-approved request (the HR gate is global, not
/// per-department). Admin gets a read-only view of both gates. Employees
/// hold no approval authority and always get an empty list.
///
/// Output order follows the input; a request appearing under overlapping
/// rules is returned once, at its first position.
pub fn pending_approvals(all: &[LeaveRequest], actor: &Actor) -> Vec<LeaveRequest> {
    let mut seen = HashSet::new();
    all.iter()
        .filter(|req| match actor.role {
            Role::Admin => matches!(
                req.status,
                LeaveStatus::Pending | LeaveStatus::ApprovedByDepartmentManager
            ),
            Role::DepartmentManager => {
                req.status == LeaveStatus::Pending
                    && req.department_manager_id == actor.employee_id
            }
            Role::HrManager => req.status == LeaveStatus::ApprovedByDepartmentManager,
            Role::Employee => false,
        })
        .filter(|req| seen.insert(req.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn request(
        id: u64,
        employee_id: u64,
        department_manager_id: u64,
        status: LeaveStatus,
    ) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id,
            department_manager_id,
            leave_type_id: 1,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
            total_days: 5,
            reason: None,
            status,
            comments: None,
            created_at: None,
        }
    }

    fn actor(role: Role, employee_id: u64) -> Actor {
        Actor {
            role,
            employee_id,
            department_id: 10,
        }
    }

    fn sample() -> Vec<LeaveRequest> {
        vec![
            // Manager 5's own request: matches both arms of the
            // department-manager rule.
            request(1, 5, 5, LeaveStatus::Pending),
            request(2, 7, 5, LeaveStatus::Pending),
            request(3, 8, 5, LeaveStatus::ApprovedByDepartmentManager),
            request(4, 9, 6, LeaveStatus::Pending),
            request(5, 9, 6, LeaveStatus::ApprovedByHrManager),
            request(6, 7, 5, LeaveStatus::Cancelled),
        ]
    }

    #[test]
    fn admin_and_hr_see_everything() {
        let all = sample();
        for role in [Role::Admin, Role::HrManager] {
            let visible = visible_requests(&all, &actor(role, 99));
            assert_eq!(visible.len(), all.len());
        }
    }

    #[test]
    fn department_manager_sees_team_and_own_without_duplicates() {
        let all = sample();
        let visible = visible_requests(&all, &actor(Role::DepartmentManager, 5));
        let ids: Vec<u64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 6]);
    }

    #[test]
    fn employee_sees_only_their_own() {
        let all = sample();
        let visible = visible_requests(&all, &actor(Role::Employee, 7));
        let ids: Vec<u64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 6]);
    }

    #[test]
    fn employee_with_no_requests_sees_nothing() {
        let all = sample();
        assert!(visible_requests(&all, &actor(Role::Employee, 42)).is_empty());
    }

    #[test]
    fn department_manager_pending_gate() {
        let all = sample();
        let pending = pending_approvals(&all, &actor(Role::DepartmentManager, 5));
        let ids: Vec<u64> = pending.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn hr_manager_pending_gate_is_global() {
        let all = sample();
        let pending = pending_approvals(&all, &actor(Role::HrManager, 2));
        let ids: Vec<u64> = pending.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3]);
        assert!(
            pending
                .iter()
                .all(|r| r.status == LeaveStatus::ApprovedByDepartmentManager)
        );
    }

    #[test]
    fn admin_pending_view_covers_both_gates() {
        let all = sample();
        let pending = pending_approvals(&all, &actor(Role::Admin, 99));
        let ids: Vec<u64> = pending.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn employee_pending_view_is_always_empty() {
        let all = sample();
        assert!(pending_approvals(&all, &actor(Role::Employee, 7)).is_empty());
        assert!(pending_approvals(&all, &actor(Role::Employee, 5)).is_empty());
    }

    #[test]
    fn duplicate_ids_in_input_collapse_to_first_occurrence() {
        let mut all = sample();
        all.push(request(2, 7, 5, LeaveStatus::Pending));
        let visible = visible_requests(&all, &actor(Role::DepartmentManager, 5));
        let ids: Vec<u64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 6]);
    }

    #[test]
    fn filters_are_idempotent() {
        let all = sample();
        let who = actor(Role::DepartmentManager, 5);

        let first: Vec<u64> = visible_requests(&all, &who).iter().map(|r| r.id).collect();
        let second: Vec<u64> = visible_requests(&all, &who).iter().map(|r| r.id).collect();
        assert_eq!(first, second);

        let first: Vec<u64> = pending_approvals(&all, &who).iter().map(|r| r.id).collect();
        let second: Vec<u64> = pending_approvals(&all, &who).iter().map(|r| r.id).collect();
        assert_eq!(first, second);
    }
}
