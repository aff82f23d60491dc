use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Actor;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveAction {
    Approve,
    Reject,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TransitionError {
    /// The action is not legal from the request's current status.
    #[display(fmt = "action is not legal from the current status")]
    InvalidTransition,
    /// The (status, action) pair is legal, but the actor is not the
    /// approver or owner that step requires.
    #[display(fmt = "actor may not perform this transition")]
    UnauthorizedTransition,
    /// The request already reached a terminal status.
    #[display(fmt = "request is already finalized")]
    AlreadyTerminal,
}

impl std::error::Error for TransitionError {}

/// Decides a single approval-workflow transition.
///
/// Two sequential gates: a pending request is approved or rejected by a
/// department manager, and a department-approved request is approved or
/// rejected by an HR manager. The owning employee may cancel at either
/// gate. Admin observes but never acts.
///
/// Pure: on success a new request value is returned with `status` advanced
/// and `comments` replaced by `comment`; the input is never mutated.
/// Persisting the result (and detecting that the backing row moved on in
/// the meantime) is the caller's concern.
pub fn apply(
    request: &LeaveRequest,
    actor: &Actor,
    action: LeaveAction,
    comment: Option<&str>,
) -> Result<LeaveRequest, TransitionError> {
    if request.status.is_terminal() {
        return Err(TransitionError::AlreadyTerminal);
    }

    let next = match (request.status, action) {
        (LeaveStatus::Pending, LeaveAction::Approve) => {
            require_role(actor, Role::DepartmentManager)?;
            LeaveStatus::ApprovedByDepartmentManager
        }
        (LeaveStatus::Pending, LeaveAction::Reject) => {
            require_role(actor, Role::DepartmentManager)?;
            LeaveStatus::RejectedByDepartmentManager
        }
        (LeaveStatus::ApprovedByDepartmentManager, LeaveAction::Approve) => {
            require_role(actor, Role::HrManager)?;
            LeaveStatus::ApprovedByHrManager
        }
        (LeaveStatus::ApprovedByDepartmentManager, LeaveAction::Reject) => {
            require_role(actor, Role::HrManager)?;
            LeaveStatus::RejectedByHrManager
        }
        (
            LeaveStatus::Pending | LeaveStatus::ApprovedByDepartmentManager,
            LeaveAction::Cancel,
        ) => {
            require_owner(actor, request)?;
            LeaveStatus::Cancelled
        }
        _ => return Err(TransitionError::InvalidTransition),
    };

    let mut updated = request.clone();
    updated.status = next;
    updated.comments = comment.map(str::to_owned);
    Ok(updated)
}

fn require_role(actor: &Actor, required: Role) -> Result<(), TransitionError> {
    if actor.role == required {
        Ok(())
    } else {
        Err(TransitionError::UnauthorizedTransition)
    }
}

/// Cancellation belongs to the owning employee alone. Managers own their
/// personal requests too, so ownership is checked by employee id rather
/// than role; Admin holds no transition rights at all.
fn require_owner(actor: &Actor, request: &LeaveRequest) -> Result<(), TransitionError> {
    if actor.role != Role::Admin && actor.employee_id == request.employee_id {
        Ok(())
    } else {
        Err(TransitionError::UnauthorizedTransition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn request(id: u64, employee_id: u64, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id,
            department_manager_id: 3,
            leave_type_id: 1,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            total_days: 5,
            reason: Some("family visit".into()),
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

    #[test]
    fn two_gate_happy_path() {
        let req = request(1, 7, LeaveStatus::Pending);

        let after_dept = apply(
            &req,
            &actor(Role::DepartmentManager, 3),
            LeaveAction::Approve,
            Some("ok for the team"),
        )
        .unwrap();
        assert_eq!(after_dept.status, LeaveStatus::ApprovedByDepartmentManager);
        assert_eq!(after_dept.comments.as_deref(), Some("ok for the team"));

        let after_hr = apply(
            &after_dept,
            &actor(Role::HrManager, 2),
            LeaveAction::Approve,
            Some("granted"),
        )
        .unwrap();
        assert_eq!(after_hr.status, LeaveStatus::ApprovedByHrManager);
        // Single comment slot: the HR comment replaces the department one.
        assert_eq!(after_hr.comments.as_deref(), Some("granted"));
    }

    #[test]
    fn rejection_at_either_gate() {
        let req = request(1, 7, LeaveStatus::Pending);
        let rejected = apply(
            &req,
            &actor(Role::DepartmentManager, 3),
            LeaveAction::Reject,
            None,
        )
        .unwrap();
        assert_eq!(rejected.status, LeaveStatus::RejectedByDepartmentManager);

        let req = request(2, 7, LeaveStatus::ApprovedByDepartmentManager);
        let rejected = apply(&req, &actor(Role::HrManager, 2), LeaveAction::Reject, None).unwrap();
        assert_eq!(rejected.status, LeaveStatus::RejectedByHrManager);
    }

    #[test]
    fn hr_manager_cannot_jump_the_first_gate() {
        let req = request(1, 7, LeaveStatus::Pending);
        let err = apply(&req, &actor(Role::HrManager, 2), LeaveAction::Approve, None).unwrap_err();
        assert_eq!(err, TransitionError::UnauthorizedTransition);
    }

    #[test]
    fn department_manager_cannot_act_on_the_second_gate() {
        let req = request(1, 7, LeaveStatus::ApprovedByDepartmentManager);
        let err = apply(
            &req,
            &actor(Role::DepartmentManager, 3),
            LeaveAction::Approve,
            None,
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::UnauthorizedTransition);
    }

    #[test]
    fn admin_observes_but_never_acts() {
        for status in [LeaveStatus::Pending, LeaveStatus::ApprovedByDepartmentManager] {
            let req = request(1, 7, status);
            for action in [LeaveAction::Approve, LeaveAction::Reject, LeaveAction::Cancel] {
                let err = apply(&req, &actor(Role::Admin, 7), action, None).unwrap_err();
                assert_eq!(err, TransitionError::UnauthorizedTransition);
            }
        }
    }

    #[test]
    fn owner_cancels_from_both_cancellable_statuses() {
        for status in [LeaveStatus::Pending, LeaveStatus::ApprovedByDepartmentManager] {
            let req = request(1, 7, status);
            let cancelled =
                apply(&req, &actor(Role::Employee, 7), LeaveAction::Cancel, None).unwrap();
            assert_eq!(cancelled.status, LeaveStatus::Cancelled);
        }
    }

    #[test]
    fn manager_cancels_their_own_request() {
        let req = request(1, 3, LeaveStatus::Pending);
        let cancelled = apply(
            &req,
            &actor(Role::DepartmentManager, 3),
            LeaveAction::Cancel,
            None,
        )
        .unwrap();
        assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    }

    #[test]
    fn non_owner_cannot_cancel() {
        let req = request(1, 7, LeaveStatus::Pending);
        let err = apply(&req, &actor(Role::Employee, 8), LeaveAction::Cancel, None).unwrap_err();
        assert_eq!(err, TransitionError::UnauthorizedTransition);
    }

    #[test]
    fn employee_cannot_approve_own_request() {
        let req = request(1, 7, LeaveStatus::Pending);
        let err = apply(&req, &actor(Role::Employee, 7), LeaveAction::Approve, None).unwrap_err();
        assert_eq!(err, TransitionError::UnauthorizedTransition);
    }

    #[test]
    fn terminal_statuses_reject_every_action() {
        let terminal = [
            LeaveStatus::ApprovedByHrManager,
            LeaveStatus::RejectedByDepartmentManager,
            LeaveStatus::RejectedByHrManager,
            LeaveStatus::Cancelled,
        ];
        let actors = [
            actor(Role::Admin, 7),
            actor(Role::HrManager, 2),
            actor(Role::DepartmentManager, 3),
            actor(Role::Employee, 7),
        ];
        for status in terminal {
            for who in &actors {
                for action in [LeaveAction::Approve, LeaveAction::Reject, LeaveAction::Cancel] {
                    let req = request(1, 7, status);
                    let err = apply(&req, who, action, None).unwrap_err();
                    assert_eq!(err, TransitionError::AlreadyTerminal);
                }
            }
        }
    }

    #[test]
    fn owner_cannot_cancel_after_final_approval() {
        let req = request(1, 7, LeaveStatus::ApprovedByHrManager);
        let err = apply(&req, &actor(Role::Employee, 7), LeaveAction::Cancel, None).unwrap_err();
        assert_eq!(err, TransitionError::AlreadyTerminal);
    }

    #[test]
    fn apply_leaves_the_input_untouched() {
        let req = request(1, 7, LeaveStatus::Pending);
        let _ = apply(
            &req,
            &actor(Role::DepartmentManager, 3),
            LeaveAction::Approve,
            Some("ok"),
        )
        .unwrap();
        assert_eq!(req.status, LeaveStatus::Pending);
        assert_eq!(req.comments, None);
    }

    #[test]
    fn same_inputs_same_decision() {
        let req = request(1, 7, LeaveStatus::Pending);
        let who = actor(Role::DepartmentManager, 3);
        let first = apply(&req, &who, LeaveAction::Approve, Some("ok")).unwrap();
        let second = apply(&req, &who, LeaveAction::Approve, Some("ok")).unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.comments, second.comments);
    }
}
