//! Approval workflow core: the status state machine and the role-scoped
//! visibility rules for leave requests. Everything here is pure; callers
//! fetch and persist, this module only decides.

pub mod state_machine;
pub mod visibility;

pub use state_machine::{LeaveAction, TransitionError, apply};
pub use visibility::{pending_approvals, visible_requests};

use crate::model::role::Role;

/// Identity a workflow decision is requested on behalf of. Derived per
/// request from the authenticated session, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub role: Role,
    /// Employee record linked to the session; 0 when the account has no
    /// employee profile (service accounts, some admins).
    pub employee_id: u64,
    pub department_id: u64,
}
