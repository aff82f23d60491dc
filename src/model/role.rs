use strum_macros::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum Role {
    Admin = 1,
    HrManager = 2,
    DepartmentManager = 3,
    Employee = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::HrManager),
            3 => Some(Role::DepartmentManager),
            4 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Canonical mapping from external role labels. Upstream systems are
    /// inconsistent about what they call the admin role, so every spelling
    /// funnels through here once, at the boundary.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "SystemAdmin" | "Admin" => Some(Role::Admin),
            "HrManager" => Some(Role::HrManager),
            "DepartmentManager" => Some(Role::DepartmentManager),
            "Employee" => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}
