//! Staff directory and the permission checks that gate which forms a user may open.

use once_cell::sync::Lazy;

use crate::record::ContractLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    /// 學發部
    Academic,
    /// 圖服部
    LibraryServices,
}

impl Department {
    pub fn label(self) -> &'static str {
        match self {
            Department::Academic => "學發部",
            Department::LibraryServices => "圖服部",
        }
    }

    pub fn line(self) -> ContractLine {
        match self {
            Department::Academic => ContractLine::Academic,
            Department::LibraryServices => ContractLine::LibraryServices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions {
    pub admin_only: bool,
    pub create_maintain: bool,
    pub search_export: bool,
    pub maintain_params: Option<Department>,
    pub landing_page: Department,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: &'static str,
    pub name: &'static str,
    pub employee_id: &'static str,
    pub email: &'static str,
    pub department: Department,
    pub permissions: Permissions,
}

static USERS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        User {
            id: "user-1",
            name: "王大明 (Admin)",
            employee_id: "12345",
            email: "admin@example.com",
            department: Department::Academic,
            permissions: Permissions {
                admin_only: true,
                create_maintain: true,
                search_export: true,
                maintain_params: Some(Department::Academic),
                landing_page: Department::Academic,
            },
        },
        User {
            id: "user-2",
            name: "陳小華",
            employee_id: "23456",
            email: "library@example.com",
            department: Department::LibraryServices,
            permissions: Permissions {
                admin_only: false,
                create_maintain: true,
                search_export: true,
                maintain_params: Some(Department::LibraryServices),
                landing_page: Department::LibraryServices,
            },
        },
        User {
            id: "user-3",
            name: "林怡君",
            employee_id: "34567",
            email: "viewer@example.com",
            department: Department::Academic,
            permissions: Permissions {
                admin_only: false,
                create_maintain: false,
                search_export: true,
                maintain_params: None,
                landing_page: Department::Academic,
            },
        },
    ]
});

pub fn users() -> &'static [User] {
    &USERS
}

/// Looks a user up by employee id.
pub fn authenticate(employee_id: &str) -> Option<&'static User> {
    let employee_id = employee_id.trim();
    USERS.iter().find(|user| user.employee_id == employee_id)
}

/// Contract lines whose forms `user` may open. Administrators reach every line;
/// other editors reach the line of their landing department.
pub fn reachable_lines(user: &User) -> Vec<ContractLine> {
    if !user.permissions.create_maintain {
        return Vec::new();
    }
    if user.permissions.admin_only {
        return ContractLine::ALL.to_vec();
    }
    vec![user.permissions.landing_page.line()]
}

pub fn can_open(user: &User, line: ContractLine) -> bool {
    reachable_lines(user).contains(&line)
}
