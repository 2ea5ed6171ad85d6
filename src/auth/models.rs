//! Authentication and authorization models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Portal roles, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access, including account management
    SuperAdmin,
    /// Document administration and classification
    Admin,
    /// Council member - drafts and tracks own measures
    Councilor,
}

impl Role {
    /// Parse the canonical wire string. Anything else is treated as
    /// unauthenticated downstream, never as a fourth role.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "super_admin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "councilor" => Some(Role::Councilor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Councilor => "councilor",
        }
    }

    /// The landing page this role is sent to after login
    pub fn destination(self) -> Destination {
        match self {
            Role::SuperAdmin => Destination::SuperAdminDashboard,
            Role::Admin => Destination::AdminDashboard,
            Role::Councilor => Destination::CouncilorDashboard,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical landing page identifiers. Handlers pass these explicitly to the
/// guard; page identity is never derived from the request path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    SuperAdminDashboard,
    AdminDashboard,
    CouncilorDashboard,
    Login,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::SuperAdminDashboard => "/dashboard/super-admin",
            Destination::AdminDashboard => "/dashboard/admin",
            Destination::CouncilorDashboard => "/dashboard/councilor",
            Destination::Login => "/login",
        }
    }
}

/// The one role-to-destination table, shared by the authenticator and the
/// guard. An absent or unrecognized role lands on the login page (fail
/// closed).
pub fn destination_for(role: Option<Role>) -> Destination {
    match role {
        Some(role) => role.destination(),
        None => Destination::Login,
    }
}

/// Portal user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database identifier
    pub id: i64,
    /// Login email, unique, under the organizational domain
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: String,
    /// Whether the account may log in
    pub active: bool,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Stamped on each successful login
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Sidebar modules with their static role allow-lists. Visibility only
/// controls link rendering - the pages behind the links still run the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavModule {
    Dashboard,
    Creation,
    Classification,
    Reports,
    Accounts,
}

impl NavModule {
    pub const ALL: [NavModule; 5] = [
        NavModule::Dashboard,
        NavModule::Creation,
        NavModule::Classification,
        NavModule::Reports,
        NavModule::Accounts,
    ];

    /// Roles allowed to see this module's link
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            NavModule::Dashboard => &[Role::SuperAdmin, Role::Admin, Role::Councilor],
            NavModule::Creation => &[Role::SuperAdmin, Role::Admin, Role::Councilor],
            NavModule::Classification => &[Role::SuperAdmin, Role::Admin],
            NavModule::Reports => &[Role::SuperAdmin, Role::Admin],
            NavModule::Accounts => &[Role::SuperAdmin],
        }
    }

    pub fn visible_to(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavModule::Dashboard => "Dashboard",
            NavModule::Creation => "Document Creation",
            NavModule::Classification => "Classification",
            NavModule::Reports => "Reports",
            NavModule::Accounts => "Accounts",
        }
    }

    /// Section id of the matching dashboard section
    pub fn anchor(&self) -> &'static str {
        match self {
            NavModule::Dashboard => "overview",
            NavModule::Creation => "creation",
            NavModule::Classification => "classification",
            NavModule::Reports => "reports",
            NavModule::Accounts => "accounts",
        }
    }
}

/// Sidebar modules visible to a role, in display order
pub fn visible_modules(role: Role) -> Vec<NavModule> {
    NavModule::ALL
        .into_iter()
        .filter(|module| module.visible_to(role))
        .collect()
}

/// Login form submission
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}
