use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::UserId;

/// Role of the authenticated account. Teachers and admins see the admin
/// panel link; the server remains the authority on what they may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
            UserRole::Admin => "admin",
        };
        write!(f, "{label}")
    }
}

/// CEFR-style proficiency level carried into assistant requests as
/// `user_level`. The service defines the set of valid codes; we keep the
/// raw code and only default it when the profile has none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProficiencyLevel(String);

impl ProficiencyLevel {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProficiencyLevel {
    fn default() -> Self {
        Self("A1".to_string())
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The authenticated profile, loaded once per shell mount and shared
/// read-only with every view. Nothing below the shell mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub id: UserId,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub proficiency_level: ProficiencyLevel,
}

impl SessionContext {
    /// Label shown in the navigation header, e.g. `Айгүл (student)`.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.full_name, self.role)
    }
}
