use serde::{Deserialize, Serialize};

/// Which login surface a client is on. Selects both the auth endpoint and
/// where a successful login lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMode {
    User,
    Admin,
}

impl LoginMode {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Campuses the backend accepts on a submission.
pub const CAMPUSES: &[&str] = &[
    "Early Childhood",
    "Primary",
    "Elementary",
    "Intermediate",
    "Middle",
    "High",
    "Central Office",
    "Transportation",
    "Maintenance",
];

pub fn is_known_campus(campus: &str) -> bool {
    CAMPUSES.contains(&campus)
}
