use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::LoginMode;

pub const USER_AUTH_ROUTE: &str = "api/1.0/auth";
pub const ADMIN_AUTH_ROUTE: &str = "api/1.0/admin/auth";
pub const SUBMIT_ROUTE: &str = "api/1.0/submit";
pub const ADMIN_LIST_ROUTE: &str = "api/1.0/admin/list";

pub const SESSION_HEADER: &str = "X-Session-Key";

pub fn auth_route(mode: LoginMode) -> &'static str {
    match mode {
        LoginMode::User => USER_AUTH_ROUTE,
        LoginMode::Admin => ADMIN_AUTH_ROUTE,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(rename = "User")]
    pub username: String,
    #[serde(rename = "Passwd")]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "SessionID", default)]
    pub session_id: Option<String>,
    /// Set when the user already has a submission on file.
    #[serde(rename = "Completed", default)]
    pub completed: bool,
}

impl AuthResponse {
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "Campus")]
    pub campus: String,
    #[serde(rename = "Agree")]
    pub agree: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "Status", default)]
    pub status: Option<Value>,
}

impl SubmitResponse {
    /// Only a literal boolean `true` confirms the submission.
    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, Some(Value::Bool(true)))
    }
}

/// A list record exactly as the backend sends it.
pub type RawEntry = Map<String, Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(rename = "List", default)]
    pub list: Option<Vec<RawEntry>>,
}

pub const ENTRY_TIME_FIELD: &str = "Time";
pub const ENTRY_USERNAME_FIELD: &str = "Username";
pub const ENTRY_HEADERS_FIELD: &str = "Headers";

/// Fields that never leave the transport layer.
pub const REDACTED_ENTRY_FIELDS: &[&str] = &[ENTRY_USERNAME_FIELD, ENTRY_HEADERS_FIELD];
