use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::protocol::{
    AuthRequest, RawEntry, SubmitRequest, ENTRY_TIME_FIELD, REDACTED_ENTRY_FIELDS,
};
use tracing::warn;

use crate::{error::FlowError, navigation::Route};

/// What a flow action ended in. Errors are already reflected in the alert
/// by the time one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Navigated(Route),
    Loaded { entries: usize },
    Failed(FlowError),
    /// Another action of the same flow was still pending; nothing was sent.
    Busy,
}

#[derive(Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<LoginCredentials> for AuthRequest {
    fn from(value: LoginCredentials) -> Self {
        Self {
            username: value.username,
            password: value.password,
        }
    }
}

/// Form model as the view holds it. Only `Campus` and `Agree` are ever
/// sent; anything else the view attached stays local.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionForm {
    #[serde(rename = "Campus", default)]
    pub campus: String,
    #[serde(rename = "Agree", default)]
    pub agree: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubmissionForm {
    pub fn new(campus: impl Into<String>, agree: bool) -> Self {
        Self {
            campus: campus.into(),
            agree,
            extra: Map::new(),
        }
    }

    pub fn to_request(&self) -> SubmitRequest {
        SubmitRequest {
            campus: self.campus.clone(),
            agree: self.agree,
        }
    }
}

/// A list record that is safe to display. It can only be built from a raw
/// record by dropping the redacted fields, so no display path can see them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    #[serde(rename = "Time")]
    pub time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl ListEntry {
    pub fn sanitize(mut raw: RawEntry) -> Self {
        for field in REDACTED_ENTRY_FIELDS {
            raw.remove(*field);
        }
        let time = match raw.remove(ENTRY_TIME_FIELD) {
            Some(Value::String(text)) => match DateTime::parse_from_rfc3339(&text) {
                Ok(parsed) => Some(parsed.with_timezone(&Utc)),
                Err(err) => {
                    warn!(time = %text, error = %err, "list: unparseable entry time");
                    None
                }
            },
            Some(other) => {
                warn!(time = %other, "list: entry time is not a string");
                None
            }
            None => None,
        };
        Self {
            time,
            fields: raw.into_iter().collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Case-sensitive substring match over every displayed value.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        if self
            .time
            .is_some_and(|time| time.to_rfc3339().contains(needle))
        {
            return true;
        }
        self.fields.values().any(|value| match value {
            Value::Null => false,
            Value::String(text) => text.contains(needle),
            other => other.to_string().contains(needle),
        })
    }
}

pub fn sanitize_entries(raw: Vec<RawEntry>) -> Vec<ListEntry> {
    raw.into_iter().map(ListEntry::sanitize).collect()
}

/// Independent copy of the entries of `source` that match `search`.
pub fn filter_entries(source: &[ListEntry], search: &str) -> Vec<ListEntry> {
    source
        .iter()
        .filter(|entry| entry.matches(search))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawEntry {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn sanitize_drops_redacted_fields_and_parses_time() {
        let entry = ListEntry::sanitize(raw(json!({
            "EmployeeID": "1001",
            "Username": "jdoe",
            "FirstName": "Jane",
            "LastName": "Doe",
            "Campus": "High",
            "Headers": {"User-Agent": ["curl"]},
            "Time": "2015-08-12T09:30:00-05:00",
        })));

        assert!(entry.get("Username").is_none());
        assert!(entry.get("Headers").is_none());
        assert_eq!(entry.get("Campus"), Some(&json!("High")));
        assert_eq!(
            entry.time.map(|t| t.to_rfc3339()).as_deref(),
            Some("2015-08-12T14:30:00+00:00")
        );

        let rendered = serde_json::to_value(&entry).expect("serialize");
        assert!(rendered.get("Username").is_none());
        assert!(rendered.get("Headers").is_none());
        assert_eq!(rendered["FirstName"], json!("Jane"));
    }

    #[test]
    fn bad_time_is_kept_as_none() {
        let entry = ListEntry::sanitize(raw(json!({"Time": "yesterday", "Campus": "Primary"})));
        assert_eq!(entry.time, None);
        assert_eq!(entry.get("Campus"), Some(&json!("Primary")));
    }

    #[test]
    fn match_is_case_sensitive_substring() {
        let entry = ListEntry::sanitize(raw(json!({
            "FirstName": "Jane",
            "EmployeeID": 1001,
            "Time": "2015-08-12T09:30:00Z",
        })));
        assert!(entry.matches("an"));
        assert!(!entry.matches("jane"));
        assert!(entry.matches("100"));
        assert!(entry.matches("2015-08"));
        assert!(entry.matches(""));
    }

    #[test]
    fn form_keeps_only_whitelisted_fields_on_the_wire() {
        let form: SubmissionForm =
            serde_json::from_value(json!({"Campus": "X", "Agree": true, "extra": "y"}))
                .expect("form");
        assert_eq!(form.extra.get("extra"), Some(&json!("y")));

        let wire = serde_json::to_value(form.to_request()).expect("serialize");
        assert_eq!(wire, json!({"Campus": "X", "Agree": true}));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = LoginCredentials::new("alice", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
