use thiserror::Error;

use crate::transport::ApiResponse;

pub const BAD_CREDENTIALS_MESSAGE: &str = "Bad username or password";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session expired. Please log in again";
const UNCLASSIFIED_PREFIX: &str = "Something bad happened: ";

/// Everything a flow action can run into. Flows never return these as `Err`;
/// each one is turned into an alert and, for some, a forced logout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The request never completed, or the server answered with a non-2xx
    /// status other than 401.
    #[error("transport failure (status {status:?}): {detail}")]
    Transport { status: Option<u16>, detail: String },
    #[error("credentials rejected")]
    AuthRejected,
    #[error("malformed response: {body}")]
    MalformedResponse { body: String },
    #[error("session expired")]
    SessionExpired,
    #[error("session storage failure: {0}")]
    Storage(String),
}

impl FlowError {
    pub(crate) fn send_failed(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|status| status.as_u16()),
            detail: err.to_string(),
        }
    }

    /// Classifies a response that did not carry the expected success shape.
    /// 401 is left to the caller since its meaning depends on the endpoint.
    pub(crate) fn unexpected(response: &ApiResponse) -> Self {
        if response.is_success_class() {
            Self::MalformedResponse {
                body: response.describe(),
            }
        } else {
            Self::Transport {
                status: Some(response.status()),
                detail: response.describe(),
            }
        }
    }

    pub(crate) fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }

    /// Text shown in the alert banner for this failure.
    pub fn alert_message(&self) -> String {
        match self {
            Self::AuthRejected => BAD_CREDENTIALS_MESSAGE.to_string(),
            Self::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Transport { detail, .. } => format!("{UNCLASSIFIED_PREFIX}{detail}"),
            Self::MalformedResponse { body } => format!("{UNCLASSIFIED_PREFIX}{body}"),
            Self::Storage(detail) => format!("{UNCLASSIFIED_PREFIX}{detail}"),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
