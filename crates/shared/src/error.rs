use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    Internal,
    Other,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            500..=599 => Self::Internal,
            _ => Self::Other,
        }
    }
}

/// Error body the backend writes alongside every non-200 status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "Code")]
    pub code: u16,
    #[serde(rename = "Error")]
    pub error: String,
}

impl ApiError {
    pub fn new(code: u16, error: impl Into<String>) -> Self {
        Self {
            code,
            error: error.into(),
        }
    }

    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    pub fn kind(&self) -> ErrorCode {
        ErrorCode::from_status(self.code)
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl From<ApiError> for ApiException {
    fn from(value: ApiError) -> Self {
        Self {
            code: value.kind(),
            message: value.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_error_body() {
        let err = ApiError::parse(r#"{"Code":401,"Error":"Unauthorized"}"#).expect("parse");
        assert_eq!(err, ApiError::new(401, "Unauthorized"));
        assert_eq!(err.kind(), ErrorCode::Unauthorized);

        let exception = ApiException::from(err);
        assert_eq!(exception.to_string(), "Unauthorized: Unauthorized");
    }

    #[test]
    fn rejects_non_error_bodies() {
        assert!(ApiError::parse("not json").is_none());
        assert!(ApiError::parse(r#"{"Status":true}"#).is_none());
    }
}
