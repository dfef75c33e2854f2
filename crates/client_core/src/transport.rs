//! Thin HTTP layer over the backend's four endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header::ACCEPT, Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    error::{ApiError, ApiException},
    protocol::SESSION_HEADER,
};
use tracing::debug;
use url::Url;

use crate::error::FlowError;

/// Status and raw body of a settled request. Any status is a valid
/// `ApiResponse`; only a request that never settled is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED.as_u16()
    }

    pub(crate) fn is_success_class(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FlowError> {
        serde_json::from_str(&self.body).map_err(|_| FlowError::MalformedResponse {
            body: self.describe(),
        })
    }

    /// The backend's `{Code, Error}` body, when the response carries one.
    pub fn api_error(&self) -> Option<ApiException> {
        ApiError::parse(&self.body).map(ApiException::from)
    }

    /// The raw body, or the status line when the server sent nothing.
    pub fn describe(&self) -> String {
        let body = self.body.trim();
        if body.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            body.to_string()
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http(base_url, Client::new())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_http(base_url, http)
    }

    fn with_http(base_url: &str, http: Client) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).with_context(|| format!("invalid server url '{base_url}'"))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a path relative to the server root, the way the browser
    /// resolved relative links against the page.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("cannot resolve '{path}' against {}", self.base_url))
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
        session_id: Option<&str>,
    ) -> Result<ApiResponse, FlowError> {
        let url = self.endpoint(route)?;
        let request = self.http.post(url).json(body);
        self.dispatch(route, request, session_id).await
    }

    pub async fn get(
        &self,
        route: &str,
        session_id: Option<&str>,
    ) -> Result<ApiResponse, FlowError> {
        let url = self.endpoint(route)?;
        let request = self.http.get(url);
        self.dispatch(route, request, session_id).await
    }

    fn endpoint(&self, route: &str) -> Result<Url, FlowError> {
        self.resolve(route).map_err(|err| FlowError::Transport {
            status: None,
            detail: format!("{err:#}"),
        })
    }

    async fn dispatch(
        &self,
        route: &str,
        request: RequestBuilder,
        session_id: Option<&str>,
    ) -> Result<ApiResponse, FlowError> {
        let mut request = request.header(ACCEPT, "application/json");
        if let Some(session_id) = session_id {
            request = request.header(SESSION_HEADER, session_id);
        }

        let response = request.send().await.map_err(FlowError::send_failed)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(FlowError::send_failed)?;
        debug!(route, status, "api: request settled");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use shared::error::ErrorCode;

    use super::*;

    #[test]
    fn resolves_routes_under_a_prefixed_base() {
        let api = ApiClient::new("http://example.test/handbook").expect("client");
        assert_eq!(
            api.resolve("api/1.0/auth").expect("url").as_str(),
            "http://example.test/handbook/api/1.0/auth"
        );
        assert_eq!(
            api.resolve("/images/handbook.pdf").expect("url").as_str(),
            "http://example.test/handbook/images/handbook.pdf"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn describe_falls_back_to_status_for_empty_body() {
        assert_eq!(ApiResponse::new(502, "  ").describe(), "HTTP 502");
        assert_eq!(
            ApiResponse::new(500, r#"{"Code":500,"Error":"Internal Server Error"}"#).describe(),
            r#"{"Code":500,"Error":"Internal Server Error"}"#
        );
    }

    #[test]
    fn api_error_reads_backend_error_body() {
        let rejected = ApiResponse::new(401, r#"{"Code":401,"Error":"Unauthorized"}"#);
        let err = rejected.api_error().expect("error body");
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Unauthorized");

        assert!(ApiResponse::new(500, "boom").api_error().is_none());
        assert!(ApiResponse::new(200, r#"{"Status":true}"#).api_error().is_none());
    }

    #[test]
    fn unexpected_status_classification() {
        let created = FlowError::unexpected(&ApiResponse::new(204, ""));
        assert!(matches!(created, FlowError::MalformedResponse { .. }));

        let failed = FlowError::unexpected(&ApiResponse::new(500, "boom"));
        assert_eq!(
            failed,
            FlowError::Transport {
                status: Some(500),
                detail: "boom".into()
            }
        );
        assert_eq!(failed.alert_message(), "Something bad happened: boom");
    }
}
