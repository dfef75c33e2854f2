use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri},
    Router as HttpRouter,
};
use serde_json::Value;
use tokio::{
    net::TcpListener,
    sync::{Mutex, Notify},
};

use crate::{
    ApiClient, FlowContext, MemorySessionStore, RecordingDocumentViewer, Router, SessionStore,
};

#[derive(Debug, Clone)]
pub(super) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub session_key: Option<String>,
    pub accept: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct BackendState {
    responses: HashMap<String, (u16, String)>,
    requests: Vec<RecordedRequest>,
    gate: Option<Arc<Notify>>,
}

#[derive(Clone, Default)]
pub(super) struct MockBackend {
    state: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    pub async fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.state
            .lock()
            .await
            .responses
            .insert(path.to_string(), (status, body.into()));
    }

    pub async fn respond_json(&self, path: &str, status: u16, body: Value) {
        self.respond(path, status, body.to_string()).await;
    }

    /// Every later request waits for a permit on the returned gate before
    /// it is answered.
    pub async fn hold_responses(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().await.gate = Some(Arc::clone(&gate));
        gate
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..500 {
            if self.state.lock().await.requests.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("backend never saw {count} request(s)");
    }
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        session_key: header_text("x-session-key"),
        accept: header_text("accept"),
        body: serde_json::from_slice(&body).ok(),
    };

    let (response, gate) = {
        let mut state = backend.state.lock().await;
        let response = state.responses.get(&recorded.path).cloned();
        state.requests.push(recorded);
        (response, state.gate.clone())
    };
    if let Some(gate) = gate {
        gate.notified().await;
    }

    let (status, body) = response.unwrap_or((404, r#"{"Code":404,"Error":"Not Found"}"#.into()));
    (
        StatusCode::from_u16(status).expect("status"),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

pub(super) async fn spawn_backend() -> (String, MockBackend) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let backend = MockBackend::default();
    let app = HttpRouter::new()
        .fallback(handle)
        .with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), backend)
}

/// A base URL nothing is listening on.
pub(super) async fn closed_server_url() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

pub(super) struct Harness {
    pub backend: MockBackend,
    pub ctx: FlowContext,
    pub session: Arc<MemorySessionStore>,
    pub viewer: Arc<RecordingDocumentViewer>,
}

impl Harness {
    pub async fn new(session_id: Option<&str>) -> Self {
        let (server_url, backend) = spawn_backend().await;
        Self::against(server_url, backend, session_id).await
    }

    pub async fn unreachable(session_id: Option<&str>) -> Self {
        let server_url = closed_server_url().await;
        Self::against(server_url, MockBackend::default(), session_id).await
    }

    async fn against(server_url: String, backend: MockBackend, session_id: Option<&str>) -> Self {
        let session = Arc::new(MemorySessionStore::new());
        if let Some(id) = session_id {
            session.set_id(id).await.expect("seed session");
        }
        let viewer = Arc::new(RecordingDocumentViewer::default());
        let api = ApiClient::new(&server_url).expect("api client");
        let ctx = FlowContext::with_viewer(api, session.clone(), viewer.clone()).expect("context");
        Self {
            backend,
            ctx,
            session,
            viewer,
        }
    }

    pub fn router(&self) -> Router {
        Router::new(self.ctx.clone())
    }

    pub async fn stored_session(&self) -> String {
        self.session.get_id().await
    }

    pub async fn route(&self) -> crate::Route {
        self.ctx.navigator.current().await
    }

    pub async fn alert_message(&self) -> Option<String> {
        self.ctx.alert.visible_message().await
    }
}
