use shared::protocol::{ListResponse, ADMIN_LIST_ROUTE};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{log_rejection, logout, InFlight};
use crate::{
    context::FlowContext,
    error::FlowError,
    navigation::Route,
    transport::ApiResponse,
    types::{filter_entries, sanitize_entries, ListEntry, Outcome},
};

#[derive(Default)]
struct ListState {
    session_id: String,
    /// Sanitized entries exactly as fetched. Filtering only ever reads this.
    source: Vec<ListEntry>,
    display: Vec<ListEntry>,
    search: String,
}

/// Admin view over every submission on file.
pub struct AdminListFlow {
    ctx: FlowContext,
    state: Mutex<ListState>,
    in_flight: InFlight,
}

impl AdminListFlow {
    /// Enters the list view: guard-logout without a session, otherwise one
    /// fetch.
    pub async fn enter(ctx: FlowContext) -> Self {
        let session_id = ctx.session.get_id().await;
        let signed_out = session_id.is_empty();
        ctx.alert.hide().await;
        let flow = Self {
            ctx,
            state: Mutex::new(ListState {
                session_id,
                ..ListState::default()
            }),
            in_flight: InFlight::default(),
        };
        if signed_out {
            info!("list: no session, redirecting to admin login");
            flow.logout(false).await;
        } else {
            flow.fetch().await;
        }
        flow
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_active()
    }

    pub async fn fetch(&self) -> Outcome {
        let Some(_guard) = self.in_flight.try_begin() else {
            warn!("list: fetch ignored, request already pending");
            return Outcome::Busy;
        };
        self.ctx.alert.hide().await;

        let session_id = self.state.lock().await.session_id.clone();
        if session_id.is_empty() {
            self.logout(false).await;
            return Outcome::Navigated(Route::AdminLogin);
        }

        let result = self.ctx.api.get(ADMIN_LIST_ROUTE, Some(&session_id)).await;
        match complete(result) {
            Ok(source) => {
                let entries = source.len();
                let mut state = self.state.lock().await;
                state.display = filter_entries(&source, &state.search);
                state.source = source;
                info!(entries, "list: loaded");
                Outcome::Loaded { entries }
            }
            Err(FlowError::SessionExpired) => {
                warn!("list: session rejected by server");
                self.logout(true).await;
                Outcome::Failed(FlowError::SessionExpired)
            }
            Err(err) => {
                warn!(error = %err, "list: fetch failed");
                self.ctx.alert.show(err.alert_message()).await;
                if err.is_transport() {
                    self.logout(false).await;
                }
                Outcome::Failed(err)
            }
        }
    }

    /// Recomputes the display list from the fetched entries. Never fetches
    /// and never touches the fetched entries themselves.
    pub async fn set_filter(&self, search: &str) -> usize {
        let mut state = self.state.lock().await;
        state.search = search.to_string();
        state.display = filter_entries(&state.source, search);
        state.display.len()
    }

    pub async fn search(&self) -> String {
        self.state.lock().await.search.clone()
    }

    pub async fn display_list(&self) -> Vec<ListEntry> {
        self.state.lock().await.display.clone()
    }

    pub async fn source_list(&self) -> Vec<ListEntry> {
        self.state.lock().await.source.clone()
    }

    pub async fn logout(&self, expired: bool) {
        self.state.lock().await.session_id.clear();
        logout(&self.ctx, expired, Route::AdminLogin).await;
    }
}

fn complete(result: Result<ApiResponse, FlowError>) -> Result<Vec<ListEntry>, FlowError> {
    let response = result?;
    if !response.is_ok() {
        log_rejection("list", &response);
    }
    if response.is_unauthorized() {
        return Err(FlowError::SessionExpired);
    }
    if !response.is_ok() {
        return Err(FlowError::unexpected(&response));
    }
    let body: ListResponse = response.json()?;
    let Some(list) = body.list else {
        return Err(FlowError::MalformedResponse {
            body: response.describe(),
        });
    };
    Ok(sanitize_entries(list))
}
