use shared::protocol::{SubmitResponse, SUBMIT_ROUTE};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{log_rejection, logout, InFlight};
use crate::{
    context::FlowContext,
    error::FlowError,
    navigation::Route,
    transport::ApiResponse,
    types::{Outcome, SubmissionForm},
};

/// The acknowledgment form. Reachable only with a stored session.
pub struct SubmissionFlow {
    ctx: FlowContext,
    session_id: Mutex<String>,
    document_opened: AtomicBool,
    in_flight: InFlight,
}

impl SubmissionFlow {
    pub async fn enter(ctx: FlowContext) -> Self {
        let session_id = ctx.session.get_id().await;
        let signed_out = session_id.is_empty();
        ctx.alert.hide().await;
        let flow = Self {
            ctx,
            session_id: Mutex::new(session_id),
            document_opened: AtomicBool::new(false),
            in_flight: InFlight::default(),
        };
        if signed_out {
            info!("form: no session, redirecting to login");
            flow.logout(false).await;
        }
        flow
    }

    pub fn open_document(&self) {
        self.document_opened.store(true, Ordering::Release);
        self.ctx.viewer.open(&self.ctx.handbook);
    }

    pub fn document_opened(&self) -> bool {
        self.document_opened.load(Ordering::Acquire)
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_active()
    }

    pub async fn submit(&self, form: &SubmissionForm) -> Outcome {
        let Some(_guard) = self.in_flight.try_begin() else {
            warn!("form: submit ignored, request already pending");
            return Outcome::Busy;
        };
        self.ctx.alert.hide().await;

        let session_id = self.session_id.lock().await.clone();
        if session_id.is_empty() {
            self.logout(false).await;
            return Outcome::Navigated(Route::Login);
        }

        let result = self
            .ctx
            .api
            .post_json(SUBMIT_ROUTE, &form.to_request(), Some(&session_id))
            .await;

        match complete(result) {
            Ok(route) => {
                info!(campus = %form.campus, "form: acknowledgment recorded");
                self.ctx.navigator.navigate(route).await;
                Outcome::Navigated(route)
            }
            Err(FlowError::SessionExpired) => {
                warn!("form: session rejected by server");
                self.logout(true).await;
                Outcome::Failed(FlowError::SessionExpired)
            }
            Err(err) => {
                warn!(error = %err, "form: submit failed");
                self.ctx.alert.show(err.alert_message()).await;
                Outcome::Failed(err)
            }
        }
    }

    pub async fn logout(&self, expired: bool) {
        self.session_id.lock().await.clear();
        logout(&self.ctx, expired, Route::Login).await;
    }
}

fn complete(result: Result<ApiResponse, FlowError>) -> Result<Route, FlowError> {
    let response = result?;
    if !response.is_ok() {
        log_rejection("form", &response);
    }
    if response.is_unauthorized() {
        return Err(FlowError::SessionExpired);
    }
    if !response.is_ok() {
        return Err(FlowError::unexpected(&response));
    }
    let body: SubmitResponse = response.json()?;
    if !body.is_confirmed() {
        return Err(FlowError::MalformedResponse {
            body: response.describe(),
        });
    }
    Ok(Route::Done)
}
