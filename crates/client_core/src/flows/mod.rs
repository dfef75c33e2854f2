//! One flow per view. Each flow converts every failure into an alert plus,
//! where called for, a forced logout; nothing escapes as an `Err`.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, warn};

use crate::{
    context::FlowContext, error::SESSION_EXPIRED_MESSAGE, navigation::Route,
    transport::ApiResponse,
};

pub mod admin_list;
pub mod auth;
pub mod done;
pub mod submission;

pub use admin_list::AdminListFlow;
pub use auth::AuthFlow;
pub use done::DoneFlow;
pub use submission::SubmissionFlow;

/// Rejects a second action while one request is still outstanding.
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicBool);

impl InFlight {
    pub(crate) fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub(crate) struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Clears the stored session and sends the client to `login`. With
/// `expired`, the expiry notice is shown first.
pub(crate) async fn logout(ctx: &FlowContext, expired: bool, login: Route) {
    if expired {
        ctx.alert.show(SESSION_EXPIRED_MESSAGE).await;
    }
    if let Err(err) = ctx.session.delete_id().await {
        error!(error = %format!("{err:#}"), "logout: failed to clear stored session");
    }
    info!(expired, to = %login, "logout");
    ctx.navigator.navigate(login).await;
}

/// Logs the backend's error body for a non-200 response. The alert text is
/// built from the raw body elsewhere; this is diagnostics only.
pub(crate) fn log_rejection(scope: &'static str, response: &ApiResponse) {
    match response.api_error() {
        Some(err) => warn!(
            scope,
            status = response.status(),
            code = ?err.code,
            error = %err.message,
            "backend rejected request"
        ),
        None => debug!(scope, status = response.status(), "non-200 without error body"),
    }
}
