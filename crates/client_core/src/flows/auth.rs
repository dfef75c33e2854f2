use shared::{
    domain::LoginMode,
    protocol::{auth_route, AuthRequest, AuthResponse},
};
use tracing::{info, warn};

use super::{log_rejection, InFlight};
use crate::{
    context::FlowContext,
    error::FlowError,
    navigation::Route,
    transport::ApiResponse,
    types::{LoginCredentials, Outcome},
};

/// Login view, in either user or admin mode.
pub struct AuthFlow {
    ctx: FlowContext,
    mode: LoginMode,
    in_flight: InFlight,
}

impl AuthFlow {
    /// Enters the login view. A client that already holds a session is sent
    /// straight on to the mode's landing view without touching the network.
    pub async fn enter(ctx: FlowContext, mode: LoginMode) -> Self {
        let flow = Self {
            ctx,
            mode,
            in_flight: InFlight::default(),
        };
        if !flow.ctx.session.get_id().await.is_empty() {
            let home = Route::home_for(mode);
            info!(?mode, to = %home, "login: existing session, skipping");
            flow.ctx.navigator.navigate(home).await;
        }
        flow
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_active()
    }

    pub async fn submit(&self, credentials: LoginCredentials) -> Outcome {
        let Some(_guard) = self.in_flight.try_begin() else {
            warn!(mode = ?self.mode, "login: submit ignored, request already pending");
            return Outcome::Busy;
        };
        self.ctx.alert.hide().await;

        let request = AuthRequest::from(credentials);
        let result = self
            .ctx
            .api
            .post_json(auth_route(self.mode), &request, None)
            .await;

        match self.complete(result).await {
            Ok(route) => {
                self.ctx.navigator.navigate(route).await;
                Outcome::Navigated(route)
            }
            Err(err) => {
                warn!(mode = ?self.mode, error = %err, "login failed");
                self.ctx.alert.show(err.alert_message()).await;
                Outcome::Failed(err)
            }
        }
    }

    async fn complete(&self, result: Result<ApiResponse, FlowError>) -> Result<Route, FlowError> {
        let response = result?;
        if !response.is_ok() {
            log_rejection("login", &response);
        }
        if response.is_unauthorized() {
            return Err(FlowError::AuthRejected);
        }
        if !response.is_ok() {
            return Err(FlowError::unexpected(&response));
        }

        let body: AuthResponse = response.json()?;
        let Some(session_id) = body.session_id() else {
            return Err(FlowError::MalformedResponse {
                body: response.describe(),
            });
        };

        // A user who already signed never receives a live session.
        if body.completed && !self.mode.is_admin() {
            info!("login: submission already on file");
            return Ok(Route::Done);
        }

        self.ctx
            .session
            .set_id(session_id)
            .await
            .map_err(FlowError::storage)?;
        Ok(Route::home_for(self.mode))
    }
}
