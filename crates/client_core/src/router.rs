//! Path table: which flow serves which view.

use shared::domain::LoginMode;
use tracing::{debug, info};

use crate::{
    context::FlowContext,
    flows::{AdminListFlow, AuthFlow, DoneFlow, SubmissionFlow},
    navigation::Route,
};

/// Upper bound on guard redirects followed by [`Router::settle`].
const MAX_REDIRECTS: usize = 4;

pub enum View {
    Login(AuthFlow),
    Form(SubmissionFlow),
    AdminLogin(AuthFlow),
    AdminList(AdminListFlow),
    Done(DoneFlow),
}

impl View {
    pub fn route(&self) -> Route {
        match self {
            Self::Login(_) => Route::Login,
            Self::Form(_) => Route::Form,
            Self::AdminLogin(_) => Route::AdminLogin,
            Self::AdminList(_) => Route::AdminList,
            Self::Done(_) => Route::Done,
        }
    }
}

#[derive(Clone)]
pub struct Router {
    ctx: FlowContext,
}

impl Router {
    pub fn new(ctx: FlowContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &FlowContext {
        &self.ctx
    }

    /// Resolves `path`, records it as the current location and builds the
    /// view's flow. Building a flow runs its entry guard, which may move the
    /// client elsewhere; the returned view is still the one that was asked
    /// for.
    pub async fn enter(&self, path: &str) -> View {
        let route = Route::resolve(path);
        if Route::from_path(path).is_none() {
            info!(path, to = %route, "router: unknown path");
        }
        self.enter_route(route).await
    }

    pub async fn enter_route(&self, route: Route) -> View {
        self.ctx.navigator.navigate(route).await;
        let ctx = self.ctx.clone();
        match route {
            Route::Login => View::Login(AuthFlow::enter(ctx, LoginMode::User).await),
            Route::AdminLogin => View::AdminLogin(AuthFlow::enter(ctx, LoginMode::Admin).await),
            Route::Form => View::Form(SubmissionFlow::enter(ctx).await),
            Route::AdminList => View::AdminList(AdminListFlow::enter(ctx).await),
            Route::Done => View::Done(DoneFlow::enter(ctx).await),
        }
    }

    /// Enters `path` and keeps following entry redirects until a view stays
    /// put.
    pub async fn settle(&self, path: &str) -> View {
        let mut view = self.enter(path).await;
        for _ in 0..MAX_REDIRECTS {
            let current = self.ctx.navigator.current().await;
            if current == view.route() {
                break;
            }
            debug!(from = %view.route(), to = %current, "router: following redirect");
            view = self.enter_route(current).await;
        }
        view
    }
}
