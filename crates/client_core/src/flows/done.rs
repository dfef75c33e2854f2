use tracing::info;

use super::logout;
use crate::{context::FlowContext, navigation::Route};

/// Confirmation view shown once the acknowledgment is on file.
pub struct DoneFlow {
    ctx: FlowContext,
}

impl DoneFlow {
    pub async fn enter(ctx: FlowContext) -> Self {
        info!("done: acknowledgment complete");
        Self { ctx }
    }

    pub fn open_document(&self) {
        self.ctx.viewer.open(&self.ctx.handbook);
    }

    pub async fn logout(&self) {
        logout(&self.ctx, false, Route::Login).await;
    }
}
