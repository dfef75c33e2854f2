use std::sync::Arc;

use anyhow::Result;

use crate::{
    alert::{AlertState, SharedAlert},
    document::{Document, DocumentViewer, LoggingDocumentViewer, HANDBOOK_RESOURCE, HANDBOOK_TITLE},
    navigation::Navigator,
    session::SessionStore,
    transport::ApiClient,
};

/// Collaborators every flow is built from. Cloning shares them.
#[derive(Clone)]
pub struct FlowContext {
    pub api: ApiClient,
    pub session: Arc<dyn SessionStore>,
    pub alert: SharedAlert,
    pub navigator: Arc<Navigator>,
    pub viewer: Arc<dyn DocumentViewer>,
    pub handbook: Document,
}

impl FlowContext {
    pub fn new(api: ApiClient, session: Arc<dyn SessionStore>) -> Result<Self> {
        Self::with_viewer(api, session, Arc::new(LoggingDocumentViewer))
    }

    pub fn with_viewer(
        api: ApiClient,
        session: Arc<dyn SessionStore>,
        viewer: Arc<dyn DocumentViewer>,
    ) -> Result<Self> {
        let handbook = Document {
            url: api.resolve(HANDBOOK_RESOURCE)?,
            title: HANDBOOK_TITLE.to_string(),
        };
        Ok(Self {
            api,
            session,
            alert: AlertState::shared(),
            navigator: Arc::new(Navigator::default()),
            viewer,
            handbook,
        })
    }
}
