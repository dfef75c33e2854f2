use std::sync::Mutex;

use tracing::info;
use url::Url;

pub const HANDBOOK_RESOURCE: &str = "images/handbook.pdf";
pub const HANDBOOK_TITLE: &str = "BISD Handbook";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub url: Url,
    pub title: String,
}

/// Opens a static document outside the current view. Fire and forget.
pub trait DocumentViewer: Send + Sync {
    fn open(&self, document: &Document);
}

pub struct LoggingDocumentViewer;

impl DocumentViewer for LoggingDocumentViewer {
    fn open(&self, document: &Document) {
        info!(url = %document.url, title = %document.title, "document: open requested");
    }
}

/// Remembers what was opened.
#[derive(Debug, Default)]
pub struct RecordingDocumentViewer {
    opened: Mutex<Vec<Document>>,
}

impl RecordingDocumentViewer {
    pub fn opened(&self) -> Vec<Document> {
        match self.opened.lock() {
            Ok(opened) => opened.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DocumentViewer for RecordingDocumentViewer {
    fn open(&self, document: &Document) {
        match self.opened.lock() {
            Ok(mut opened) => opened.push(document.clone()),
            Err(poisoned) => poisoned.into_inner().push(document.clone()),
        }
    }
}
