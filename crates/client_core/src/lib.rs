//! Session-gated client for the handbook acknowledgment workflow: log in,
//! acknowledge once, and (for admins) review who has acknowledged.

pub mod alert;
pub mod context;
pub mod document;
pub mod error;
pub mod flows;
pub mod navigation;
pub mod router;
pub mod session;
pub mod transport;
pub mod types;

pub use alert::{Alert, AlertState, SharedAlert};
pub use context::FlowContext;
pub use document::{Document, DocumentViewer, LoggingDocumentViewer, RecordingDocumentViewer};
pub use error::{FlowError, BAD_CREDENTIALS_MESSAGE, SESSION_EXPIRED_MESSAGE};
pub use flows::{AdminListFlow, AuthFlow, DoneFlow, SubmissionFlow};
pub use navigation::{Navigator, Route};
pub use router::{Router, View};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use transport::{ApiClient, ApiResponse};
pub use types::{ListEntry, LoginCredentials, Outcome, SubmissionForm};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
