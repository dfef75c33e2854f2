use std::sync::Arc;

use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub hidden: bool,
    pub message: String,
}

impl Default for Alert {
    fn default() -> Self {
        Self {
            hidden: true,
            message: String::new(),
        }
    }
}

/// The one notification banner every view renders. Last write wins.
#[derive(Debug, Default)]
pub struct AlertState {
    inner: Mutex<Alert>,
}

pub type SharedAlert = Arc<AlertState>;

impl AlertState {
    pub fn shared() -> SharedAlert {
        Arc::new(Self::default())
    }

    pub async fn show(&self, message: impl Into<String>) {
        let mut alert = self.inner.lock().await;
        alert.hidden = false;
        alert.message = message.into();
    }

    /// Hides the banner but keeps the last message around, as a view
    /// resetting before a new attempt does.
    pub async fn hide(&self) {
        self.inner.lock().await.hidden = true;
    }

    pub async fn snapshot(&self) -> Alert {
        self.inner.lock().await.clone()
    }

    /// The message, if the banner is currently visible.
    pub async fn visible_message(&self) -> Option<String> {
        let alert = self.inner.lock().await;
        (!alert.hidden).then(|| alert.message.clone())
    }
}
