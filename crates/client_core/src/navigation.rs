use std::fmt;

use shared::domain::LoginMode;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Form,
    AdminLogin,
    AdminList,
    Done,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Login,
        Route::Form,
        Route::AdminLogin,
        Route::AdminList,
        Route::Done,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Form => "/form",
            Self::AdminLogin => "/admin/login",
            Self::AdminList => "/admin/list",
            Self::Done => "/done",
        }
    }

    /// Exact match on a known path; anything else lands on the login view.
    pub fn resolve(path: &str) -> Self {
        Self::from_path(path).unwrap_or(Self::Login)
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_start_matches('#').trim_matches('/');
        Self::ALL
            .into_iter()
            .find(|route| route.path().trim_start_matches('/') == trimmed)
    }

    pub fn login_for(mode: LoginMode) -> Self {
        match mode {
            LoginMode::User => Self::Login,
            LoginMode::Admin => Self::AdminLogin,
        }
    }

    /// Where a successful login in `mode` lands.
    pub fn home_for(mode: LoginMode) -> Self {
        match mode {
            LoginMode::User => Self::Form,
            LoginMode::Admin => Self::AdminList,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Current location of the client.
#[derive(Debug)]
pub struct Navigator {
    current: Mutex<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub async fn navigate(&self, route: Route) {
        let mut current = self.current.lock().await;
        let from = *current;
        if from != route {
            info!(%from, to = %route, "navigate");
        }
        *current = route;
    }

    pub async fn current(&self) -> Route {
        *self.current.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_known_path() {
        for route in Route::ALL {
            assert_eq!(Route::resolve(route.path()), route);
        }
        assert_eq!(Route::resolve("admin/list/"), Route::AdminList);
        assert_eq!(Route::resolve("#/done"), Route::Done);
    }

    #[test]
    fn unknown_paths_fall_back_to_login() {
        assert_eq!(Route::resolve(""), Route::Login);
        assert_eq!(Route::resolve("/admin"), Route::Login);
        assert_eq!(Route::resolve("/form/extra"), Route::Login);
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn mode_selects_login_and_home() {
        assert_eq!(Route::login_for(LoginMode::Admin), Route::AdminLogin);
        assert_eq!(Route::home_for(LoginMode::Admin), Route::AdminList);
        assert_eq!(Route::login_for(LoginMode::User), Route::Login);
        assert_eq!(Route::home_for(LoginMode::User), Route::Form);
    }
}
