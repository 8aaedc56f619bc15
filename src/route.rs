//! Route table and the guard in front of the home route.

use log::{debug, info};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthFlag {
    pub is_authenticated: bool,
}

impl AuthFlag {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated() -> Self {
        Self {
            is_authenticated: true,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session source consulted by the router.
pub trait AuthProvider {
    fn auth_flag(&self) -> AuthFlag;
    fn submit(&self, credentials: &Credentials) -> AuthFlag;
}

/// Placeholder provider: nobody is ever signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeAuth;

impl AuthProvider for FakeAuth {
    fn auth_flag(&self) -> AuthFlag {
        AuthFlag::anonymous()
    }

    fn submit(&self, credentials: &Credentials) -> AuthFlag {
        info!("Login submitted for {}", credentials.username);
        AuthFlag::anonymous()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDecision<V> {
    Render(V),
    Redirect(String),
}

pub fn guard<V>(auth: AuthFlag, view: V, fallback: &str) -> RenderDecision<V> {
    if auth.is_authenticated {
        RenderDecision::Render(view)
    } else {
        RenderDecision::Redirect(fallback.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Home),
            "/login" => Some(Route::Login),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Show(Route),
    Redirect(String),
    NotFound(String),
}

#[derive(Debug, Default)]
pub struct Router;

impl Router {
    pub fn resolve(&self, path: &str, auth: AuthFlag) -> Resolution {
        match Route::from_path(path) {
            Some(Route::Home) => match guard(auth, Route::Home, Route::Login.path()) {
                RenderDecision::Render(route) => Resolution::Show(route),
                RenderDecision::Redirect(to) => Resolution::Redirect(to),
            },
            Some(route) => Resolution::Show(route),
            None => Resolution::NotFound(path.to_string()),
        }
    }

    /// Follows redirects until a route is shown. Returns `None` for unknown
    /// paths.
    pub fn navigate(&self, path: &str, auth: AuthFlag) -> Option<Route> {
        let mut path = path.to_string();
        // Two routes, so anything longer than this is a loop.
        for _ in 0..4 {
            match self.resolve(&path, auth) {
                Resolution::Show(route) => return Some(route),
                Resolution::Redirect(to) => {
                    debug!("Redirect {} -> {}", path, to);
                    path = to;
                }
                Resolution::NotFound(_) => return None,
            }
        }
        None
    }
}
