use std::fmt;

/// A navigable location in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, redirects based on the session
    Root,
    /// `/login`
    Login,
    /// `/users`
    Users,
    /// `/users/{id}`
    UserDetail(String),
}

impl Route {
    /// Parse a path. Trailing slashes are ignored; unknown paths are `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Root),
            "/login" => Some(Route::Login),
            "/users" => Some(Route::Users),
            _ => {
                let id = trimmed.strip_prefix("/users/")?;
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::UserDetail(id.to_string()))
                }
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Users => "/users".to_string(),
            Route::UserDetail(id) => format!("/users/{}", id),
        }
    }

    /// Routes that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Users | Route::UserDetail(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
