use thiserror::Error;
use tracing::{info, warn};

use super::Route;
use crate::models::User;
use crate::store::Storage;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Please enter your credentials")]
    MissingCredentials,

    #[error("Invalid email address. This user does not exist in our database.")]
    UnknownEmail,
}

/// The authenticated/unauthenticated session state.
///
/// Derived once from storage at startup; afterwards `login` and `logout`
/// update both the in-memory state and the persisted flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGate {
    authenticated: bool,
}

impl SessionGate {
    pub fn from_storage(storage: &Storage) -> Self {
        Self {
            authenticated: storage.is_authenticated(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Check the login form against the cached users and log in.
    ///
    /// Only the email is checked (case-insensitively); the password just
    /// has to be non-empty. On success the matching user becomes the
    /// current-user marker.
    pub fn attempt_login(
        &mut self,
        storage: &Storage,
        email: &str,
        password: &str,
    ) -> Result<User, LoginError> {
        if email.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let user = storage
            .get_users()
            .into_iter()
            .find(|u| u.has_email(email))
            .ok_or(LoginError::UnknownEmail)?;

        if let Err(e) = storage.set_current_user(&user) {
            warn!(error = %e, "Failed to store current user");
        }
        self.login(storage);
        info!(user_id = %user.id, "Login successful");
        Ok(user)
    }

    /// Mark the session authenticated and persist the flag.
    pub fn login(&mut self, storage: &Storage) {
        self.authenticated = true;
        if let Err(e) = storage.set_authenticated(true) {
            warn!(error = %e, "Failed to persist authentication flag");
        }
    }

    /// End the session. The user snapshot is left in place.
    pub fn logout(&mut self, storage: &Storage) {
        self.authenticated = false;
        if let Err(e) = storage.logout() {
            warn!(error = %e, "Failed to clear authentication flag");
        }
        if let Err(e) = storage.clear_current_user() {
            warn!(error = %e, "Failed to clear current user");
        }
        info!("Logged out");
    }

    /// Where a navigation to `route` actually lands given the session.
    pub fn resolve(&self, route: Route) -> Route {
        match (self.authenticated, route) {
            (true, Route::Root | Route::Login) => Route::Users,
            (false, Route::Root) => Route::Login,
            (false, route) if route.is_protected() => Route::Login,
            (_, route) => route,
        }
    }
}
