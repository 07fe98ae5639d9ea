use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{Credentials, Registration, Role, User};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated(User),
}

/// The one signed-in identity of a running client. Owned by whoever drives
/// the UI and lent to views; never global.
#[derive(Debug)]
pub struct Session {
    state: AuthState,
    last_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: AuthState::Unauthenticated,
            last_error: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, AuthState::Authenticating)
    }

    /// Message from the last failed login or register, for display next to the form.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin(&mut self) {
        self.last_error = None;
        self.state = AuthState::Authenticating;
    }

    /// Result of the current-user check. Failure means "not logged in" and
    /// is never surfaced.
    pub fn complete_status_check(&mut self, result: Result<User, ApiError>) {
        match result {
            Ok(user) => {
                info!(user_id = user.id, role = %user.role, "session restored");
                self.state = AuthState::Authenticated(user);
            }
            Err(e) => {
                debug!(reason = %e, "no active session");
                self.state = AuthState::Unauthenticated;
            }
        }
    }

    /// Result of a login or register call.
    pub fn complete_sign_in(&mut self, result: Result<User, ApiError>) -> Result<User, ApiError> {
        match result {
            Ok(user) => {
                info!(user_id = user.id, role = %user.role, "signed in");
                self.last_error = None;
                self.state = AuthState::Authenticated(user.clone());
                Ok(user)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.state = AuthState::Unauthenticated;
                Err(e)
            }
        }
    }

    /// Local state always clears, whatever the backend said.
    pub fn complete_logout(&mut self, result: Result<(), ApiError>) {
        if let Err(e) = result {
            warn!(error = %e, "logout call failed; clearing local session anyway");
        }
        info!("signed out");
        self.last_error = None;
        self.state = AuthState::Unauthenticated;
    }

    pub async fn check_status(&mut self, api: &ApiClient) {
        self.begin();
        let result = api.current_user().await;
        self.complete_status_check(result);
    }

    pub async fn login(&mut self, api: &ApiClient, credentials: &Credentials) -> Result<User, ApiError> {
        self.begin();
        let result = api.login(credentials).await;
        self.complete_sign_in(result)
    }

    pub async fn register(&mut self, api: &ApiClient, registration: &Registration) -> Result<User, ApiError> {
        self.begin();
        let result = api.register(registration).await;
        self.complete_sign_in(result)
    }

    pub async fn logout(&mut self, api: &ApiClient) {
        let result = api.logout().await;
        self.complete_logout(result);
    }
}
