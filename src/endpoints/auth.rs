//! Login and session handling.
//!
//! A successful login installs the returned token as the client's
//! [`Credentials`] and persists the user through the [`SessionStore`].

use std::cell::RefCell;

use crate::client::{ApiClient, Credentials};
use crate::config::LOGIN_PATH;
use crate::error::{Result, StoreError};
use crate::models::{ApiResponse, AuthUser, LoginCredentials};
use crate::session::SessionStore;

pub struct AuthApi<'a> {
    client: &'a ApiClient,
    session: &'a SessionStore,
    user: &'a RefCell<Option<AuthUser>>,
}

impl<'a> AuthApi<'a> {
    pub fn new(
        client: &'a ApiClient,
        session: &'a SessionStore,
        user: &'a RefCell<Option<AuthUser>>,
    ) -> Self {
        Self {
            client,
            session,
            user,
        }
    }

    /// Log in and make the returned token the active credential.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthUser> {
        let body = LoginCredentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp: ApiResponse<AuthUser> = self.client.post(LOGIN_PATH, &body)?;

        let user = match resp.data {
            Some(user) if resp.success => user,
            _ => {
                let message = resp
                    .message
                    .or(resp.error)
                    .unwrap_or_else(|| "login failed".to_string());
                return Err(StoreError::Auth(message));
            }
        };

        self.client
            .set_credentials(Some(Credentials::bearer(user.token.clone())));
        if let Err(e) = self.session.save(&user) {
            tracing::warn!(error = %e, "could not persist session");
        }
        tracing::info!(user_id = %user.id, role = %user.role, "logged in");
        *self.user.borrow_mut() = Some(user.clone());
        Ok(user)
    }

    /// Drop the credential and forget the persisted session.
    pub fn logout(&self) -> Result<()> {
        self.client.set_credentials(None);
        *self.user.borrow_mut() = None;
        self.session.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.has_credentials()
    }
}
