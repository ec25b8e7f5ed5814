//! Login sessions over the credential store

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::identity::Role,
    services::credentials::{verify_password, CredentialsService},
};

/// An explicit login session with a create/destroy lifecycle, passed by the
/// caller wherever an authenticated identity is needed. Holds at most one
/// identity; independent sessions can coexist.
#[derive(Clone)]
pub struct Session {
    credentials: CredentialsService,
    current: Option<(Uuid, Role)>,
}

impl Session {
    pub fn new(credentials: CredentialsService) -> Self {
        Self {
            credentials,
            current: None,
        }
    }

    /// Attempt to log in.
    ///
    /// The display name resolves to the first matching identity; names are
    /// not unique and with duplicates the pick is whichever the store
    /// enumerates first -- a documented limitation, kept as-is. Passwordless
    /// identities accept only an empty or absent password; an identity with
    /// a half-present credential pair fails closed. Any failure leaves the
    /// session logged out.
    pub async fn login(&mut self, display_name: &str, password: Option<&str>) -> AppResult<bool> {
        self.current = None;

        let Some(identity) = self.credentials.find_by_display_name(display_name).await? else {
            tracing::debug!(display_name, "login failed: no such identity");
            return Ok(false);
        };

        let supplied = password.unwrap_or("");
        let ok = match (&identity.password_hash, &identity.password_salt) {
            (None, None) => supplied.is_empty(),
            (Some(hash), Some(salt)) => verify_password(hash, salt, supplied),
            _ => false,
        };

        if ok {
            self.current = Some((identity.id, identity.role));
            tracing::info!(id = %identity.id, "login succeeded");
        } else {
            tracing::debug!(display_name, "login failed: verification");
        }

        Ok(ok)
    }

    /// Clear the session unconditionally
    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn current_user(&self) -> Option<Uuid> {
        self.current.map(|(id, _)| id)
    }

    pub fn current_role(&self) -> Option<Role> {
        self.current.map(|(_, role)| role)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_role() == Some(Role::Admin)
    }
}
