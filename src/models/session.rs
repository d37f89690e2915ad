//! Session snapshot types owned by the session provider.

use serde::{Deserialize, Serialize};

/// Resolved identity of the SSO user, built from the provider profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoUser {
    pub id: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

impl SsoUser {
    pub fn new(id: String, email: String, first_name: String, last_name: String) -> Self {
        let full_name = format!("{} {}", first_name, last_name);
        Self {
            id,
            email,
            first_name,
            last_name,
            full_name,
        }
    }
}

/// Read-only view of the authentication state.
///
/// Owned exclusively by the `SessionProvider`; everything else sees clones.
/// `authenticated` without a `user` is a sanctioned degraded state (the
/// provider session exists but the profile fetch failed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<SsoUser>,
    pub sso_enabled: bool,
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            authenticated: false,
            user: None,
            sso_enabled: false,
            loading: true,
        }
    }
}

impl Session {
    /// Display name for the signed-in SSO user, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.full_name.as_str())
    }
}
