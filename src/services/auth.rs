//! Admin auth: credential check against configured values.
//!
//! TRADE-OFFS
//! ==========
//! There is a single admin account whose email and password come from the
//! environment. A successful login only flips `admin_authenticated` in the
//! settings store and records who logged in under `admin_user`; there are no
//! tokens, expiry or lockout.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::SettingsStore;

pub const AUTH_FLAG_KEY: &str = "admin_authenticated";
pub const ADMIN_USER_KEY: &str = "admin_user";

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@milvendas.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Admin account loaded from environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    /// Load from `ADMIN_EMAIL` and `ADMIN_PASSWORD`, each falling back to
    /// the built-in default when unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_owned()),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_owned()),
        }
    }

    fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self { email: DEFAULT_ADMIN_EMAIL.to_owned(), password: DEFAULT_ADMIN_PASSWORD.to_owned() }
    }
}

/// Who is logged in, stored as JSON under `admin_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(rename = "loginTime")]
    pub login_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Check credentials and mark the admin session as authenticated.
///
/// # Errors
///
/// Returns `InvalidCredentials` on any mismatch; the store is left untouched.
pub fn login(
    store: &SettingsStore,
    credentials: &AdminCredentials,
    email: &str,
    password: &str,
) -> Result<AdminUser, AuthError> {
    if !credentials.matches(email, password) {
        warn!(email, "admin login rejected");
        return Err(AuthError::InvalidCredentials);
    }

    let user = AdminUser {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        name: "Administrador".to_owned(),
        role: "admin".to_owned(),
        login_time: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    };

    match serde_json::to_string(&user) {
        Ok(json) => store.set(ADMIN_USER_KEY, json),
        Err(e) => warn!(error = %e, "failed to encode admin user"),
    }
    store.set(AUTH_FLAG_KEY, "true");
    info!(email, "admin logged in");
    Ok(user)
}

/// Clear the authenticated flag and the recorded user.
pub fn logout(store: &SettingsStore) {
    store.remove(AUTH_FLAG_KEY);
    store.remove(ADMIN_USER_KEY);
    info!("admin logged out");
}

#[must_use]
pub fn is_authenticated(store: &SettingsStore) -> bool {
    store.get(AUTH_FLAG_KEY).as_deref() == Some("true")
}

/// The logged-in admin, if the flag is set and `admin_user` decodes.
#[must_use]
pub fn current_user(store: &SettingsStore) -> Option<AdminUser> {
    if !is_authenticated(store) {
        return None;
    }
    let raw = store.get(ADMIN_USER_KEY)?;
    serde_json::from_str(&raw)
        .inspect_err(|e| warn!(error = %e, "stored admin user is not valid JSON"))
        .ok()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
