//! Auth routes: admin login, logout and the guard for admin endpoints.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::services::auth::{self as auth_svc, AdminUser, AuthError};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Admin session check backed by the `admin_authenticated` setting.
/// Use as a handler parameter to require the admin to be logged in.
pub struct AdminGuard {
    /// The recorded `admin_user`, if it decodes.
    pub user: Option<AdminUser>,
}

impl<S> axum::extract::FromRequestParts<S> for AdminGuard
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(_parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        if !auth_svc::is_authenticated(&app_state.store) {
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Self { user: auth_svc::current_user(&app_state.store) })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login`: check credentials and flag the admin as logged in.
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Result<Json<AdminUser>, StatusCode> {
    auth_svc::login(&state.store, &state.credentials, body.email.trim(), &body.password)
        .map(Json)
        .map_err(auth_error_to_status)
}

/// `POST /api/auth/logout`: clear the admin flag.
pub async fn logout(State(state): State<AppState>, _guard: AdminGuard) -> Json<serde_json::Value> {
    auth_svc::logout(&state.store);
    Json(serde_json::json!({ "ok": true }))
}

/// `GET /api/auth/me`: the logged-in admin.
pub async fn me(guard: AdminGuard) -> Result<Json<AdminUser>, StatusCode> {
    guard.user.map(Json).ok_or(StatusCode::UNAUTHORIZED)
}

pub(crate) fn auth_error_to_status(err: AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
