//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public endpoints feed the marketing pages (events, portfolio, news,
//! contacts, sign-up). Everything under `/api/admin` sits behind the
//! `AdminGuard` extractor and drives the preview and edit screens. The three
//! content domains share one set of generic handlers, instantiated per
//! schema in `domain_routes`.

pub mod admin;
pub mod auth;
pub mod content;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::loader::{ListingFor, Listings};
use crate::schema::{Domain, EventSchema, NewsSchema, PortfolioSchema};
use crate::state::AppState;

/// Full API router. `cors_permissive` opens CORS to any origin, which the
/// admin frontend needs when served from a different host.
pub fn app(state: AppState, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/events", get(content::events))
        .route("/api/portfolio", get(content::portfolio))
        .route("/api/news", get(content::news))
        .route("/api/contacts", get(content::contacts))
        .route("/api/subscriptions", post(content::subscribe))
        .route("/api/admin/settings", get(admin::list_settings))
        .route(
            "/api/admin/settings/{key}",
            get(admin::get_setting).put(admin::put_setting),
        )
        .route("/api/admin/dashboard", get(admin::dashboard))
        .route("/api/admin/subscriptions", get(admin::list_subscriptions))
        .route("/api/admin/subscriptions/{id}/read", post(admin::mark_subscription_read))
        .route(
            "/api/admin/subscriptions/{id}",
            delete(admin::delete_subscription),
        )
        .merge(domain_routes::<EventSchema>("events"))
        .merge(domain_routes::<PortfolioSchema>("portfolio"))
        .merge(domain_routes::<NewsSchema>("news"))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Admin list/add/sync/update/delete routes for one content domain.
fn domain_routes<D>(name: &str) -> Router<AppState>
where
    D: Domain,
    Listings: ListingFor<D>,
{
    Router::new()
        .route(
            &format!("/api/admin/{name}"),
            get(admin::list_records::<D>).post(admin::add_record::<D>),
        )
        .route(&format!("/api/admin/{name}/sync"), post(admin::sync_records::<D>))
        .route(
            &format!("/api/admin/{name}/{{id}}"),
            get(admin::get_record::<D>)
                .put(admin::replace_record::<D>)
                .patch(admin::patch_record::<D>)
                .delete(admin::delete_record::<D>),
        )
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
