//! Admin routes: settings, content records, dashboard and subscriptions.
//!
//! Every handler takes `AdminGuard`, so an unauthenticated request is
//! rejected before any store access. Record handlers are generic over the
//! content domain and registered once per schema by `routes::domain_routes`.

use std::collections::{BTreeMap, HashMap};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::loader::{self, ListingFor, Listings};
use crate::routes::auth::AdminGuard;
use crate::schema::{Domain, FieldKey, SchemaError};
use crate::services::auth::{ADMIN_USER_KEY, AUTH_FLAG_KEY};
use crate::services::subscriptions::{Subscription, SubscriptionError};
use crate::state::AppState;
use crate::writer::{self, WriteError};

/// Subscriptions shown on the dashboard.
const DASHBOARD_RECENT: usize = 5;

// =============================================================================
// SETTINGS
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingBody {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
}

/// `GET /api/admin/settings`: every key, sorted.
pub async fn list_settings(State(state): State<AppState>, _guard: AdminGuard) -> Json<BTreeMap<String, String>> {
    Json(state.store.snapshot().into_iter().collect())
}

/// `GET /api/admin/settings/:key`
pub async fn get_setting(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(key): Path<String>,
) -> Result<Json<SettingResponse>, StatusCode> {
    let value = state.store.get(&key).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(SettingResponse { key, value }))
}

/// `PUT /api/admin/settings/:key`: write one key. Composite content keys
/// must name a field and id their domain owns.
pub async fn put_setting(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(key): Path<String>,
    Json(body): Json<SettingBody>,
) -> Result<Json<SettingResponse>, StatusCode> {
    if key.is_empty() || key == AUTH_FLAG_KEY || key == ADMIN_USER_KEY {
        return Err(StatusCode::BAD_REQUEST);
    }
    if let Some(field_key) = FieldKey::parse(&key) {
        field_key.validate().map_err(schema_error_to_status)?;
    }

    state.store.set(key.clone(), body.value.clone());
    Ok(Json(SettingResponse { key, value: body.value }))
}

// =============================================================================
// CONTENT RECORDS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct RecordList<T> {
    pub count: usize,
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for RecordList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { count: items.len(), items }
    }
}

/// `GET /api/admin/:domain`: preview listing in admin order.
pub async fn list_records<D>(State(state): State<AppState>, _guard: AdminGuard) -> Json<RecordList<D::Record>>
where
    D: Domain,
    Listings: ListingFor<D>,
{
    Json(state.listings.get::<D>().records().into())
}

/// `GET /api/admin/:domain/:id`
pub async fn get_record<D: Domain>(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(id): Path<u32>,
) -> Result<Json<D::Record>, StatusCode> {
    loader::load_one::<D>(&state.store.snapshot(), id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `POST /api/admin/:domain`: add a record at the next free id.
pub async fn add_record<D: Domain>(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Json(draft): Json<D::Draft>,
) -> Result<(StatusCode, Json<D::Record>), StatusCode> {
    let id = writer::add_record::<D>(&state.store, draft).map_err(write_error_to_status)?;
    let record = loader::load_one::<D>(&state.store.snapshot(), id).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/admin/:domain/:id`: overwrite every field of a record.
pub async fn replace_record<D: Domain>(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(id): Path<u32>,
    Json(record): Json<D::Record>,
) -> Result<Json<D::Record>, StatusCode> {
    let record = D::with_id(record, id);
    writer::update_record::<D>(&state.store, id, &record).map_err(write_error_to_status)?;
    Ok(Json(record))
}

#[derive(Debug, Serialize)]
pub struct PatchResponse {
    pub id: u32,
    pub updated: usize,
}

/// `PATCH /api/admin/:domain/:id`: live edit of individual fields, given as
/// a `{ field: value }` map. Every field name is checked before the first
/// write.
pub async fn patch_record<D: Domain>(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(id): Path<u32>,
    Json(fields): Json<HashMap<String, String>>,
) -> Result<Json<PatchResponse>, StatusCode> {
    D::check_id(id).map_err(schema_error_to_status)?;
    for field in fields.keys() {
        D::check_field(field).map_err(schema_error_to_status)?;
    }

    for (field, value) in &fields {
        writer::update_field::<D>(&state.store, id, field, value).map_err(write_error_to_status)?;
    }
    Ok(Json(PatchResponse { id, updated: fields.len() }))
}

/// `DELETE /api/admin/:domain/:id`
pub async fn delete_record<D: Domain>(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    writer::delete_record::<D>(&state.store, id).map_err(write_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/admin/:domain/sync`: simulated publish: wait, then hand back
/// the current listing.
pub async fn sync_records<D>(State(state): State<AppState>, _guard: AdminGuard) -> Json<RecordList<D::Record>>
where
    D: Domain,
    Listings: ListingFor<D>,
{
    tokio::time::sleep(state.sync_delay).await;
    let listing = state.listings.get::<D>();
    let items = listing.records();
    tracing::info!(domain = D::PREFIX, count = items.len(), revision = listing.revision(), "sync completed");
    Json(items.into())
}

// =============================================================================
// DASHBOARD & SUBSCRIPTIONS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub unread: usize,
    pub total: usize,
    pub recent: Vec<Subscription>,
    pub events: usize,
    pub portfolio: usize,
    pub news: usize,
}

/// `GET /api/admin/dashboard`
pub async fn dashboard(State(state): State<AppState>, _guard: AdminGuard) -> Json<Dashboard> {
    let log = &state.subscriptions;
    Json(Dashboard {
        unread: log.unread_count(),
        total: log.len(),
        recent: log.recent(DASHBOARD_RECENT),
        events: state.listings.events.len(),
        portfolio: state.listings.portfolio.len(),
        news: state.listings.news.len(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub limit: Option<usize>,
}

/// `GET /api/admin/subscriptions?limit=`
pub async fn list_subscriptions(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Query(query): Query<SubscriptionsQuery>,
) -> Json<Vec<Subscription>> {
    Json(match query.limit {
        Some(limit) => state.subscriptions.recent(limit),
        None => state.subscriptions.list(),
    })
}

/// `POST /api/admin/subscriptions/:id/read`
pub async fn mark_subscription_read(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.subscriptions.mark_as_read(id).map_err(subscription_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `DELETE /api/admin/subscriptions/:id`
pub async fn delete_subscription(
    State(state): State<AppState>,
    _guard: AdminGuard,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state
        .subscriptions
        .delete_subscription(id)
        .map_err(subscription_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

pub(crate) fn schema_error_to_status(err: SchemaError) -> StatusCode {
    match err {
        SchemaError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SchemaError::UnknownField { .. } | SchemaError::IdOutOfRange { .. } => StatusCode::BAD_REQUEST,
    }
}

pub(crate) fn write_error_to_status(err: WriteError) -> StatusCode {
    match err {
        WriteError::Invalid(e) => schema_error_to_status(e),
        WriteError::CapacityExhausted { .. } => StatusCode::CONFLICT,
        WriteError::NotFound { .. } => StatusCode::NOT_FOUND,
    }
}

pub(crate) fn subscription_error_to_status(err: SubscriptionError) -> StatusCode {
    match err {
        SubscriptionError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubscriptionError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
