//! Public content routes: the data behind the marketing pages.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::loader;
use crate::routes::admin::subscription_error_to_status;
use crate::schema::{
    EventRecord, NewsRecord, PortfolioRecord, event as event_schema, news as news_schema, portfolio as portfolio_schema,
};
use crate::services::contacts::ContactInfo;
use crate::services::subscriptions::NewSubscription;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EventsPage {
    /// Number of events listed.
    pub active: usize,
    pub participants_total: u32,
    pub items: Vec<EventRecord>,
}

/// `GET /api/events`: newest event first, with the page's summary counts.
pub async fn events(State(state): State<AppState>) -> Json<EventsPage> {
    let items = loader::public_events(&state.store.snapshot());
    Json(EventsPage {
        active: items.len(),
        participants_total: event_schema::participants_total(&items),
        items,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PortfolioPage {
    /// Categories across every project, not just the filtered ones.
    pub categories: Vec<String>,
    pub items: Vec<PortfolioRecord>,
}

/// `GET /api/portfolio?category=`: projects, optionally by category.
pub async fn portfolio(State(state): State<AppState>, Query(query): Query<PortfolioQuery>) -> Json<PortfolioPage> {
    let all = state.listings.portfolio.records();
    let categories = portfolio_schema::categories(&all);
    let items = portfolio_schema::filter_by_category(all, query.category.as_deref());
    Json(PortfolioPage { categories, items })
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NewsPage {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub featured: Vec<NewsRecord>,
    /// Matches before paging.
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub items: Vec<NewsRecord>,
}

/// `GET /api/news?category=&q=&page=`: articles newest first, paged.
pub async fn news(State(state): State<AppState>, Query(query): Query<NewsQuery>) -> Json<NewsPage> {
    let all = loader::public_news(&state.listings.news.records());
    let categories = news_schema::categories(&all);
    let tags = news_schema::tag_cloud(&all, news_schema::TAG_CLOUD_LIMIT);
    let featured = news_schema::featured(&all, news_schema::FEATURED_LIMIT);

    let matches = news_schema::filter(all, query.category.as_deref(), query.q.as_deref());
    let total = matches.len();
    let pages = total.div_ceil(news_schema::PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).clamp(1, pages);
    let items = matches
        .into_iter()
        .skip((page - 1) * news_schema::PAGE_SIZE)
        .take(news_schema::PAGE_SIZE)
        .collect();

    Json(NewsPage { categories, tags, featured, total, page, pages, items })
}

/// `GET /api/contacts`
pub async fn contacts(State(state): State<AppState>) -> Json<ContactInfo> {
    Json(state.contacts.as_ref().clone())
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub id: Uuid,
}

/// `POST /api/subscriptions`: public event sign-up.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<NewSubscription>,
) -> Result<(StatusCode, Json<SubscribeResponse>), StatusCode> {
    let id = state
        .subscriptions
        .add_subscription(body)
        .map_err(subscription_error_to_status)?;
    Ok((StatusCode::CREATED, Json(SubscribeResponse { id })))
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
