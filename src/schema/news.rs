//! News articles.
//!
//! The admin listing is newest-id first. The public page re-sorts by the
//! parsed publication date, newest first, and offers category and text
//! filtering over the result.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

use super::{Domain, IdOrder, RecordFields, SchemaError, filled, flag_str, join_list, split_list};

pub const DEFAULT_TITLE: &str = "Novo Artigo";
pub const DEFAULT_EXCERPT: &str = "Resumo do artigo será exibido aqui.";
pub const DEFAULT_CONTENT: &str = "Conteúdo completo do artigo...";
pub const DEFAULT_AUTHOR: &str = "Equipa Mil Vendas";
pub const DEFAULT_READ_TIME: &str = "5 min";
pub const DEFAULT_CATEGORY: &str = "Tecnologia";
pub const DEFAULT_TAGS: &str = "Tecnologia,Inovação";
pub const STOCK_IMAGE: &str =
    "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80";

const NEW_EXCERPT: &str = "Resumo do artigo. Edite este texto para descrever seu conteúdo.";
const NEW_CONTENT: &str = "Conteúdo completo do artigo...\n\nAdicione parágrafos separados por linhas.\n\nUse este espaço para escrever conteúdo detalhado.";

/// Public page size.
pub const PAGE_SIZE: usize = 12;
pub const FEATURED_LIMIT: usize = 2;
pub const TAG_CLOUD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    #[serde(default)]
    pub id: u32,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub date: String,
    pub read_time: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsDraft {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub read_time: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub featured: bool,
}

pub struct NewsSchema;

impl Domain for NewsSchema {
    const PREFIX: &'static str = "news";
    const MAX_ID: u32 = 20;
    const FIELDS: &'static [&'static str] = &[
        "title",
        "excerpt",
        "content",
        "author",
        "date",
        "read_time",
        "category",
        "tags",
        "image",
        "featured",
    ];
    const ADMIN_ORDER: IdOrder = IdOrder::Descending;

    type Record = NewsRecord;
    type Draft = NewsDraft;

    fn is_present(fields: &RecordFields<'_>) -> bool {
        fields.is_filled("title") || fields.is_filled("excerpt")
    }

    fn decode(fields: &RecordFields<'_>) -> NewsRecord {
        NewsRecord {
            id: fields.id(),
            title: fields.text("title", DEFAULT_TITLE),
            excerpt: fields.text("excerpt", DEFAULT_EXCERPT),
            content: fields.text("content", DEFAULT_CONTENT),
            author: fields.text("author", DEFAULT_AUTHOR),
            date: fields
                .raw("date")
                .filter(|d| !d.is_empty())
                .map_or_else(today_label, str::to_owned),
            read_time: fields.text("read_time", DEFAULT_READ_TIME),
            category: fields.text("category", DEFAULT_CATEGORY),
            tags: fields.list("tags", DEFAULT_TAGS),
            image: fields.text("image", STOCK_IMAGE),
            featured: fields.flag("featured"),
        }
    }

    fn encode(record: &NewsRecord) -> Vec<(&'static str, String)> {
        vec![
            ("title", record.title.clone()),
            ("excerpt", record.excerpt.clone()),
            ("content", record.content.clone()),
            ("author", record.author.clone()),
            ("date", record.date.clone()),
            ("read_time", record.read_time.clone()),
            ("category", record.category.clone()),
            ("tags", join_list(&record.tags)),
            ("image", record.image.clone()),
            ("featured", flag_str(record.featured)),
        ]
    }

    fn record_id(record: &NewsRecord) -> u32 {
        record.id
    }

    fn with_id(record: NewsRecord, id: u32) -> NewsRecord {
        NewsRecord { id, ..record }
    }

    fn prepare_draft(_id: u32, draft: NewsDraft) -> Result<Vec<(&'static str, String)>, SchemaError> {
        let today = today_label();
        let or = |value: Option<&String>, default: &str| filled(value).unwrap_or(default).to_owned();
        let tags = draft
            .tags
            .map(|items| join_list(&split_list(&items.join(","))))
            .filter(|joined| !joined.is_empty())
            .unwrap_or_else(|| DEFAULT_TAGS.to_owned());

        Ok(vec![
            ("title", filled(draft.title.as_ref()).map_or_else(|| format!("Novo Artigo {today}"), str::to_owned)),
            ("excerpt", or(draft.excerpt.as_ref(), NEW_EXCERPT)),
            ("content", or(draft.content.as_ref(), NEW_CONTENT)),
            ("author", or(draft.author.as_ref(), DEFAULT_AUTHOR)),
            ("date", or(draft.date.as_ref(), &today)),
            ("read_time", or(draft.read_time.as_ref(), DEFAULT_READ_TIME)),
            ("category", or(draft.category.as_ref(), DEFAULT_CATEGORY)),
            ("tags", tags),
            ("image", or(draft.image.as_ref(), STOCK_IMAGE)),
            ("featured", flag_str(draft.featured)),
        ])
    }
}

// =============================================================================
// DATES
// =============================================================================

/// Today as `dd/mm/yyyy`, the format the admin screens write.
#[must_use]
pub fn today_label() -> String {
    let today = time::OffsetDateTime::now_utc().date();
    format_date(today)
}

#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Parse `YYYY-MM-DD` (optionally followed by a time part) or `DD/MM/YYYY`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if let Some(iso) = raw.get(..10) {
        if let Ok(date) = Date::parse(iso, format_description!("[year]-[month]-[day]")) {
            return Some(date);
        }
    }
    Date::parse(raw, format_description!("[day]/[month]/[year]")).ok()
}

/// Newest date first. Unparseable dates keep their relative order after
/// every dated article.
pub fn sort_by_date_desc(items: &mut [NewsRecord]) {
    items.sort_by_cached_key(|item| Reverse(parse_date(&item.date)));
}

// =============================================================================
// PUBLIC PAGE QUERIES
// =============================================================================

/// Keep items in `category` (`None`/`"all"` keeps all) whose title, excerpt,
/// content or tags contain `search`, case-insensitively.
#[must_use]
pub fn filter(items: Vec<NewsRecord>, category: Option<&str>, search: Option<&str>) -> Vec<NewsRecord> {
    let term = search
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    items
        .into_iter()
        .filter(|item| match category {
            None | Some("all") => true,
            Some(category) => item.category == category,
        })
        .filter(|item| term.as_deref().is_none_or(|term| matches_term(item, term)))
        .collect()
}

fn matches_term(item: &NewsRecord, term: &str) -> bool {
    item.title.to_lowercase().contains(term)
        || item.excerpt.to_lowercase().contains(term)
        || item.content.to_lowercase().contains(term)
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn categories(items: &[NewsRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.contains(&item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}

/// First `limit` distinct tags across all items.
#[must_use]
pub fn tag_cloud(items: &[NewsRecord], limit: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for tag in items.iter().flat_map(|item| item.tags.iter()) {
        if seen.len() == limit {
            break;
        }
        if !seen.contains(tag) {
            seen.push(tag.clone());
        }
    }
    seen
}

#[must_use]
pub fn featured(items: &[NewsRecord], limit: usize) -> Vec<NewsRecord> {
    items.iter().filter(|item| item.featured).take(limit).cloned().collect()
}
