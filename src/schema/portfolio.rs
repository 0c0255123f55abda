//! Portfolio: past client projects.

use serde::{Deserialize, Serialize};

use super::{Domain, IdOrder, RecordFields, SchemaError, filled, join_list, split_list};

pub const DEFAULT_TITLE: &str = "Sem título";
pub const DEFAULT_DESCRIPTION: &str = "Sem descrição";
pub const DEFAULT_CATEGORY: &str = "Web Development";
pub const DEFAULT_CLIENT: &str = "Cliente";
pub const DEFAULT_YEAR: &str = "2024";
pub const DEFAULT_TECH: &str = "React,Node.js";
pub const STOCK_IMAGE: &str =
    "https://images.unsplash.com/photo-1551650975-87deedd944c3?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80";

const NEW_DESCRIPTION: &str = "Descrição do novo projeto. Edite este texto.";
const NEW_CLIENT: &str = "Novo Cliente";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    #[serde(default)]
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub client: String,
    pub year: String,
    pub technologies: Vec<String>,
}

/// Admin "add project" request. Blank fields take the new-project template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PortfolioDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub client: Option<String>,
    pub year: Option<String>,
    pub technologies: Option<Vec<String>>,
}

pub struct PortfolioSchema;

impl Domain for PortfolioSchema {
    const PREFIX: &'static str = "portfolio";
    const MAX_ID: u32 = 10;
    const FIELDS: &'static [&'static str] = &["title", "description", "category", "image", "client", "year", "tech"];
    const ADMIN_ORDER: IdOrder = IdOrder::Ascending;

    type Record = PortfolioRecord;
    type Draft = PortfolioDraft;

    fn is_present(fields: &RecordFields<'_>) -> bool {
        fields.is_filled("title")
    }

    fn decode(fields: &RecordFields<'_>) -> PortfolioRecord {
        PortfolioRecord {
            id: fields.id(),
            title: fields.text("title", DEFAULT_TITLE),
            description: fields.text("description", DEFAULT_DESCRIPTION),
            category: fields.text("category", DEFAULT_CATEGORY),
            image: normalize_image(&fields.text("image", STOCK_IMAGE)),
            client: fields.text("client", DEFAULT_CLIENT),
            year: fields.text("year", DEFAULT_YEAR),
            technologies: fields.list("tech", DEFAULT_TECH),
        }
    }

    fn encode(record: &PortfolioRecord) -> Vec<(&'static str, String)> {
        vec![
            ("title", record.title.clone()),
            ("description", record.description.clone()),
            ("category", record.category.clone()),
            ("image", record.image.clone()),
            ("client", record.client.clone()),
            ("year", record.year.clone()),
            ("tech", join_list(&record.technologies)),
        ]
    }

    fn record_id(record: &PortfolioRecord) -> u32 {
        record.id
    }

    fn with_id(record: PortfolioRecord, id: u32) -> PortfolioRecord {
        PortfolioRecord { id, ..record }
    }

    fn prepare_draft(id: u32, draft: PortfolioDraft) -> Result<Vec<(&'static str, String)>, SchemaError> {
        let or = |value: Option<&String>, default: &str| filled(value).unwrap_or(default).to_owned();
        let tech = draft
            .technologies
            .map(|items| join_list(&split_list(&items.join(","))))
            .filter(|joined| !joined.is_empty())
            .unwrap_or_else(|| DEFAULT_TECH.to_owned());

        Ok(vec![
            ("title", filled(draft.title.as_ref()).map_or_else(|| format!("Novo Projeto {id}"), str::to_owned)),
            ("description", or(draft.description.as_ref(), NEW_DESCRIPTION)),
            ("category", or(draft.category.as_ref(), DEFAULT_CATEGORY)),
            ("image", or(draft.image.as_ref(), STOCK_IMAGE)),
            ("client", or(draft.client.as_ref(), NEW_CLIENT)),
            ("year", filled(draft.year.as_ref()).map_or_else(current_year, str::to_owned)),
            ("tech", tech),
        ])
    }
}

/// Inline uploads (`data:image…`, `blob:…`) and absolute URLs pass through;
/// anything else is a stale local path and falls back to the stock image.
#[must_use]
pub fn normalize_image(raw: &str) -> String {
    if raw.starts_with("data:image") || raw.starts_with("blob:") || raw.starts_with("http") {
        raw.to_owned()
    } else {
        STOCK_IMAGE.to_owned()
    }
}

fn current_year() -> String {
    time::OffsetDateTime::now_utc().year().to_string()
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn categories(items: &[PortfolioRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.contains(&item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}

/// Items in `category`; `None` or `"all"` keeps everything.
#[must_use]
pub fn filter_by_category(items: Vec<PortfolioRecord>, category: Option<&str>) -> Vec<PortfolioRecord> {
    match category {
        None | Some("all") => items,
        Some(category) => items.into_iter().filter(|i| i.category == category).collect(),
    }
}
