//! Typed record schema over the flat settings map.
//!
//! DESIGN
//! ======
//! Content records live in the store as `{prefix}_{id}_{field}` keys. Each
//! content domain implements `Domain`, which names its prefix, id range and
//! field set, decides presence, and owns the decode (flat keys -> record) and
//! encode (record -> flat keys) pair. Key assembly happens only here.
//!
//! CODECS
//! ======
//! - list fields: one comma-joined string; decode splits on `,`, trims, and
//!   drops empty segments (order and duplicates kept).
//! - flag fields: the literal `"true"`; anything else, absence included, is false.
//! - text fields: an absent or empty value resolves to the field default.

pub mod event;
pub mod news;
pub mod portfolio;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::Snapshot;

pub use event::{EventDraft, EventRecord, EventSchema};
pub use news::{NewsDraft, NewsRecord, NewsSchema};
pub use portfolio::{PortfolioDraft, PortfolioRecord, PortfolioSchema};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown field '{field}' for {domain}")]
    UnknownField { domain: &'static str, field: String },
    #[error("id {id} outside {domain} range 1..={max}")]
    IdOutOfRange { domain: &'static str, id: u32, max: u32 },
}

// =============================================================================
// DOMAIN CONTRACT
// =============================================================================

/// Order of a domain's admin listing after the id scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOrder {
    Ascending,
    Descending,
}

/// One content domain stored under a shared key prefix.
pub trait Domain: Send + Sync + 'static {
    /// Key prefix, e.g. `event` in `event_3_title`.
    const PREFIX: &'static str;
    /// Highest id the loader scans (inclusive; the lowest is always 1).
    const MAX_ID: u32;
    /// Every field suffix owned by a record.
    const FIELDS: &'static [&'static str];
    const ADMIN_ORDER: IdOrder;

    type Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Draft: DeserializeOwned + Send + 'static;

    fn is_present(fields: &RecordFields<'_>) -> bool;
    fn decode(fields: &RecordFields<'_>) -> Self::Record;
    fn encode(record: &Self::Record) -> Vec<(&'static str, String)>;
    fn record_id(record: &Self::Record) -> u32;
    fn with_id(record: Self::Record, id: u32) -> Self::Record;

    /// Validate a new-item draft and expand it to every field value for `id`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when a required draft field is blank.
    fn prepare_draft(id: u32, draft: Self::Draft) -> Result<Vec<(&'static str, String)>, SchemaError>;

    /// Check that `field` belongs to this domain.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` otherwise.
    fn check_field(field: &str) -> Result<&'static str, SchemaError> {
        Self::FIELDS
            .iter()
            .copied()
            .find(|f| *f == field)
            .ok_or_else(|| SchemaError::UnknownField { domain: Self::PREFIX, field: field.to_owned() })
    }

    /// Check that `id` falls inside the scanned range.
    ///
    /// # Errors
    ///
    /// Returns `IdOutOfRange` otherwise.
    fn check_id(id: u32) -> Result<u32, SchemaError> {
        if (1..=Self::MAX_ID).contains(&id) {
            Ok(id)
        } else {
            Err(SchemaError::IdOutOfRange { domain: Self::PREFIX, id, max: Self::MAX_ID })
        }
    }
}

// =============================================================================
// KEYS
// =============================================================================

#[must_use]
pub fn field_key(prefix: &str, id: u32, field: &str) -> String {
    format!("{prefix}_{id}_{field}")
}

/// Content domains known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Event,
    Portfolio,
    News,
}

impl DomainKind {
    pub const ALL: [Self; 3] = [Self::Event, Self::Portfolio, Self::News];

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Event => EventSchema::PREFIX,
            Self::Portfolio => PortfolioSchema::PREFIX,
            Self::News => NewsSchema::PREFIX,
        }
    }

    #[must_use]
    pub fn max_id(self) -> u32 {
        match self {
            Self::Event => EventSchema::MAX_ID,
            Self::Portfolio => PortfolioSchema::MAX_ID,
            Self::News => NewsSchema::MAX_ID,
        }
    }

    #[must_use]
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Event => EventSchema::FIELDS,
            Self::Portfolio => PortfolioSchema::FIELDS,
            Self::News => NewsSchema::FIELDS,
        }
    }
}

/// A parsed `{domain}_{id}_{field}` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    pub domain: DomainKind,
    pub id: u32,
    pub field: String,
}

impl FieldKey {
    /// Split a composite key. Plain keys (`hero_whatsapp`) yield `None`.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        DomainKind::ALL.into_iter().find_map(|domain| {
            let rest = key.strip_prefix(domain.prefix())?.strip_prefix('_')?;
            let (id, field) = rest.split_once('_')?;
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) || field.is_empty() {
                return None;
            }
            let id = id.parse().ok()?;
            Some(Self { domain, id, field: field.to_owned() })
        })
    }

    /// Reject composite keys whose id or field the domain does not own.
    ///
    /// # Errors
    ///
    /// Returns `IdOutOfRange` or `UnknownField`.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let domain = self.domain;
        if !(1..=domain.max_id()).contains(&self.id) {
            return Err(SchemaError::IdOutOfRange { domain: domain.prefix(), id: self.id, max: domain.max_id() });
        }
        if !domain.fields().contains(&self.field.as_str()) {
            return Err(SchemaError::UnknownField { domain: domain.prefix(), field: self.field.clone() });
        }
        Ok(())
    }
}

// =============================================================================
// FIELD READER
// =============================================================================

/// Read-only view of one record id inside a snapshot.
pub struct RecordFields<'a> {
    snapshot: &'a Snapshot,
    prefix: &'static str,
    id: u32,
}

impl<'a> RecordFields<'a> {
    #[must_use]
    pub fn new(snapshot: &'a Snapshot, prefix: &'static str, id: u32) -> Self {
        Self { snapshot, prefix, id }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Stored value exactly as written, `None` when the key was never set.
    #[must_use]
    pub fn raw(&self, field: &str) -> Option<&'a str> {
        self.snapshot
            .get(&field_key(self.prefix, self.id, field))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_filled(&self, field: &str) -> bool {
        self.raw(field).is_some_and(|v| !v.is_empty())
    }

    #[must_use]
    pub fn text(&self, field: &str, default: &str) -> String {
        match self.raw(field) {
            Some(v) if !v.is_empty() => v.to_owned(),
            _ => default.to_owned(),
        }
    }

    #[must_use]
    pub fn list(&self, field: &str, default: &str) -> Vec<String> {
        split_list(&self.text(field, default))
    }

    #[must_use]
    pub fn flag(&self, field: &str) -> bool {
        parse_flag(self.raw(field))
    }
}

// =============================================================================
// CODECS
// =============================================================================

#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[must_use]
pub fn join_list(items: &[String]) -> String {
    items.join(",")
}

#[must_use]
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[must_use]
pub fn flag_str(value: bool) -> String {
    if value { "true".to_owned() } else { "false".to_owned() }
}

/// Trimmed, non-empty draft value.
pub(crate) fn filled(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
