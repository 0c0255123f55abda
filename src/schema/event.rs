//! Events: workshops and meetups shown on the public events page.

use serde::{Deserialize, Serialize};

use super::{Domain, IdOrder, RecordFields, SchemaError, filled};

pub const DEFAULT_TITLE: &str = "Novo Evento";
pub const DEFAULT_SCHEDULE: &str = "A definir";
pub const DEFAULT_DESCRIPTION: &str = "Descrição do evento";
pub const DEFAULT_PARTICIPANTS: &str = "50+";

// Public events page wording for blank fields.
pub const PUBLIC_DATE: &str = "Em breve";
pub const PUBLIC_LOCATION: &str = "Luanda";
pub const PUBLIC_DESCRIPTION: &str = "Descrição do evento será adicionada em breve.";

/// Head count used when `participants` has no leading positive number.
pub const FALLBACK_PARTICIPANTS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub id: u32,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub participants: String,
}

/// Admin "add event" form. Title and date are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventDraft {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub participants: Option<String>,
}

pub struct EventSchema;

impl Domain for EventSchema {
    const PREFIX: &'static str = "event";
    const MAX_ID: u32 = 10;
    const FIELDS: &'static [&'static str] = &["title", "date", "time", "location", "description", "participants"];
    const ADMIN_ORDER: IdOrder = IdOrder::Ascending;

    type Record = EventRecord;
    type Draft = EventDraft;

    fn is_present(fields: &RecordFields<'_>) -> bool {
        fields.is_filled("title")
    }

    fn decode(fields: &RecordFields<'_>) -> EventRecord {
        EventRecord {
            id: fields.id(),
            title: fields.text("title", DEFAULT_TITLE),
            date: fields.text("date", DEFAULT_SCHEDULE),
            time: fields.text("time", DEFAULT_SCHEDULE),
            location: fields.text("location", DEFAULT_SCHEDULE),
            description: fields.text("description", DEFAULT_DESCRIPTION),
            participants: fields.text("participants", DEFAULT_PARTICIPANTS),
        }
    }

    fn encode(record: &EventRecord) -> Vec<(&'static str, String)> {
        vec![
            ("title", record.title.clone()),
            ("date", record.date.clone()),
            ("time", record.time.clone()),
            ("location", record.location.clone()),
            ("description", record.description.clone()),
            ("participants", record.participants.clone()),
        ]
    }

    fn record_id(record: &EventRecord) -> u32 {
        record.id
    }

    fn with_id(record: EventRecord, id: u32) -> EventRecord {
        EventRecord { id, ..record }
    }

    fn prepare_draft(_id: u32, draft: EventDraft) -> Result<Vec<(&'static str, String)>, SchemaError> {
        let title = filled(draft.title.as_ref()).ok_or(SchemaError::MissingField("title"))?;
        let date = filled(draft.date.as_ref()).ok_or(SchemaError::MissingField("date"))?;
        let or = |value: Option<&String>, default: &str| filled(value).unwrap_or(default).to_owned();

        Ok(vec![
            ("title", title.to_owned()),
            ("date", date.to_owned()),
            ("time", or(draft.time.as_ref(), DEFAULT_SCHEDULE)),
            ("location", or(draft.location.as_ref(), DEFAULT_SCHEDULE)),
            ("description", or(draft.description.as_ref(), DEFAULT_DESCRIPTION)),
            ("participants", or(draft.participants.as_ref(), DEFAULT_PARTICIPANTS)),
        ])
    }
}

// =============================================================================
// PUBLIC PAGE
// =============================================================================

/// Event as the public page shows it. Presence is unchanged; only the
/// defaults for blank date, location and description differ from the admin
/// preview.
#[must_use]
pub fn decode_public(fields: &RecordFields<'_>) -> EventRecord {
    EventRecord {
        date: fields.text("date", PUBLIC_DATE),
        location: fields.text("location", PUBLIC_LOCATION),
        description: fields.text("description", PUBLIC_DESCRIPTION),
        ..EventSchema::decode(fields)
    }
}

/// Leading number of a participants label (`"200+"` -> 200). Labels without
/// one, or with zero, count as `FALLBACK_PARTICIPANTS`.
#[must_use]
pub fn participant_count(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(FALLBACK_PARTICIPANTS)
}

#[must_use]
pub fn participants_total(events: &[EventRecord]) -> u32 {
    events
        .iter()
        .map(|e| participant_count(&e.participants))
        .fold(0, u32::saturating_add)
}
