//! Record writer: the admin-side counterpart of the loader.
//!
//! DESIGN
//! ======
//! Every write goes through the store one key at a time, so each keystroke
//! of a live edit is an independent, observable mutation. New records take
//! `max(present ids) + 1`; ids freed by deleting a lower record are not
//! reclaimed. Validation runs before the first write, so a rejected request
//! leaves the store untouched.
//!
//! Add and delete read the store before writing to it, so each runs inside
//! `SettingsStore::exclusive`: two concurrent adds never pick the same id.

use tracing::info;

use crate::loader;
use crate::schema::{Domain, SchemaError, field_key};
use crate::store::SettingsStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Invalid(#[from] SchemaError),
    #[error("{domain} is full: next id {next_id} exceeds {max}")]
    CapacityExhausted { domain: &'static str, next_id: u32, max: u32 },
    #[error("{domain} record {id} not found")]
    NotFound { domain: &'static str, id: u32 },
}

/// Next id for a new record: highest present id plus one, or 1.
#[must_use]
pub fn next_id<D: Domain>(store: &SettingsStore) -> u32 {
    loader::existing_ids::<D>(&store.snapshot())
        .last()
        .map_or(1, |max| max + 1)
}

/// Validate `draft`, allocate an id and write every field.
///
/// # Errors
///
/// Returns `Invalid` for a draft missing required fields and
/// `CapacityExhausted` when the next id would fall outside the scanned range.
pub fn add_record<D: Domain>(store: &SettingsStore, draft: D::Draft) -> Result<u32, WriteError> {
    let id = store.exclusive(|store| {
        let id = next_id::<D>(store);
        if id > D::MAX_ID {
            return Err(WriteError::CapacityExhausted { domain: D::PREFIX, next_id: id, max: D::MAX_ID });
        }

        let values = D::prepare_draft(id, draft)?;
        write_fields::<D>(store, id, values);
        Ok(id)
    })?;
    info!(domain = D::PREFIX, id, "record added");
    Ok(id)
}

/// Write a single `{prefix}_{id}_{field}` key.
///
/// # Errors
///
/// Returns `Invalid` for an id outside the range or a field the domain does
/// not own.
pub fn update_field<D: Domain>(store: &SettingsStore, id: u32, field: &str, value: &str) -> Result<(), WriteError> {
    let id = D::check_id(id)?;
    let field = D::check_field(field)?;
    store.set(field_key(D::PREFIX, id, field), value);
    Ok(())
}

/// Write every field of `record` under `id`, replacing what was there.
///
/// # Errors
///
/// Returns `Invalid` for an id outside the range.
pub fn update_record<D: Domain>(store: &SettingsStore, id: u32, record: &D::Record) -> Result<(), WriteError> {
    let id = D::check_id(id)?;
    write_fields::<D>(store, id, D::encode(record));
    Ok(())
}

/// Clear every field of `id` to `""`. The loader stops emitting it on the
/// next scan.
///
/// # Errors
///
/// Returns `Invalid` for an id outside the range and `NotFound` when no
/// record is present under `id`.
pub fn delete_record<D: Domain>(store: &SettingsStore, id: u32) -> Result<(), WriteError> {
    let id = D::check_id(id)?;
    store.exclusive(|store| {
        if loader::load_one::<D>(&store.snapshot(), id).is_none() {
            return Err(WriteError::NotFound { domain: D::PREFIX, id });
        }
        store.set_many(D::FIELDS.iter().map(|field| (field_key(D::PREFIX, id, field), "")));
        Ok(())
    })?;
    info!(domain = D::PREFIX, id, "record deleted");
    Ok(())
}

fn write_fields<D: Domain>(store: &SettingsStore, id: u32, values: Vec<(&'static str, String)>) {
    store.set_many(
        values
            .into_iter()
            .map(|(field, value)| (field_key(D::PREFIX, id, field), value)),
    );
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;
