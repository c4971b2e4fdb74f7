//! Named-element overlay
//!
//! An optional list of element names, parallel to a collection's element
//! order, kept in the structure's metadata under [`NAMES_KEY`]. Nothing is
//! stored until names are first assigned; after that every mutation that
//! changes the element count updates the list so both lengths agree.

use crate::graph::MetadataLayer;
use serde_json::Value as JsonValue;

pub const NAMES_KEY: &str = "element_names";

pub type Names = Vec<Option<String>>;

pub fn load(metadata: &MetadataLayer) -> Option<Names> {
    metadata.get_typed(NAMES_KEY)
}

pub fn store(metadata: &mut MetadataLayer, names: &[Option<String>]) {
    let encoded: Vec<JsonValue> = names
        .iter()
        .map(|name| name.clone().map_or(JsonValue::Null, JsonValue::String))
        .collect();
    metadata.set(NAMES_KEY, JsonValue::Array(encoded));
}

/// Apply `edit` to the overlay if one exists
pub(crate) fn update(metadata: &mut MetadataLayer, edit: impl FnOnce(&mut Names)) {
    if let Some(mut names) = load(metadata) {
        edit(&mut names);
        store(metadata, &names);
    }
}

/// Position of the first element carrying `name`
pub fn position(metadata: &MetadataLayer, name: &str) -> Option<usize> {
    load(metadata)?
        .iter()
        .position(|candidate| candidate.as_deref() == Some(name))
}

/// Set one name, creating an all-unnamed overlay of length `len` first if
/// needed
pub(crate) fn assign(metadata: &mut MetadataLayer, len: usize, index: usize, name: Option<String>) {
    let mut names = load(metadata).unwrap_or_else(|| vec![None; len]);
    names.resize(len, None);
    if let Some(slot) = names.get_mut(index) {
        *slot = name;
    }
    store(metadata, &names);
}
