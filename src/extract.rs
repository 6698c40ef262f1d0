//! Query extraction from intent slots

use crate::event::{Slot, SkillRequest};

/// Slot names checked before falling back to any filled slot
const QUERY_SLOT_NAMES: [&str; 2] = ["query", "Query"];

/// Pull the user's question out of an intent request
///
/// A slot named `query` (or `Query`) wins when it has a value. Otherwise the
/// first filled slot in the order the platform sent them is used. Returns
/// `None` for non-intent requests and intents with no filled slot.
#[must_use]
pub fn extract_query(request: &SkillRequest) -> Option<&str> {
    let SkillRequest::Intent { slots, .. } = request else {
        return None;
    };

    QUERY_SLOT_NAMES
        .iter()
        .find_map(|name| slots.get(*name).and_then(Slot::non_empty_value))
        .or_else(|| slots.values().find_map(Slot::non_empty_value))
}
