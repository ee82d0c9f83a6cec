//! Storage encoding of the bye list.
//!
//! The `leagues.playoff_bye_teams` column holds a JSON array of team ids.
//! Nothing outside this module sees the encoded form.

use thiserror::Error;

use crate::league::models::ByeList;

/// The stored bye list could not be read
#[derive(Debug, Error)]
pub enum ByeListError {
    #[error("Malformed bye list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encode for storage. An empty list is stored as `NULL`.
pub fn encode(list: &ByeList) -> Result<Option<String>, ByeListError> {
    if list.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(list)?))
}

/// Decode a stored value. `NULL` and blank values are an empty list.
pub fn decode(stored: Option<&str>) -> Result<ByeList, ByeListError> {
    match stored.map(str::trim) {
        None | Some("") => Ok(ByeList::new()),
        Some(json) => Ok(serde_json::from_str(json)?),
    }
}
