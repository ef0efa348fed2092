use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Document, KagError};

pub const STATUS_MESSAGE: &str = "statusMessage";

pub fn status_message(document: &Document) -> Option<&str> {
    document.get(STATUS_MESSAGE).and_then(Value::as_str)
}

/// Looks a field up by its JSON key, falling back to the camelCase spelling
/// of a snake_case name (`ban_reason` finds `banReason`).
pub fn lookup<'a>(document: &'a Document, name: &str) -> Result<&'a Value, KagError> {
    document
        .get(name)
        .or_else(|| document.get(&camel_case(name)))
        .ok_or_else(|| KagError::unknown_member(name))
}

pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `None` for the not-found document, otherwise the typed view.
pub fn typed<T: DeserializeOwned>(
    document: &Document,
    type_name: &'static str,
) -> Result<Option<T>, KagError> {
    if status_message(document).is_some() {
        return Ok(None);
    }
    serde_json::from_value(Value::Object(document.clone()))
        .map(Some)
        .map_err(|source| KagError::Deserialization { type_name, source })
}
