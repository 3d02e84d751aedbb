//! Field-level validation helpers shared by the domain constructors.

use serde_json::json;

use super::Error;

/// Build an `invalid_request` error naming the offending field.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Trim `value` and reject it when nothing remains.
pub(crate) fn non_empty(field: &str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field_error(field, "empty", format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}
