//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, InvalidId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    MissingField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::MissingField => "missing_field",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

/// Parse a path segment into one of the integer id newtypes.
pub(crate) fn parse_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = InvalidId>,
{
    raw.parse().map_err(|err: InvalidId| {
        let name = field.as_str();
        ValidationError::new(field, format!("{name} must be a positive integer"))
            .with_value(ErrorCode::InvalidId, err.raw())
    })
}

/// Lenient numeric query parameter: absent, blank or unparsable values are
/// treated as not supplied.
pub(crate) fn lenient_number<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
}

/// Blank text filters are treated as not supplied.
pub(crate) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarId, ErrorCode as DomainCode};
    use rstest::rstest;

    const CAR_ID: FieldName = FieldName::new("carId");

    #[rstest]
    fn positive_ids_parse() {
        let id: CarId = parse_id("42", CAR_ID).expect("valid id");
        assert_eq!(id, CarId::new(42));
    }

    #[rstest]
    #[case("abc")]
    #[case("0")]
    #[case("-3")]
    #[case("4.5")]
    fn malformed_ids_are_validation_errors(#[case] raw: &str) {
        let err = parse_id::<CarId>(raw, CAR_ID).expect_err("invalid id");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "carId");
        assert_eq!(details["code"], "invalid_id");
        assert_eq!(details["value"], raw);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("cheap"), None)]
    #[case(Some(" 15000 "), Some(15_000))]
    fn lenient_numbers_ignore_garbage(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
        assert_eq!(lenient_number::<i64>(raw), expected);
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = missing_field_error(FieldName::new("images"));
        assert_eq!(err.message(), "missing required field: images");
        assert_eq!(err.details().expect("details")["code"], "missing_field");
    }
}
