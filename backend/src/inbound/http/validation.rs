//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query parameters arrive as raw strings so that missing or malformed values
//! surface as structured `invalid_request` payloads rather than Actix's plain
//! text extractor errors.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde_json::json;

use crate::domain::{BoundingBox, BoundingBoxError, ElementType, Error, LatLng};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    InvalidCoordinate,
    InvalidBoundingBox,
    InvalidElementType,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidNumber => "invalid_number",
            Self::InvalidCoordinate => "invalid_coordinate",
            Self::InvalidBoundingBox => "invalid_bounding_box",
            Self::InvalidElementType => "invalid_element_type",
            Self::InvalidBody => "invalid_body",
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

    fn as_str(self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a finite number"))
        .with_value(ErrorCode::InvalidNumber, value)
}

/// Parse a required finite decimal parameter.
pub(crate) fn parse_number(value: Option<&str>, field: FieldName) -> Result<f64, Error> {
    let raw = value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| missing_field_error(field))?;
    raw.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| invalid_number_error(field, raw))
}

/// Validate that a parsed point lies within WGS84 ranges.
pub(crate) fn parse_lat_lng(
    lat: Option<&str>,
    lng: Option<&str>,
    fields: (FieldName, FieldName),
) -> Result<LatLng, Error> {
    let (lat_field, lng_field) = fields;
    let lat_value = parse_number(lat, lat_field)?;
    let lng_value = parse_number(lng, lng_field)?;
    if !(-90.0..=90.0).contains(&lat_value) {
        return Err(ValidationError::new(
            lat_field.as_str(),
            format!("{} must be within [-90, 90]", lat_field.as_str()),
        )
        .with_value(ErrorCode::InvalidCoordinate, lat_value.to_string()));
    }
    if !(-180.0..=180.0).contains(&lng_value) {
        return Err(ValidationError::new(
            lng_field.as_str(),
            format!("{} must be within [-180, 180]", lng_field.as_str()),
        )
        .with_value(ErrorCode::InvalidCoordinate, lng_value.to_string()));
    }
    Ok(LatLng::new(lat_value, lng_value))
}

/// Parse the four edges of a viewport and validate their geometry.
pub(crate) fn parse_bounding_box(
    south: Option<&str>,
    west: Option<&str>,
    north: Option<&str>,
    east: Option<&str>,
) -> Result<BoundingBox, Error> {
    let south = parse_number(south, FieldName::new("south"))?;
    let west = parse_number(west, FieldName::new("west"))?;
    let north = parse_number(north, FieldName::new("north"))?;
    let east = parse_number(east, FieldName::new("east"))?;
    BoundingBox::try_new(south, west, north, east).map_err(|err| bounding_box_error(&err))
}

pub(crate) fn bounding_box_error(err: &BoundingBoxError) -> Error {
    ValidationError::new("bbox", err.to_string()).with_code(ErrorCode::InvalidBoundingBox)
}

pub(crate) fn parse_element_type(value: &str, field: FieldName) -> Result<ElementType, Error> {
    value.parse::<ElementType>().map_err(|_| {
        ValidationError::new(
            field.as_str(),
            format!("{} must be node, way or relation", field.as_str()),
        )
        .with_value(ErrorCode::InvalidElementType, value)
    })
}

/// Map JSON body extraction failures to `invalid_request` payloads.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ValidationError::new("body", err.to_string())
        .with_code(ErrorCode::InvalidBody)
        .into()
}

/// JSON extractor configuration shared by every body-accepting handler.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;

    fn detail_code(error: &Error) -> Option<&str> {
        error.details()?.get("code")?.as_str()
    }

    #[rstest]
    #[case(None, "missing_field")]
    #[case(Some(""), "missing_field")]
    #[case(Some("abc"), "invalid_number")]
    #[case(Some("NaN"), "invalid_number")]
    #[case(Some("inf"), "invalid_number")]
    fn rejects_bad_numbers(#[case] raw: Option<&str>, #[case] expected: &str) {
        let error = parse_number(raw, FieldName::new("south")).expect_err("invalid");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(detail_code(&error), Some(expected));
    }

    #[test]
    fn accepts_reference_box() {
        let bbox = parse_bounding_box(Some("35.0"), Some("139.0"), Some("35.5"), Some("139.5"))
            .expect("valid box");
        assert_eq!(bbox, BoundingBox::new(35.0, 139.0, 35.5, 139.5));
    }

    #[test]
    fn inverted_box_is_invalid_request() {
        let error = parse_bounding_box(Some("35.5"), Some("139.0"), Some("35.0"), Some("139.5"))
            .expect_err("inverted");
        assert_eq!(detail_code(&error), Some("invalid_bounding_box"));
    }

    #[rstest]
    #[case("91", "139")]
    #[case("35", "-181")]
    fn out_of_range_points_are_rejected(#[case] lat: &str, #[case] lng: &str) {
        let error = parse_lat_lng(
            Some(lat),
            Some(lng),
            (FieldName::new("fromLat"), FieldName::new("fromLng")),
        )
        .expect_err("out of range");
        assert_eq!(detail_code(&error), Some("invalid_coordinate"));
    }

    #[rstest]
    #[case("node", Some(ElementType::Node))]
    #[case("relation", Some(ElementType::Relation))]
    #[case("area", None)]
    fn parses_element_types(#[case] raw: &str, #[case] expected: Option<ElementType>) {
        assert_eq!(parse_element_type(raw, FieldName::new("type")).ok(), expected);
    }
}
