//! Geographic bounding box describing a map viewport.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest viewport span, in degrees, for which spots are fetched.
pub const DEFAULT_MAX_SPAN_DEGREES: f64 = 0.5;

/// Rectangular latitude/longitude region in WGS84 degrees.
///
/// ## Invariants
/// - `south < north` and `west < east` once built through
///   [`BoundingBox::try_new`] or [`FromStr`]. [`BoundingBox::new`] does not
///   check them, so the query builder and span checks accept whatever the
///   caller provides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern latitude edge.
    pub south: f64,
    /// Western longitude edge.
    pub west: f64,
    /// Northern latitude edge.
    pub north: f64,
    /// Eastern longitude edge.
    pub east: f64,
}

/// Validation failures when building a [`BoundingBox`] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundingBoxError {
    /// The textual form did not hold exactly four values.
    #[error("bounding box must contain exactly four comma-separated values, found {found}")]
    WrongArity {
        /// Number of values supplied.
        found: usize,
    },
    /// One of the values was not a number.
    #[error("bounding box value `{value}` is not a number")]
    InvalidNumber {
        /// Offending raw value.
        value: String,
    },
    /// One of the values was NaN or infinite.
    #[error("bounding box must contain finite coordinates")]
    NonFinite,
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("bounding box coordinates are outside WGS84 ranges")]
    OutOfRange,
    /// Edges are inverted or collapsed.
    #[error("bounding box must satisfy south < north and west < east")]
    Inverted,
}

impl BoundingBox {
    /// Build a box without validation.
    #[must_use]
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Build a box, rejecting non-finite, out-of-range or inverted edges.
    ///
    /// # Errors
    ///
    /// Returns [`BoundingBoxError`] describing the first violated invariant.
    ///
    /// # Examples
    /// ```
    /// use dogspot::domain::BoundingBox;
    ///
    /// assert!(BoundingBox::try_new(35.0, 139.0, 35.5, 139.5).is_ok());
    /// assert!(BoundingBox::try_new(35.5, 139.0, 35.0, 139.5).is_err());
    /// ```
    pub fn try_new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundingBoxError> {
        if [south, west, north, east]
            .into_iter()
            .any(|value| !value.is_finite())
        {
            return Err(BoundingBoxError::NonFinite);
        }
        let latitudes_ok = [south, north]
            .into_iter()
            .all(|value| (-90.0..=90.0).contains(&value));
        let longitudes_ok = [west, east]
            .into_iter()
            .all(|value| (-180.0..=180.0).contains(&value));
        if !latitudes_ok || !longitudes_ok {
            return Err(BoundingBoxError::OutOfRange);
        }
        if south >= north || west >= east {
            return Err(BoundingBoxError::Inverted);
        }
        Ok(Self::new(south, west, north, east))
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Whether either span is strictly greater than `max_span_degrees`.
    ///
    /// A span equal to the limit is accepted.
    #[must_use]
    pub fn exceeds_span(&self, max_span_degrees: f64) -> bool {
        self.lat_span() > max_span_degrees || self.lng_span() > max_span_degrees
    }

    /// Overpass bbox filter body in `south,west,north,east` order.
    #[must_use]
    pub fn overpass_filter(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.overpass_filter())
    }
}

impl FromStr for BoundingBox {
    type Err = BoundingBoxError;

    /// Parse the `south,west,north,east` form used by the CLI and query
    /// strings.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let &[south, west, north, east] = parts.as_slice() else {
            return Err(BoundingBoxError::WrongArity { found: parts.len() });
        };
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| BoundingBoxError::InvalidNumber {
                    value: value.to_owned(),
                })
        };
        Self::try_new(parse(south)?, parse(west)?, parse(north)?, parse(east)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn span_equal_to_limit_is_accepted() {
        let bbox = BoundingBox::new(35.0, 139.0, 35.5, 139.5);
        assert!(!bbox.exceeds_span(DEFAULT_MAX_SPAN_DEGREES));
    }

    #[rstest]
    #[case::tall(BoundingBox::new(35.0, 139.0, 35.6, 139.1))]
    #[case::wide(BoundingBox::new(35.0, 139.0, 35.1, 139.51))]
    fn span_over_limit_is_rejected(#[case] bbox: BoundingBox) {
        assert!(bbox.exceeds_span(DEFAULT_MAX_SPAN_DEGREES));
    }

    #[test]
    fn overpass_filter_uses_south_west_north_east_order() {
        let bbox = BoundingBox::new(35.0, 139.0, 35.5, 139.5);
        assert_eq!(bbox.overpass_filter(), "35,139,35.5,139.5");
    }

    #[test]
    fn parses_comma_separated_form() {
        let bbox: BoundingBox = " 35.6, 139.7 ,35.7,139.8".parse().expect("valid bbox");
        assert_eq!(bbox, BoundingBox::new(35.6, 139.7, 35.7, 139.8));
    }

    #[rstest]
    #[case("35.6,139.7,35.7", BoundingBoxError::WrongArity { found: 3 })]
    #[case("35.6,east,35.7,139.8", BoundingBoxError::InvalidNumber { value: "east".to_owned() })]
    #[case("NaN,139.7,35.7,139.8", BoundingBoxError::NonFinite)]
    #[case("35.6,190,35.7,191", BoundingBoxError::OutOfRange)]
    #[case("35.7,139.7,35.6,139.8", BoundingBoxError::Inverted)]
    #[case("35.6,139.7,35.6,139.8", BoundingBoxError::Inverted)]
    fn rejects_malformed_boxes(#[case] raw: &str, #[case] expected: BoundingBoxError) {
        assert_eq!(raw.parse::<BoundingBox>(), Err(expected));
    }
}
