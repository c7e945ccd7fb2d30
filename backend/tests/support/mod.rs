//! Shared helpers for integration tests.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! small builders live here to avoid copy/paste drift.

use dogspot::domain::classification::Tags;
use dogspot::domain::{ElementType, RawGeoElement};

/// A tagged node at `(lat, lon)`.
pub fn node(id: i64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> RawGeoElement {
    RawGeoElement {
        element_type: ElementType::Node,
        id,
        lat: Some(lat),
        lon: Some(lon),
        center: None,
        tags: tags
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<Tags>(),
    }
}
