//! DTOs for decoding Overpass JSON responses.
//!
//! Elements of an unknown type are skipped rather than failing the whole
//! response; coordinate checks are left to the domain. A body without an
//! `elements` array is a decode failure.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::domain::spot::{Coordinate, ElementType, RawGeoElement};

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lat: Option<f64>,
    pub(super) lon: Option<f64>,
    pub(super) center: Option<OverpassCenterDto>,
    #[serde(default)]
    pub(super) tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassCenterDto {
    pub(super) lat: f64,
    pub(super) lon: f64,
}

impl OverpassResponseDto {
    pub(super) fn into_raw_elements(self) -> Vec<RawGeoElement> {
        self.elements
            .into_iter()
            .filter_map(OverpassElementDto::into_raw_element)
            .collect()
    }
}

impl OverpassElementDto {
    fn into_raw_element(self) -> Option<RawGeoElement> {
        let element_type = match self.element_type.parse::<ElementType>() {
            Ok(element_type) => element_type,
            Err(reason) => {
                debug!(id = self.id, %reason, "skipping Overpass element");
                return None;
            }
        };
        Some(RawGeoElement {
            element_type,
            id: self.id,
            lat: self.lat,
            lon: self.lon,
            center: self.center.map(|center| Coordinate {
                lat: center.lat,
                lon: center.lon,
            }),
            tags: self.tags,
        })
    }
}
