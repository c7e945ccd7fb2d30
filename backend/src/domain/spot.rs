//! Raw geodata elements and the normalised spots built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::classification::{Tags, classify};

/// Display name used when an element carries no usable name tag.
pub const UNKNOWN_NAME: &str = "名称不明";

const ADDRESS_PARTS: [&str; 5] = [
    "addr:province",
    "addr:city",
    "addr:quarter",
    "addr:street",
    "addr:housenumber",
];

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Point element with direct coordinates.
    Node,
    /// Polyline or polygon; coordinates come from a server-side centroid.
    Way,
    /// Grouping of other elements; coordinates come from a centroid.
    Relation,
}

impl ElementType {
    /// Wire name used in spot identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            other => Err(format!("unsupported element type `{other}`")),
        }
    }
}

/// Latitude/longitude pair as returned by the geodata service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in WGS84.
    pub lat: f64,
    /// Longitude in WGS84.
    pub lon: f64,
}

/// One element returned by the geodata service, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGeoElement {
    /// Element kind.
    pub element_type: ElementType,
    /// Numeric OSM identifier.
    pub id: i64,
    /// Direct latitude (nodes).
    pub lat: Option<f64>,
    /// Direct longitude (nodes).
    pub lon: Option<f64>,
    /// Precomputed centroid (ways and relations).
    pub center: Option<Coordinate>,
    /// Raw tags.
    pub tags: Tags,
}

impl RawGeoElement {
    /// Coordinate used for the marker: direct for nodes, centroid otherwise.
    ///
    /// Non-finite values count as missing.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let coordinate = match self.element_type {
            ElementType::Node => match (self.lat, self.lon) {
                (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }),
                _ => None,
            },
            ElementType::Way | ElementType::Relation => self.center,
        }?;
        (coordinate.lat.is_finite() && coordinate.lon.is_finite()).then_some(coordinate)
    }

    /// Stable external identifier, `"<type>/<id>"`.
    #[must_use]
    pub fn spot_id(&self) -> String {
        format!("{}/{}", self.element_type, self.id)
    }
}

/// A classified place shown on the map.
///
/// ## Invariants
/// - `category` is always one of the seven known categories; elements that
///   fail classification never become a `Spot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    /// `"<type>/<numeric id>"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Assigned category.
    pub category: Category,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Website URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// OSM `opening_hours` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    /// Original tags, kept for display extensions.
    #[serde(default)]
    pub tags: Tags,
}

impl Spot {
    /// Classify `element` and build a spot from it.
    ///
    /// Returns `None` when the element matches no category or has no usable
    /// coordinate.
    #[must_use]
    pub fn from_element(element: RawGeoElement) -> Option<Self> {
        let category = classify(&element.tags)?;
        Self::from_classified(element, category)
    }

    /// Build a spot for an element whose category is already known.
    #[must_use]
    pub fn from_classified(element: RawGeoElement, category: Category) -> Option<Self> {
        let coordinate = element.coordinate()?;
        let id = element.spot_id();
        let tags = element.tags;

        Some(Self {
            id,
            name: display_name(&tags),
            category,
            lat: coordinate.lat,
            lng: coordinate.lon,
            address: address(&tags),
            phone: first_tag(&tags, &["contact:phone", "phone"]),
            website: first_tag(&tags, &["contact:website", "website"]),
            opening_hours: first_tag(&tags, &["opening_hours"]),
            tags,
        })
    }
}

/// A spot saved by the user, with the time it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteSpot {
    /// The saved spot.
    #[serde(flatten)]
    pub spot: Spot,
    /// Milliseconds since the Unix epoch.
    pub saved_at: i64,
}

fn first_tag(tags: &Tags, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| tags.get(*key).cloned())
}

fn display_name(tags: &Tags) -> String {
    first_tag(tags, &["name", "name:ja", "brand"]).unwrap_or_else(|| UNKNOWN_NAME.to_owned())
}

fn address(tags: &Tags) -> Option<String> {
    if let Some(full) = tags.get("addr:full") {
        return Some(full.clone());
    }
    let joined: String = ADDRESS_PARTS
        .iter()
        .filter_map(|key| tags.get(*key))
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect();
    (!joined.is_empty()).then_some(joined)
}
