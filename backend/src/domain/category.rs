//! Static category registry for dog-friendly places.
//!
//! Each [`CategoryRule`] pairs a display label, marker colour and icon with
//! the Overpass clause templates used to fetch candidate elements. The clause
//! templates carry a `(bbox)` placeholder that the query builder substitutes
//! per viewport. Classification of returned elements happens independently in
//! [`crate::domain::classification`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the seven place types the map recognises.
///
/// The serialised form is the stable snake_case identifier shared with the
/// map client and the favorites file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Hotels and ryokan that accept dogs.
    HotelWithDog,
    /// Dog cafés and dog-friendly restaurants.
    DogCafe,
    /// Pet boarding.
    PetHotel,
    /// Pet grooming salons.
    Grooming,
    /// Pet supply shops.
    PetShop,
    /// Off-leash dog parks.
    DogPark,
    /// Veterinary clinics.
    Veterinary,
}

impl Category {
    /// Every category in registry order.
    pub const ALL: [Self; 7] = [
        Self::HotelWithDog,
        Self::DogCafe,
        Self::PetHotel,
        Self::Grooming,
        Self::PetShop,
        Self::DogPark,
        Self::Veterinary,
    ];

    /// Stable wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HotelWithDog => "hotel_with_dog",
            Self::DogCafe => "dog_cafe",
            Self::PetHotel => "pet_hotel",
            Self::Grooming => "grooming",
            Self::PetShop => "pet_shop",
            Self::DogPark => "dog_park",
            Self::Veterinary => "veterinary",
        }
    }

    /// Registry entry for this category.
    #[must_use]
    pub fn rule(self) -> &'static CategoryRule {
        CATEGORY_RULES
            .iter()
            .find(|rule| rule.id == self)
            .unwrap_or(&CATEGORY_RULES[0])
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Immutable registry entry describing how a category is displayed and
/// queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Category identifier.
    pub id: Category,
    /// Display label.
    pub label: &'static str,
    /// Marker background colour as a hex string.
    pub color: &'static str,
    /// Marker icon.
    pub icon: &'static str,
    /// Overpass clause templates, one per line, each containing `(bbox)`.
    pub clauses: &'static str,
}

impl CategoryRule {
    /// Non-empty, whitespace-trimmed clause templates in declaration order.
    pub fn clause_lines(&self) -> impl Iterator<Item = &'static str> {
        self.clauses
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Registry order is significant: it is the order clauses appear in the
/// combined query and the order categories are listed to clients.
pub static CATEGORY_RULES: [CategoryRule; 7] = [
    CategoryRule {
        id: Category::HotelWithDog,
        label: "犬と泊まれるホテル",
        color: "#2563eb",
        icon: "🏨",
        clauses: r#"
            node["tourism"="hotel"]["dog"="yes"](bbox);
            way["tourism"="hotel"]["dog"="yes"](bbox);
            node["tourism"="hotel"]["dog"="allowed"](bbox);
            way["tourism"="hotel"]["dog"="allowed"](bbox);
            node["tourism"="hotel"]["name"~"犬|ペット|DOG|dog",i](bbox);
            way["tourism"="hotel"]["name"~"犬|ペット|DOG|dog",i](bbox);
            node["tourism"="ryokan"]["dog"~"yes|allowed"](bbox);
            way["tourism"="ryokan"]["dog"~"yes|allowed"](bbox);
            node["tourism"="ryokan"]["name"~"犬|ペット|DOG|dog",i](bbox);
            way["tourism"="ryokan"]["name"~"犬|ペット|DOG|dog",i](bbox);
        "#,
    },
    CategoryRule {
        id: Category::DogCafe,
        label: "ドッグカフェ",
        color: "#d97706",
        icon: "☕",
        clauses: r#"
            node["amenity"="cafe"]["dog"="yes"](bbox);
            way["amenity"="cafe"]["dog"="yes"](bbox);
            node["amenity"="cafe"]["dog"="allowed"](bbox);
            way["amenity"="cafe"]["dog"="allowed"](bbox);
            node["amenity"="cafe"]["name"~"ドッグ|DOG|dog|犬",i](bbox);
            way["amenity"="cafe"]["name"~"ドッグ|DOG|dog|犬",i](bbox);
            node["amenity"="restaurant"]["dog"="yes"](bbox);
            way["amenity"="restaurant"]["dog"="yes"](bbox);
        "#,
    },
    CategoryRule {
        id: Category::PetHotel,
        label: "ペットホテル",
        color: "#9333ea",
        icon: "🐾",
        clauses: r#"
            node["amenity"="animal_boarding"](bbox);
            way["amenity"="animal_boarding"](bbox);
            node["shop"~"pet"]["name"~"ペットホテル|ペットホーム|犬|dog",i](bbox);
            way["shop"~"pet"]["name"~"ペットホテル|ペットホーム|犬|dog",i](bbox);
        "#,
    },
    CategoryRule {
        id: Category::Grooming,
        label: "トリミング",
        color: "#ec4899",
        icon: "✂️",
        clauses: r#"
            node["shop"="pet_grooming"](bbox);
            way["shop"="pet_grooming"](bbox);
        "#,
    },
    CategoryRule {
        id: Category::PetShop,
        label: "ペット用品店",
        color: "#f97316",
        icon: "🛒",
        clauses: r#"
            node["shop"="pet"](bbox);
            way["shop"="pet"](bbox);
        "#,
    },
    CategoryRule {
        id: Category::DogPark,
        label: "ドッグラン",
        color: "#16a34a",
        icon: "🌳",
        clauses: r#"
            node["leisure"="dog_park"](bbox);
            way["leisure"="dog_park"](bbox);
        "#,
    },
    CategoryRule {
        id: Category::Veterinary,
        label: "動物病院",
        color: "#dc2626",
        icon: "🏥",
        clauses: r#"
            node["amenity"="veterinary"](bbox);
            way["amenity"="veterinary"](bbox);
        "#,
    },
];

/// Look up a registry entry by wire identifier.
///
/// Unknown identifiers resolve to the first registry entry so display code
/// always has a label and colour to render.
///
/// # Examples
/// ```
/// use dogspot::domain::category::{lookup, Category};
///
/// assert_eq!(lookup("dog_park").id, Category::DogPark);
/// assert_eq!(lookup("nonsense").id, Category::HotelWithDog);
/// ```
#[must_use]
pub fn lookup(id: &str) -> &'static CategoryRule {
    id.parse::<Category>()
        .map_or(&CATEGORY_RULES[0], Category::rule)
}
