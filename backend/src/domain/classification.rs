//! Local classification of raw geodata elements into categories.
//!
//! Classification is independent of which Overpass clause matched an element
//! server-side. Predicates form an explicit priority chain: the first one
//! that matches decides the category, so an element maps to at most one
//! category. Exact tag checks come before name heuristics.

use std::collections::BTreeMap;

use super::category::Category;

/// Free-form OSM tags attached to an element.
pub type Tags = BTreeMap<String, String>;

const HOTEL_NAME_MARKERS: &[&str] = &["犬", "ペット", "dog"];
const CAFE_NAME_MARKERS: &[&str] = &["ドッグ", "dog", "犬"];
const BOARDING_NAME_MARKERS: &[&str] = &["ペットホテル", "ペットホーム"];

/// One link of the classification priority chain.
#[derive(Clone, Copy)]
pub struct ClassificationRule {
    /// Category assigned when the predicate matches.
    pub category: Category,
    /// Short description used in logs and tests.
    pub description: &'static str,
    predicate: fn(&Tags) -> bool,
}

impl ClassificationRule {
    /// Evaluate the predicate against `tags`.
    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        (self.predicate)(tags)
    }
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("category", &self.category)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

static PRIORITY_CHAIN: [ClassificationRule; 8] = [
    ClassificationRule {
        category: Category::Veterinary,
        description: "amenity=veterinary",
        predicate: |tags| tag_is(tags, "amenity", "veterinary"),
    },
    ClassificationRule {
        category: Category::DogPark,
        description: "leisure=dog_park",
        predicate: |tags| tag_is(tags, "leisure", "dog_park"),
    },
    ClassificationRule {
        category: Category::Grooming,
        description: "shop=pet_grooming",
        predicate: |tags| tag_is(tags, "shop", "pet_grooming"),
    },
    ClassificationRule {
        category: Category::PetHotel,
        description: "amenity=animal_boarding",
        predicate: |tags| tag_is(tags, "amenity", "animal_boarding"),
    },
    ClassificationRule {
        category: Category::HotelWithDog,
        description: "hotel or ryokan with a dog tag or dog-related name",
        predicate: |tags| {
            matches!(tag(tags, "tourism"), Some("hotel" | "ryokan"))
                && (allows_dogs(tags) || name_contains_any(tags, HOTEL_NAME_MARKERS))
        },
    },
    ClassificationRule {
        category: Category::DogCafe,
        description: "cafe or restaurant with a dog tag or dog-related name",
        predicate: |tags| {
            matches!(tag(tags, "amenity"), Some("cafe" | "restaurant"))
                && (allows_dogs(tags) || name_contains_any(tags, CAFE_NAME_MARKERS))
        },
    },
    ClassificationRule {
        category: Category::PetHotel,
        description: "pet shop named as a boarding house",
        predicate: |tags| {
            name_contains_any(tags, BOARDING_NAME_MARKERS)
                && tag(tags, "shop").is_some_and(|shop| shop.contains("pet"))
        },
    },
    ClassificationRule {
        category: Category::PetShop,
        description: "shop=pet",
        predicate: |tags| tag_is(tags, "shop", "pet"),
    },
];

/// The ordered predicate list, highest priority first.
#[must_use]
pub fn priority_chain() -> &'static [ClassificationRule] {
    &PRIORITY_CHAIN
}

/// Classify an element by its tags.
///
/// Returns `None` when no predicate matches; such elements are never turned
/// into spots.
///
/// # Examples
/// ```
/// use dogspot::domain::classification::{classify, Tags};
/// use dogspot::domain::Category;
///
/// let tags: Tags = [("amenity", "veterinary"), ("name", "Dog Cafe")]
///     .into_iter()
///     .map(|(k, v)| (k.to_owned(), v.to_owned()))
///     .collect();
/// assert_eq!(classify(&tags), Some(Category::Veterinary));
/// ```
#[must_use]
pub fn classify(tags: &Tags) -> Option<Category> {
    PRIORITY_CHAIN
        .iter()
        .find(|rule| rule.matches(tags))
        .map(|rule| rule.category)
}

fn tag<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str)
}

fn tag_is(tags: &Tags, key: &str, expected: &str) -> bool {
    tag(tags, key) == Some(expected)
}

fn allows_dogs(tags: &Tags) -> bool {
    matches!(tag(tags, "dog"), Some("yes" | "allowed"))
}

/// Name used by the heuristics: `name`, then `name:ja`, else empty.
fn heuristic_name(tags: &Tags) -> &str {
    tag(tags, "name").or_else(|| tag(tags, "name:ja")).unwrap_or("")
}

/// Case-insensitive substring match; markers must be lowercase.
fn name_contains_any(tags: &Tags, markers: &[&str]) -> bool {
    let name = heuristic_name(tags).to_lowercase();
    markers.iter().any(|marker| name.contains(marker))
}
