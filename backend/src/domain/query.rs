//! Overpass QL builder for the combined category query.

use super::bounding_box::BoundingBox;
use super::category::CATEGORY_RULES;

/// Server-side timeout hint, in seconds, embedded in the query header.
pub const DEFAULT_QUERY_TIMEOUT_SECONDS: u32 = 25;

const BBOX_PLACEHOLDER: &str = "(bbox)";

/// Build one query covering every category for `bbox`.
///
/// Clauses appear in registry order, one per line, indented by two spaces.
/// The bounding box is substituted verbatim; no ordering validation happens
/// here.
///
/// # Examples
/// ```
/// use dogspot::domain::BoundingBox;
/// use dogspot::domain::query::build_overpass_query;
///
/// let query = build_overpass_query(&BoundingBox::new(35.0, 139.0, 35.5, 139.5), 25);
/// assert!(query.starts_with("[out:json][timeout:25];\n(\n"));
/// assert!(query.ends_with("\n);\nout center;"));
/// assert!(query.contains(r#"node["leisure"="dog_park"](35,139,35.5,139.5);"#));
/// ```
#[must_use]
pub fn build_overpass_query(bbox: &BoundingBox, timeout_seconds: u32) -> String {
    let filter = format!("({})", bbox.overpass_filter());
    let clauses: Vec<String> = CATEGORY_RULES
        .iter()
        .flat_map(|rule| rule.clause_lines())
        .map(|clause| clause.replacen(BBOX_PLACEHOLDER, &filter, 1))
        .collect();

    format!(
        "[out:json][timeout:{timeout_seconds}];\n(\n  {}\n);\nout center;",
        clauses.join("\n  ")
    )
}
