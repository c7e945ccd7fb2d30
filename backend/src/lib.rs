//! Dog-friendly place finder backend.
//!
//! Looks up dog-friendly places from OpenStreetMap via Overpass, classifies
//! them into a fixed category registry and serves them over HTTP and a
//! viewport-driven WebSocket. Favorites persist to a JSON file and walking
//! routes come from OSRM.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
