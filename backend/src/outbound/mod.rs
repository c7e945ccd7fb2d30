//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **overpass**: reqwest client for Overpass interpreter endpoints
//! - **osrm**: reqwest client for the OSRM route service
//! - **favorites**: JSON file store for the favorites key
//!
//! Adapters translate between wire formats and domain types and contain no
//! business logic.

pub mod favorites;
pub mod osrm;
pub mod overpass;
