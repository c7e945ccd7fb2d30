//! OSRM outbound adapter implementing the `RouteSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_OSRM_BASE_URL, DEFAULT_ROUTE_TIMEOUT, OsrmHttpSource};
