//! Overpass outbound adapter.
//!
//! One [`OverpassHttpSource`] wraps one interpreter endpoint and implements
//! the `GeodataSource` port. Failover across endpoints happens in the domain.

mod dto;
mod http_source;

pub use http_source::{
    DEFAULT_OVERPASS_ENDPOINTS, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, OverpassHttpSource,
};
