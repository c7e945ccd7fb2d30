//! Driven port for the external routing service.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::routing::{LatLng, RouteInfo};

define_port_error! {
    /// Errors surfaced by routing adapters.
    pub enum RouteSourceError {
        /// Network transport failed or timed out.
        Transport { message: String } =>
            "routing transport failed: {message}",
        /// The service answered with a non-success status.
        Status { status: u16 } =>
            "routing service returned status {status}",
        /// The body could not be decoded.
        Decode { message: String } =>
            "routing response decode failed: {message}",
        /// The service answered but found no route.
        NoRoute { code: String } =>
            "routing service found no route (code {code})",
    }
}

/// Port for one-shot route lookups between two coordinates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Fetch the first route from `from` to `to`.
    async fn fetch_route(&self, from: LatLng, to: LatLng) -> Result<RouteInfo, RouteSourceError>;
}

/// Fixture source returning a straight two-point route.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRouteSource;

#[async_trait]
impl RouteSource for FixtureRouteSource {
    async fn fetch_route(&self, from: LatLng, to: LatLng) -> Result<RouteInfo, RouteSourceError> {
        Ok(RouteInfo {
            distance: 0.0,
            duration: 0.0,
            geometry: vec![[from.lat, from.lng], [to.lat, to.lng]],
        })
    }
}
