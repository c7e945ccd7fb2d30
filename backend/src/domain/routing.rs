//! Route lookup and human-readable route formatting.
//!
//! Routing has a single upstream and no failover: any failure becomes
//! [`ErrorCode::RouteUnavailable`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::RouteSource;
use crate::domain::{Error, ErrorCode};

/// A WGS84 coordinate in latitude/longitude order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Build a coordinate.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// First route returned by the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Length in meters.
    pub distance: f64,
    /// Travel time in seconds.
    pub duration: f64,
    /// Path as `[lat, lng]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

/// Format a travel time as `"{m}分"` or `"{h}時間{m}分"`.
///
/// Minutes are rounded to the nearest whole minute first.
///
/// # Examples
/// ```
/// use dogspot::domain::routing::format_duration;
///
/// assert_eq!(format_duration(600.0), "10分");
/// assert_eq!(format_duration(4500.0), "1時間15分");
/// ```
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let minutes = whole(seconds / 60.0);
    if minutes < 60 {
        format!("{minutes}分")
    } else {
        format!("{}時間{}分", minutes / 60, minutes % 60)
    }
}

/// Format a distance as `"{n}m"` under one kilometre, else kilometres to one
/// decimal place with exact ties rounded up.
///
/// # Examples
/// ```
/// use dogspot::domain::routing::format_distance;
///
/// assert_eq!(format_distance(850.4), "850m");
/// assert_eq!(format_distance(12_345.0), "12.3km");
/// ```
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", whole(meters))
    } else {
        let km = meters / 1000.0;
        // Exact half-tenth ties only land on odd quarter kilometres; round those up.
        let quarters = km * 4.0;
        let km = if quarters.fract().abs() < f64::EPSILON && whole(quarters) % 2 == 1 {
            km + 0.05
        } else {
            km
        };
        format!("{km:.1}km")
    }
}

/// Round half away from zero; non-finite input is zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int casts saturate and the value is already rounded"
)]
fn whole(value: f64) -> i64 {
    let rounded = value.round();
    if rounded.is_finite() { rounded as i64 } else { 0 }
}

/// Route lookup use case.
#[derive(Clone)]
pub struct RoutingService {
    source: Arc<dyn RouteSource>,
}

impl RoutingService {
    /// Create a service backed by `source`.
    pub fn new(source: Arc<dyn RouteSource>) -> Self {
        Self { source }
    }

    /// Fetch a route from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::RouteUnavailable`] for every upstream failure.
    pub async fn route(&self, from: LatLng, to: LatLng) -> Result<RouteInfo, Error> {
        self.source.fetch_route(from, to).await.map_err(|err| {
            warn!(error = %err, "route lookup failed");
            Error::from_code(ErrorCode::RouteUnavailable)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockRouteSource, RouteSourceError};
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0分")]
    #[case(29.0, "0分")]
    #[case(30.0, "1分")]
    #[case(3_569.0, "59分")]
    #[case(3_570.0, "1時間0分")]
    #[case(7_260.0, "2時間1分")]
    fn formats_durations(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(format_duration(seconds), expected);
    }

    #[rstest]
    #[case(0.0, "0m")]
    #[case(999.4, "999m")]
    #[case(1_000.0, "1.0km")]
    #[case(1_250.0, "1.3km")]
    #[case(1_750.0, "1.8km")]
    #[case(2_050.0, "2.0km")]
    #[case(1_550.0, "1.6km")]
    #[case(42_195.0, "42.2km")]
    fn formats_distances(#[case] meters: f64, #[case] expected: &str) {
        assert_eq!(format_distance(meters), expected);
    }

    #[rstest]
    #[case(RouteSourceError::transport("connection refused"))]
    #[case(RouteSourceError::status(500_u16))]
    #[case(RouteSourceError::decode("missing routes"))]
    #[case(RouteSourceError::no_route("NoRoute"))]
    #[tokio::test]
    async fn every_failure_becomes_route_unavailable(#[case] failure: RouteSourceError) {
        let mut source = MockRouteSource::new();
        source
            .expect_fetch_route()
            .times(1)
            .return_once(move |_, _| Err(failure));
        let service = RoutingService::new(Arc::new(source));

        let err = service
            .route(LatLng::new(35.0, 139.0), LatLng::new(35.1, 139.1))
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::RouteUnavailable);
    }

    #[tokio::test]
    async fn passes_route_through() {
        let expected = RouteInfo {
            distance: 1_200.0,
            duration: 300.0,
            geometry: vec![[35.0, 139.0], [35.1, 139.1]],
        };
        let returned = expected.clone();
        let mut source = MockRouteSource::new();
        source
            .expect_fetch_route()
            .withf(|from, to| from.lat == 35.0 && to.lng == 139.1)
            .return_once(move |_, _| Ok(returned));
        let service = RoutingService::new(Arc::new(source));

        let route = service
            .route(LatLng::new(35.0, 139.0), LatLng::new(35.1, 139.1))
            .await
            .expect("route");
        assert_eq!(route, expected);
    }
}
