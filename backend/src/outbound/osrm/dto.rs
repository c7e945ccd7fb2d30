//! DTOs for the OSRM `route` service response.

use serde::Deserialize;

use crate::domain::RouteInfo;

#[derive(Debug, Deserialize)]
pub(super) struct OsrmResponseDto {
    pub(super) code: String,
    #[serde(default)]
    pub(super) routes: Vec<OsrmRouteDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OsrmRouteDto {
    pub(super) distance: f64,
    pub(super) duration: f64,
    pub(super) geometry: OsrmGeometryDto,
}

/// GeoJSON line string; coordinates are `[lng, lat]`.
#[derive(Debug, Deserialize)]
pub(super) struct OsrmGeometryDto {
    #[serde(default)]
    pub(super) coordinates: Vec<[f64; 2]>,
}

impl OsrmRouteDto {
    pub(super) fn into_route_info(self) -> RouteInfo {
        RouteInfo {
            distance: self.distance,
            duration: self.duration,
            geometry: self
                .geometry
                .coordinates
                .into_iter()
                .map(|[lng, lat]| [lat, lng])
                .collect(),
        }
    }
}
