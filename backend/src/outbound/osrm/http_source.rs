//! Reqwest-backed OSRM route adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::OsrmResponseDto;
use crate::domain::ports::{RouteSource, RouteSourceError};
use crate::domain::{LatLng, RouteInfo};

/// Public OSRM demo server, driving profile.
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org/route/v1/driving";

/// Client-side timeout for one route request.
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(15);

/// OSRM adapter issuing one GET per lookup.
pub struct OsrmHttpSource {
    client: Client,
    base: String,
}

impl OsrmHttpSource {
    /// Build an adapter for `base` (without trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let base = base.into().trim_end_matches('/').to_owned();
        Ok(Self { client, base })
    }

    fn route_url(&self, from: LatLng, to: LatLng) -> Result<Url, RouteSourceError> {
        let raw = format!(
            "{}/{},{};{},{}",
            self.base, from.lng, from.lat, to.lng, to.lat
        );
        let mut url = Url::parse(&raw)
            .map_err(|err| RouteSourceError::transport(format!("invalid route URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");
        Ok(url)
    }
}

#[async_trait]
impl RouteSource for OsrmHttpSource {
    async fn fetch_route(&self, from: LatLng, to: LatLng) -> Result<RouteInfo, RouteSourceError> {
        let url = self.route_url(from, to)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| RouteSourceError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteSourceError::status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| RouteSourceError::transport(err.to_string()))?;
        parse_route(body.as_ref())
    }
}

fn parse_route(body: &[u8]) -> Result<RouteInfo, RouteSourceError> {
    let decoded: OsrmResponseDto = serde_json::from_slice(body)
        .map_err(|err| RouteSourceError::decode(format!("invalid OSRM payload: {err}")))?;
    if decoded.code != "Ok" {
        return Err(RouteSourceError::no_route(decoded.code));
    }
    decoded
        .routes
        .into_iter()
        .next()
        .map(|route| route.into_route_info())
        .ok_or_else(|| RouteSourceError::no_route("Ok"))
}
