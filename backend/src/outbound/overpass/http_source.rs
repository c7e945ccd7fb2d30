//! Reqwest-backed Overpass source adapter.
//!
//! This adapter owns transport details only: form encoding, timeout and
//! status mapping, and JSON decoding into raw elements.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::OverpassResponseDto;
use crate::domain::ports::{GeodataSource, GeodataSourceError};
use crate::domain::spot::RawGeoElement;

/// Public interpreter endpoints in failover order.
pub const DEFAULT_OVERPASS_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://lz4.overpass-api.de/api/interpreter",
    "https://z.overpass-api.de/api/interpreter",
];

/// Client-side timeout for one Overpass request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every Overpass request.
pub const DEFAULT_USER_AGENT: &str = concat!("dogspot/", env!("CARGO_PKG_VERSION"));

/// Overpass adapter that POSTs queries to one interpreter endpoint.
pub struct OverpassHttpSource {
    client: Client,
    endpoint: Url,
    label: String,
    user_agent: String,
}

impl OverpassHttpSource {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(endpoint, timeout, DEFAULT_USER_AGENT)
    }

    /// Build an adapter sending a custom `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(
        endpoint: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            label: endpoint.to_string(),
            endpoint,
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl GeodataSource for OverpassHttpSource {
    fn endpoint(&self) -> &str {
        &self.label
    }

    async fn run_query(&self, query: &str) -> Result<Vec<RawGeoElement>, GeodataSourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_elements(body.as_ref())
    }
}

fn parse_elements(body: &[u8]) -> Result<Vec<RawGeoElement>, GeodataSourceError> {
    let decoded: OverpassResponseDto = serde_json::from_slice(body).map_err(|error| {
        GeodataSourceError::decode(format!("invalid Overpass JSON payload: {error}"))
    })?;
    Ok(decoded.into_raw_elements())
}

fn map_transport_error(error: reqwest::Error) -> GeodataSourceError {
    if error.is_timeout() {
        GeodataSourceError::timeout(error.to_string())
    } else {
        GeodataSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeodataSourceError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeodataSourceError::timeout(format!("status {}", status.as_u16()))
        }
        _ => GeodataSourceError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
