//! Server settings loaded via OrthoConfig.
//!
//! Every value can come from `DOGSPOT_*` environment variables, a
//! configuration file or command-line flags. Missing values fall back to the
//! adapter defaults, so an empty environment yields a working server.

use std::net::SocketAddr;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_MAX_SPAN_DEGREES;
use crate::domain::query::DEFAULT_QUERY_TIMEOUT_SECONDS;
use crate::domain::viewport::DEFAULT_DEBOUNCE;
use crate::inbound::http::site::DEFAULT_SITE_URL;
use crate::outbound::osrm::{DEFAULT_OSRM_BASE_URL, DEFAULT_ROUTE_TIMEOUT};
use crate::outbound::overpass::{
    DEFAULT_OVERPASS_ENDPOINTS, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_FAVORITES_DIR: &str = "data";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_address` is not `host:port`.
    #[error("invalid bind address `{value}`")]
    BindAddress { value: String },
    /// One of the endpoint URLs does not parse.
    #[error("invalid {field} URL `{value}`")]
    Url { field: &'static str, value: String },
    /// The endpoint list is present but empty.
    #[error("overpass_endpoints must list at least one URL")]
    NoEndpoints,
    /// The span limit is not a positive finite number.
    #[error("max_span_degrees must be positive, got {value}")]
    MaxSpan { value: String },
}

/// Configuration values for the dogspot server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DOGSPOT")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_address: Option<String>,
    /// Comma-separated Overpass interpreter URLs in failover order.
    pub overpass_endpoints: Option<String>,
    /// Client-side timeout for one Overpass request, in seconds.
    pub overpass_timeout_secs: Option<u64>,
    /// Server-side `[timeout:N]` embedded in each query.
    pub overpass_query_timeout_secs: Option<u32>,
    /// `User-Agent` sent to Overpass.
    pub user_agent: Option<String>,
    /// OSRM route service base URL.
    pub osrm_base_url: Option<String>,
    /// Client-side timeout for one route request, in seconds.
    pub osrm_timeout_secs: Option<u64>,
    /// Directory holding the favorites file.
    pub favorites_dir: Option<String>,
    /// Viewport quiet period before fetching, in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Largest accepted viewport span in degrees.
    pub max_span_degrees: Option<f64>,
    /// Canonical public URL, used by robots.txt, the sitemap and the
    /// WebSocket origin allow-list.
    pub site_url: Option<String>,
}

impl AppSettings {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddress`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS);
        raw.trim()
            .parse()
            .map_err(|_| SettingsError::BindAddress {
                value: raw.to_owned(),
            })
    }

    /// Overpass endpoints in failover order.
    ///
    /// # Errors
    ///
    /// Returns an error when a URL does not parse or the list is empty.
    pub fn overpass_endpoints(&self) -> Result<Vec<Url>, SettingsError> {
        let endpoints: Vec<&str> = match self.overpass_endpoints.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .collect(),
            None => DEFAULT_OVERPASS_ENDPOINTS.to_vec(),
        };
        if endpoints.is_empty() {
            return Err(SettingsError::NoEndpoints);
        }
        endpoints
            .into_iter()
            .map(|value| parse_url("overpass_endpoints", value))
            .collect()
    }

    /// Client-side Overpass request timeout.
    #[must_use]
    pub fn overpass_timeout(&self) -> Duration {
        self.overpass_timeout_secs
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs)
    }

    /// Server-side query timeout in seconds.
    #[must_use]
    pub fn overpass_query_timeout_secs(&self) -> u32 {
        self.overpass_query_timeout_secs
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECONDS)
    }

    /// Overpass `User-Agent`.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// OSRM base URL without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the value does not parse.
    pub fn osrm_base_url(&self) -> Result<String, SettingsError> {
        let raw = self.osrm_base_url.as_deref().unwrap_or(DEFAULT_OSRM_BASE_URL);
        parse_url("osrm_base_url", raw)?;
        Ok(raw.trim().trim_end_matches('/').to_owned())
    }

    /// Client-side OSRM request timeout.
    #[must_use]
    pub fn osrm_timeout(&self) -> Duration {
        self.osrm_timeout_secs
            .map_or(DEFAULT_ROUTE_TIMEOUT, Duration::from_secs)
    }

    /// Favorites directory.
    #[must_use]
    pub fn favorites_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.favorites_dir
                .as_deref()
                .unwrap_or(DEFAULT_FAVORITES_DIR),
        )
    }

    /// Viewport debounce window.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce_ms.map_or(DEFAULT_DEBOUNCE, Duration::from_millis)
    }

    /// Viewport span limit.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MaxSpan`] for zero, negative or non-finite
    /// values.
    pub fn max_span_degrees(&self) -> Result<f64, SettingsError> {
        let value = self.max_span_degrees.unwrap_or(DEFAULT_MAX_SPAN_DEGREES);
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(SettingsError::MaxSpan {
                value: value.to_string(),
            })
        }
    }

    /// Canonical public site URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the value does not parse.
    pub fn site_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "site_url",
            self.site_url.as_deref().unwrap_or(DEFAULT_SITE_URL),
        )
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value.trim()).map_err(|_| SettingsError::Url {
        field,
        value: value.to_owned(),
    })
}
