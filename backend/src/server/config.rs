//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use camino::Utf8PathBuf;
use dogspot::config::AppSettings;
use dogspot::domain::ViewportSettings;
use url::Url;

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) overpass_endpoints: Vec<Url>,
    pub(crate) overpass_timeout: Duration,
    pub(crate) query_timeout_seconds: u32,
    pub(crate) user_agent: String,
    pub(crate) osrm_base_url: String,
    pub(crate) osrm_timeout: Duration,
    pub(crate) favorites_dir: Utf8PathBuf,
    pub(crate) viewport: ViewportSettings,
    pub(crate) site_url: Url,
}

impl ServerConfig {
    /// Resolve loaded settings, applying defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::ErrorKind::InvalidInput`] when a value does not
    /// parse.
    pub fn from_settings(settings: &AppSettings) -> std::io::Result<Self> {
        let invalid = |err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err);
        Ok(Self {
            bind_addr: settings.bind_addr().map_err(invalid)?,
            overpass_endpoints: settings.overpass_endpoints().map_err(invalid)?,
            overpass_timeout: settings.overpass_timeout(),
            query_timeout_seconds: settings.overpass_query_timeout_secs(),
            user_agent: settings.user_agent().to_owned(),
            osrm_base_url: settings.osrm_base_url().map_err(invalid)?,
            osrm_timeout: settings.osrm_timeout(),
            favorites_dir: settings.favorites_dir(),
            viewport: ViewportSettings {
                debounce: settings.debounce(),
                max_span_degrees: settings.max_span_degrees().map_err(invalid)?,
            },
            site_url: settings.site_url().map_err(invalid)?,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Canonical site URL without a trailing slash.
    pub(crate) fn site_url_string(&self) -> String {
        self.site_url.as_str().trim_end_matches('/').to_owned()
    }

    /// Hosts allowed to open WebSocket sessions over HTTPS.
    pub(crate) fn allowed_hosts(&self) -> Vec<String> {
        self.site_url
            .host_str()
            .map(str::to_owned)
            .into_iter()
            .collect()
    }
}
