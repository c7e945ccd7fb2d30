//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and services and remain testable without I/O.

use std::sync::Arc;

use mockable::DefaultClock;

use super::site::SiteConfig;
use crate::domain::ports::{
    FixtureRouteSource, FixtureSpotsQuery, InMemoryFavoritesRepository, SpotsQuery,
};
use crate::domain::{DEFAULT_MAX_SPAN_DEGREES, FavoritesService, RoutingService};

/// Parameter object bundling the use cases HTTP handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub spots: Arc<dyn SpotsQuery>,
    pub favorites: FavoritesService,
    pub routing: RoutingService,
}

impl Default for HttpStatePorts {
    /// Fixture-backed ports: no spots, in-memory favorites, canned route.
    fn default() -> Self {
        Self {
            spots: Arc::new(FixtureSpotsQuery::default()),
            favorites: FavoritesService::new(
                Arc::new(InMemoryFavoritesRepository::default()),
                Arc::new(DefaultClock),
            ),
            routing: RoutingService::new(Arc::new(FixtureRouteSource)),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub spots: Arc<dyn SpotsQuery>,
    pub favorites: FavoritesService,
    pub routing: RoutingService,
    /// Largest viewport span accepted by `/api/v1/spots`.
    pub max_span_degrees: f64,
    pub site: Arc<SiteConfig>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the default span limit and site settings.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            spots,
            favorites,
            routing,
        } = ports;
        Self {
            spots,
            favorites,
            routing,
            max_span_degrees: DEFAULT_MAX_SPAN_DEGREES,
            site: Arc::new(SiteConfig::default()),
        }
    }

    /// Override the viewport span limit.
    #[must_use]
    pub fn with_max_span_degrees(mut self, max_span_degrees: f64) -> Self {
        self.max_span_degrees = max_span_degrees;
        self
    }

    /// Override the public site settings.
    #[must_use]
    pub fn with_site(mut self, site: SiteConfig) -> Self {
        self.site = Arc::new(site);
        self
    }
}
