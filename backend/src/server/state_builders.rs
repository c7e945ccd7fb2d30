//! Builders wiring outbound adapters into HTTP and WebSocket state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use dogspot::domain::ports::{GeodataSource, SpotsQuery};
use dogspot::domain::{FavoritesService, RoutingService, SpotSearchService};
use dogspot::inbound::http::site::SiteConfig;
use dogspot::inbound::http::state::{HttpState, HttpStatePorts};
use dogspot::inbound::ws::state::WsState;
use dogspot::outbound::favorites::JsonFileFavoritesRepository;
use dogspot::outbound::osrm::OsrmHttpSource;
use dogspot::outbound::overpass::OverpassHttpSource;

use super::ServerConfig;

fn client_error(err: reqwest::Error) -> std::io::Error {
    std::io::Error::other(format!("HTTP client construction failed: {err}"))
}

/// Build the spot search service with one Overpass source per endpoint.
fn build_spots_query(config: &ServerConfig) -> std::io::Result<Arc<dyn SpotsQuery>> {
    let sources = config
        .overpass_endpoints
        .iter()
        .map(|endpoint| {
            OverpassHttpSource::with_user_agent(
                endpoint.clone(),
                config.overpass_timeout,
                config.user_agent.as_str(),
            )
            .map(|source| Arc::new(source) as Arc<dyn GeodataSource>)
            .map_err(client_error)
        })
        .collect::<std::io::Result<Vec<_>>>()?;
    let service = SpotSearchService::new(sources).with_query_timeout(config.query_timeout_seconds);
    info!(endpoints = service.source_count(), "spot search configured");
    Ok(Arc::new(service))
}

fn build_favorites(config: &ServerConfig) -> std::io::Result<FavoritesService> {
    let repository = JsonFileFavoritesRepository::open(&config.favorites_dir)?;
    info!(path = %repository.path(), "favorites store opened");
    Ok(FavoritesService::new(
        Arc::new(repository),
        Arc::new(DefaultClock),
    ))
}

fn build_routing(config: &ServerConfig) -> std::io::Result<RoutingService> {
    let source = OsrmHttpSource::new(config.osrm_base_url.as_str(), config.osrm_timeout)
        .map_err(client_error)?;
    Ok(RoutingService::new(Arc::new(source)))
}

/// Build the HTTP and WebSocket state bundles sharing one spot search
/// service.
///
/// # Errors
///
/// Returns an error when the favorites directory cannot be opened or an HTTP
/// client cannot be constructed.
pub(super) fn build_states(
    config: &ServerConfig,
) -> std::io::Result<(web::Data<HttpState>, web::Data<WsState>)> {
    let spots = build_spots_query(config)?;
    let site = SiteConfig {
        site_url: config.site_url_string(),
        ..SiteConfig::default()
    };

    let http_state = HttpState::new(HttpStatePorts {
        spots: Arc::clone(&spots),
        favorites: build_favorites(config)?,
        routing: build_routing(config)?,
    })
    .with_max_span_degrees(config.viewport.max_span_degrees)
    .with_site(site);

    let ws_state = WsState::new(spots, config.viewport, config.allowed_hosts());
    Ok((web::Data::new(http_state), web::Data::new(ws_state)))
}
