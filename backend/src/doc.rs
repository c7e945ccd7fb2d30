//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (spots, favorites,
//!   routing, site metadata, health)
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`],
//!   [`SpotSchema`] and friends) that provide OpenAPI definitions without
//!   coupling domain types to the utoipa framework
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::favorites::FavoriteStatusResponse;
use crate::inbound::http::routing::RouteResponse;
use crate::inbound::http::schemas::{
    CategorySchema, ErrorCodeSchema, ErrorSchema, FavoriteSpotSchema, SpotSchema,
};
use crate::inbound::http::site::{CenterResponse, MapConfigResponse};
use crate::inbound::http::spots::{CategoryResponse, SpotsResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "dogspot API",
        description = "Dog-friendly places from OpenStreetMap, favorites and walking routes.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::spots::list_categories,
        crate::inbound::http::spots::find_spots,
        crate::inbound::http::favorites::list_favorites,
        crate::inbound::http::favorites::add_favorite,
        crate::inbound::http::favorites::toggle_favorite,
        crate::inbound::http::favorites::favorite_status,
        crate::inbound::http::favorites::remove_favorite,
        crate::inbound::http::routing::get_route,
        crate::inbound::http::site::map_config,
        crate::inbound::http::site::robots,
        crate::inbound::http::site::sitemap,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CategorySchema,
        SpotSchema,
        FavoriteSpotSchema,
        CategoryResponse,
        SpotsResponse,
        FavoriteStatusResponse,
        RouteResponse,
        MapConfigResponse,
        CenterResponse,
    )),
    tags(
        (name = "spots", description = "Category registry and viewport search"),
        (name = "favorites", description = "Saved spots"),
        (name = "routing", description = "Route lookup between two points"),
        (name = "site", description = "Map configuration and crawler metadata"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
