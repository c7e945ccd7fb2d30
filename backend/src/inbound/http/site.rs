//! Site-level endpoints: crawler files and map configuration.
//!
//! ```text
//! GET /robots.txt
//! GET /sitemap.xml
//! GET /api/v1/map-config
//! ```

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::LatLng;
use crate::inbound::http::state::HttpState;

/// Public site URL used by robots.txt and the sitemap.
pub const DEFAULT_SITE_URL: &str = "https://dog-friendly-map.vercel.app";

/// OpenStreetMap raster tile template.
pub const DEFAULT_TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution required by the OpenStreetMap tile usage policy.
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

/// Settings for the public page and its map.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Canonical site URL without a trailing slash.
    pub site_url: String,
    pub tile_url_template: String,
    pub tile_attribution: String,
    pub max_zoom: u8,
    /// Initial map centre before geolocation resolves (Tokyo Station).
    pub default_center: LatLng,
    pub default_zoom: u8,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_owned(),
            tile_url_template: DEFAULT_TILE_URL_TEMPLATE.to_owned(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_owned(),
            max_zoom: 19,
            default_center: LatLng::new(35.6812, 139.7671),
            default_zoom: 12,
        }
    }
}

impl SiteConfig {
    fn base_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

/// Map centre in the map-config payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct CenterResponse {
    #[schema(example = 35.6812)]
    pub lat: f64,
    #[schema(example = 139.7671)]
    pub lng: f64,
}

/// Tile layer and viewport settings for the browser map.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapConfigResponse {
    /// Leaflet-style tile URL template.
    #[schema(example = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")]
    pub tile_url: String,
    /// HTML attribution for the tile layer.
    pub attribution: String,
    pub max_zoom: u8,
    pub center: CenterResponse,
    pub zoom: u8,
    /// Largest viewport span the spots endpoint accepts.
    #[schema(example = 0.5)]
    pub max_span_degrees: f64,
}

fn render_robots(site: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        site.base_url()
    )
}

fn render_sitemap(site: &SiteConfig, last_modified: NaiveDate) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>{loc}</loc>
    <lastmod>{lastmod}</lastmod>
    <changefreq>weekly</changefreq>
    <priority>1.0</priority>
  </url>
</urlset>
"#,
        loc = site.base_url(),
        lastmod = last_modified.format("%Y-%m-%d"),
    )
}

/// Crawler policy allowing everything and pointing at the sitemap.
#[utoipa::path(
    get,
    path = "/robots.txt",
    responses((status = 200, description = "Crawler policy", content_type = "text/plain", body = String)),
    tags = ["site"],
    operation_id = "getRobots"
)]
#[get("/robots.txt")]
pub async fn robots(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(render_robots(&state.site))
}

/// Single-page sitemap; `lastmod` is the current UTC date.
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses((status = 200, description = "Sitemap", content_type = "application/xml", body = String)),
    tags = ["site"],
    operation_id = "getSitemap"
)]
#[get("/sitemap.xml")]
pub async fn sitemap(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/xml")
        .body(render_sitemap(&state.site, Utc::now().date_naive()))
}

/// Tile template, attribution and initial viewport for the map page.
#[utoipa::path(
    get,
    path = "/api/v1/map-config",
    responses((status = 200, description = "Map configuration", body = MapConfigResponse)),
    tags = ["site"],
    operation_id = "getMapConfig"
)]
#[get("/map-config")]
pub async fn map_config(state: web::Data<HttpState>) -> HttpResponse {
    let site = &state.site;
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .json(MapConfigResponse {
            tile_url: site.tile_url_template.clone(),
            attribution: site.tile_attribution.clone(),
            max_zoom: site.max_zoom,
            center: CenterResponse {
                lat: site.default_center.lat,
                lng: site.default_center.lng,
            },
            zoom: site.default_zoom,
            max_span_degrees: state.max_span_degrees,
        })
}
