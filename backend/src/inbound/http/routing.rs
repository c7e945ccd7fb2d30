//! Route lookup endpoint.
//!
//! ```text
//! GET /api/v1/route?fromLat=35.68&fromLng=139.76&toLat=35.66&toLng=139.70
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::RouteInfo;
use crate::domain::routing::{format_distance, format_duration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_lat_lng};

/// Route endpoints as raw query values.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct RouteParams {
    #[param(example = "35.6812")]
    pub from_lat: Option<String>,
    #[param(example = "139.7671")]
    pub from_lng: Option<String>,
    #[param(example = "35.6717")]
    pub to_lat: Option<String>,
    #[param(example = "139.6949")]
    pub to_lng: Option<String>,
}

/// First route between two points with display strings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// Length in meters.
    pub distance: f64,
    /// Travel time in seconds.
    pub duration: f64,
    /// Path as `[lat, lng]` pairs.
    pub geometry: Vec<[f64; 2]>,
    #[schema(example = "1.6km")]
    pub distance_text: String,
    #[schema(example = "1時間15分")]
    pub duration_text: String,
}

impl From<RouteInfo> for RouteResponse {
    fn from(route: RouteInfo) -> Self {
        Self {
            distance_text: format_distance(route.distance),
            duration_text: format_duration(route.duration),
            distance: route.distance,
            duration: route.duration,
            geometry: route.geometry,
        }
    }
}

/// Fetch a driving route between two points.
#[utoipa::path(
    get,
    path = "/api/v1/route",
    params(RouteParams),
    responses(
        (status = 200, description = "Route found", body = RouteResponse),
        (status = 400, description = "Malformed coordinates", body = ErrorSchema),
        (status = 502, description = "Routing service produced no route", body = ErrorSchema)
    ),
    tags = ["routing"],
    operation_id = "getRoute"
)]
#[get("/route")]
pub async fn get_route(
    state: web::Data<HttpState>,
    params: web::Query<RouteParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let from = parse_lat_lng(
        params.from_lat.as_deref(),
        params.from_lng.as_deref(),
        (FieldName::new("fromLat"), FieldName::new("fromLng")),
    )?;
    let to = parse_lat_lng(
        params.to_lat.as_deref(),
        params.to_lng.as_deref(),
        (FieldName::new("toLat"), FieldName::new("toLng")),
    )?;
    let route = state.routing.route(from, to).await?;
    Ok(HttpResponse::Ok().json(RouteResponse::from(route)))
}
