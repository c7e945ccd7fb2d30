//! Category registry and viewport spot search endpoints.
//!
//! ```text
//! GET /api/v1/categories
//! GET /api/v1/spots?south=35.0&west=139.0&north=35.5&east=139.5
//! ```

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::viewport::validate_viewport;
use crate::domain::{CATEGORY_RULES, CategoryRule, Spot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CategorySchema, ErrorSchema, SpotSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_bounding_box;

/// One registry entry as shown in the legend and filter chips.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    /// Stable category identifier.
    #[schema(value_type = CategorySchema)]
    pub id: crate::domain::Category,
    /// Display label.
    #[schema(example = "ドッグラン")]
    pub label: &'static str,
    /// Marker background colour.
    #[schema(example = "#16a34a")]
    pub color: &'static str,
    /// Marker glyph.
    #[schema(example = "🐕")]
    pub icon: &'static str,
}

impl From<&CategoryRule> for CategoryResponse {
    fn from(rule: &CategoryRule) -> Self {
        Self {
            id: rule.id,
            label: rule.label,
            color: rule.color,
            icon: rule.icon,
        }
    }
}

/// Raw viewport edges as supplied by the map.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewportParams {
    /// Southern latitude edge.
    #[param(example = "35.0")]
    pub south: Option<String>,
    /// Western longitude edge.
    #[param(example = "139.0")]
    pub west: Option<String>,
    /// Northern latitude edge.
    #[param(example = "35.5")]
    pub north: Option<String>,
    /// Eastern longitude edge.
    #[param(example = "139.5")]
    pub east: Option<String>,
}

/// Spots found inside one viewport.
#[derive(Debug, Serialize, ToSchema)]
pub struct SpotsResponse {
    /// Classified spots inside the viewport.
    #[schema(value_type = Vec<SpotSchema>)]
    pub spots: Vec<Spot>,
    /// Number of entries in `spots`.
    pub count: usize,
}

/// List the category registry in display order.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses((status = 200, description = "Category registry", body = [CategoryResponse])),
    tags = ["spots"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories() -> HttpResponse {
    let categories: Vec<CategoryResponse> =
        CATEGORY_RULES.iter().map(CategoryResponse::from).collect();
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .json(categories)
}

/// Find classified dog-friendly spots inside a viewport.
#[utoipa::path(
    get,
    path = "/api/v1/spots",
    params(ViewportParams),
    responses(
        (status = 200, description = "Spots inside the viewport", body = SpotsResponse),
        (status = 400, description = "Malformed viewport", body = ErrorSchema),
        (status = 422, description = "Viewport spans too many degrees", body = ErrorSchema),
        (status = 503, description = "Every geodata endpoint failed", body = ErrorSchema)
    ),
    tags = ["spots"],
    operation_id = "findSpots"
)]
#[get("/spots")]
pub async fn find_spots(
    state: web::Data<HttpState>,
    params: web::Query<ViewportParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let bbox = parse_bounding_box(
        params.south.as_deref(),
        params.west.as_deref(),
        params.north.as_deref(),
        params.east.as_deref(),
    )?;
    validate_viewport(&bbox, state.max_span_degrees)?;

    let spots = state.spots.find_spots(&bbox).await?;
    debug!(%bbox, count = spots.len(), "spot search answered");
    Ok(HttpResponse::Ok().json(SpotsResponse {
        count: spots.len(),
        spots,
    }))
}
