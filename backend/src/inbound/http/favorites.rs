//! Favorites endpoints.
//!
//! ```text
//! GET    /api/v1/favorites
//! POST   /api/v1/favorites
//! POST   /api/v1/favorites/toggle
//! GET    /api/v1/favorites/{type}/{id}
//! DELETE /api/v1/favorites/{type}/{id}
//! ```
//!
//! The favorites store is synchronous file I/O, so every call runs on the
//! blocking pool.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, FavoriteSpot, FavoritesService, Spot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, FavoriteSpotSchema, SpotSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_element_type, parse_lat_lng};

/// Saved state of one spot after a favorites call.
#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteStatusResponse {
    #[schema(example = "node/123456")]
    pub id: String,
    pub favorited: bool,
}

async fn run_blocking<T, F>(favorites: &FavoritesService, op: F) -> Result<T, Error>
where
    F: FnOnce(&FavoritesService) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    let service = favorites.clone();
    web::block(move || op(&service)).await.map_err(|err| {
        error!(error = %err, "favorites task did not complete");
        Error::internal("favorites task did not complete")
    })?
}

fn validate_spot(spot: &Spot) -> Result<(), Error> {
    let (element_type, numeric) = spot
        .id
        .split_once('/')
        .ok_or_else(|| invalid_spot_id(&spot.id))?;
    parse_element_type(element_type, FieldName::new("id"))?;
    numeric
        .parse::<i64>()
        .map_err(|_| invalid_spot_id(&spot.id))?;
    let lat = spot.lat.to_string();
    let lng = spot.lng.to_string();
    parse_lat_lng(
        Some(&lat),
        Some(&lng),
        (FieldName::new("lat"), FieldName::new("lng")),
    )?;
    Ok(())
}

fn invalid_spot_id(id: &str) -> Error {
    Error::invalid_request("id must look like <type>/<number>")
        .with_details(serde_json::json!({ "field": "id", "value": id }))
}

/// List saved spots in the order they were saved.
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    responses(
        (status = 200, description = "Saved spots", body = [FavoriteSpotSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites"
)]
#[get("/favorites")]
pub async fn list_favorites(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let favorites: Vec<FavoriteSpot> =
        run_blocking(&state.favorites, |service| Ok(service.list())).await?;
    Ok(HttpResponse::Ok().json(favorites))
}

/// Save a spot; saving an already-saved spot changes nothing.
#[utoipa::path(
    post,
    path = "/api/v1/favorites",
    request_body = SpotSchema,
    responses(
        (status = 200, description = "Spot saved", body = FavoriteStatusResponse),
        (status = 400, description = "Invalid spot", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/favorites")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    payload: web::Json<Spot>,
) -> ApiResult<HttpResponse> {
    let spot = payload.into_inner();
    validate_spot(&spot)?;
    let id = spot.id.clone();
    run_blocking(&state.favorites, move |service| service.add(spot)).await?;
    Ok(HttpResponse::Ok().json(FavoriteStatusResponse {
        id,
        favorited: true,
    }))
}

/// Flip the saved state of a spot.
#[utoipa::path(
    post,
    path = "/api/v1/favorites/toggle",
    request_body = SpotSchema,
    responses(
        (status = 200, description = "New saved state", body = FavoriteStatusResponse),
        (status = 400, description = "Invalid spot", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "toggleFavorite"
)]
#[post("/favorites/toggle")]
pub async fn toggle_favorite(
    state: web::Data<HttpState>,
    payload: web::Json<Spot>,
) -> ApiResult<HttpResponse> {
    let spot = payload.into_inner();
    validate_spot(&spot)?;
    let id = spot.id.clone();
    let favorited = run_blocking(&state.favorites, move |service| service.toggle(spot)).await?;
    Ok(HttpResponse::Ok().json(FavoriteStatusResponse { id, favorited }))
}

fn spot_id_from_path(path: (String, i64)) -> Result<String, Error> {
    let (element_type, id) = path;
    let element_type = parse_element_type(&element_type, FieldName::new("type"))?;
    Ok(format!("{element_type}/{id}"))
}

/// Report whether a spot is saved.
#[utoipa::path(
    get,
    path = "/api/v1/favorites/{type}/{id}",
    params(
        ("type" = String, Path, description = "OSM element type: node, way or relation"),
        ("id" = i64, Path, description = "OSM element identifier")
    ),
    responses(
        (status = 200, description = "Saved state", body = FavoriteStatusResponse),
        (status = 400, description = "Invalid element type", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "getFavoriteStatus"
)]
#[get("/favorites/{type}/{id}")]
pub async fn favorite_status(
    state: web::Data<HttpState>,
    path: web::Path<(String, i64)>,
) -> ApiResult<HttpResponse> {
    let id = spot_id_from_path(path.into_inner())?;
    let lookup = id.clone();
    let favorited =
        run_blocking(&state.favorites, move |service| Ok(service.is_favorite(&lookup))).await?;
    Ok(HttpResponse::Ok().json(FavoriteStatusResponse { id, favorited }))
}

/// Remove a saved spot; removing an unsaved spot is a no-op.
#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{type}/{id}",
    params(
        ("type" = String, Path, description = "OSM element type: node, way or relation"),
        ("id" = i64, Path, description = "OSM element identifier")
    ),
    responses(
        (status = 204, description = "Spot no longer saved"),
        (status = 400, description = "Invalid element type", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/favorites/{type}/{id}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    path: web::Path<(String, i64)>,
) -> ApiResult<HttpResponse> {
    let id = spot_id_from_path(path.into_inner())?;
    run_blocking(&state.favorites, move |service| service.remove(&id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
