//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The viewport spans more than the allowed number of degrees.
    #[schema(rename = "viewport_too_large")]
    ViewportTooLarge,
    /// Every geodata endpoint failed.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The routing service produced no route.
    #[schema(rename = "route_unavailable")]
    RouteUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "viewport_too_large")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "表示範囲が広すぎます。ズームインしてください")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Category`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Category)]
pub enum CategorySchema {
    #[schema(rename = "hotel_with_dog")]
    HotelWithDog,
    #[schema(rename = "dog_cafe")]
    DogCafe,
    #[schema(rename = "pet_hotel")]
    PetHotel,
    #[schema(rename = "grooming")]
    Grooming,
    #[schema(rename = "pet_shop")]
    PetShop,
    #[schema(rename = "dog_park")]
    DogPark,
    #[schema(rename = "veterinary")]
    Veterinary,
}

/// OpenAPI schema for [`crate::domain::Spot`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Spot, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SpotSchema {
    /// `"<type>/<numeric id>"`.
    #[schema(example = "node/123456")]
    id: String,
    #[schema(example = "代々木公園ドッグラン")]
    name: String,
    category: CategorySchema,
    #[schema(example = 35.6717)]
    lat: f64,
    #[schema(example = 139.6949)]
    lng: f64,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    /// OSM `opening_hours` value.
    opening_hours: Option<String>,
    /// Original OSM tags.
    tags: BTreeMap<String, String>,
}

/// OpenAPI schema for [`crate::domain::FavoriteSpot`].
///
/// On the wire the spot fields sit flat alongside `savedAt`.
#[derive(ToSchema)]
#[schema(as = crate::domain::FavoriteSpot, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FavoriteSpotSchema {
    #[schema(example = "way/987654")]
    id: String,
    name: String,
    category: CategorySchema,
    lat: f64,
    lng: f64,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    opening_hours: Option<String>,
    tags: BTreeMap<String, String>,
    /// Milliseconds since the Unix epoch.
    #[schema(example = 1_767_225_600_000_i64)]
    saved_at: i64,
}
