//! Domain primitives, services and ports.
//!
//! Purpose: hold everything that decides behaviour (category registry,
//! classification, query construction, viewport state machine, favorites and
//! routing use cases) independent of HTTP, WebSocket or filesystem concerns.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Category / CategoryRule: the fixed place taxonomy.
//! - BoundingBox: viewport rectangle.
//! - Spot / FavoriteSpot / RawGeoElement: geodata as seen by the map.
//! - SpotSearchService, ViewportController, FavoritesService, RoutingService.

pub mod bounding_box;
pub mod category;
pub mod classification;
pub mod error;
pub mod favorites;
pub mod ports;
pub mod query;
pub mod routing;
pub mod spot;
pub mod spot_search;
pub mod trace_id;
pub mod viewport;

pub use self::bounding_box::{BoundingBox, BoundingBoxError, DEFAULT_MAX_SPAN_DEGREES};
pub use self::category::{CATEGORY_RULES, Category, CategoryRule, UnknownCategory};
pub use self::error::{Error, ErrorCode};
pub use self::favorites::FavoritesService;
pub use self::routing::{LatLng, RouteInfo, RoutingService};
pub use self::spot::{ElementType, FavoriteSpot, RawGeoElement, Spot};
pub use self::spot_search::SpotSearchService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::viewport::{ViewportController, ViewportPhase, ViewportSettings, ViewportSnapshot};
