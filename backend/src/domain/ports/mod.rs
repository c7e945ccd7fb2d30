//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod favorites_repository;
mod geodata_source;
mod route_source;
mod spots_query;

#[cfg(test)]
pub use favorites_repository::MockFavoritesRepository;
pub use favorites_repository::{
    FAVORITES_KEY, FavoritesRepository, FavoritesRepositoryError, InMemoryFavoritesRepository,
};
#[cfg(test)]
pub use geodata_source::MockGeodataSource;
pub use geodata_source::{FixtureGeodataSource, GeodataSource, GeodataSourceError};
#[cfg(test)]
pub use route_source::MockRouteSource;
pub use route_source::{FixtureRouteSource, RouteSource, RouteSourceError};
#[cfg(test)]
pub use spots_query::MockSpotsQuery;
pub use spots_query::{FixtureSpotsQuery, SpotsQuery};
