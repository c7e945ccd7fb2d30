//! Driven port for the single-key favorites storage.
//!
//! The port is synchronous: the whole collection is read and written in one
//! step, mirroring a key/value store. Adapters treat missing or malformed
//! content as an empty collection.

use std::sync::Mutex;

use super::define_port_error;
use crate::domain::FavoriteSpot;

/// Storage key holding the favorites collection.
pub const FAVORITES_KEY: &str = "dog-friendly-map:favorites";

define_port_error! {
    /// Errors surfaced by favorites storage adapters.
    pub enum FavoritesRepositoryError {
        /// Writing the collection failed.
        Storage { message: String } =>
            "favorites storage failed: {message}",
    }
}

/// Port for loading and saving the favorites collection.
#[cfg_attr(test, mockall::automock)]
pub trait FavoritesRepository: Send + Sync {
    /// Load the stored collection in insertion order.
    ///
    /// Never fails: unreadable or malformed content yields an empty list.
    fn load(&self) -> Vec<FavoriteSpot>;

    /// Replace the stored collection.
    fn save(&self, favorites: &[FavoriteSpot]) -> Result<(), FavoritesRepositoryError>;
}

/// In-memory repository used by tests and the fixture server wiring.
#[derive(Debug, Default)]
pub struct InMemoryFavoritesRepository {
    favorites: Mutex<Vec<FavoriteSpot>>,
}

impl FavoritesRepository for InMemoryFavoritesRepository {
    fn load(&self) -> Vec<FavoriteSpot> {
        self.favorites
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn save(&self, favorites: &[FavoriteSpot]) -> Result<(), FavoritesRepositoryError> {
        let mut guard = self
            .favorites
            .lock()
            .map_err(|err| FavoritesRepositoryError::storage(err.to_string()))?;
        *guard = favorites.to_vec();
        Ok(())
    }
}
