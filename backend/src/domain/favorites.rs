//! Favorites service over the single-key repository.
//!
//! Every operation is a whole-collection read-modify-write. A process-wide
//! lock serialises operations issued through one service; writers in other
//! processes follow last-writer-wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{FavoritesRepository, FavoritesRepositoryError};
use crate::domain::{Error, FavoriteSpot, Spot};

/// Favorites use cases.
#[derive(Clone)]
pub struct FavoritesService {
    repository: Arc<dyn FavoritesRepository>,
    clock: Arc<dyn Clock>,
    write_lock: Arc<Mutex<()>>,
}

impl FavoritesService {
    /// Create a service storing through `repository`, timestamping with `clock`.
    pub fn new(repository: Arc<dyn FavoritesRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn map_storage_error(err: FavoritesRepositoryError) -> Error {
        error!(error = %err, "favorites write failed");
        Error::internal(err.to_string())
    }

    fn save(&self, favorites: &[FavoriteSpot]) -> Result<(), Error> {
        self.repository
            .save(favorites)
            .map_err(Self::map_storage_error)
    }

    /// Saved spots in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<FavoriteSpot> {
        let _guard = self.lock();
        self.repository.load()
    }

    /// Whether a spot with `id` is saved.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        let _guard = self.lock();
        self.repository
            .load()
            .iter()
            .any(|favorite| favorite.spot.id == id)
    }

    /// Append `spot` unless its id is already saved.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InternalError`] when the write fails.
    pub fn add(&self, spot: Spot) -> Result<(), Error> {
        let _guard = self.lock();
        let mut favorites = self.repository.load();
        if favorites.iter().any(|favorite| favorite.spot.id == spot.id) {
            debug!(id = %spot.id, "spot already saved");
            return Ok(());
        }
        favorites.push(FavoriteSpot {
            spot,
            saved_at: self.clock.utc().timestamp_millis(),
        });
        self.save(&favorites)
    }

    /// Remove the spot with `id`; removing an unsaved id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InternalError`] when the write fails.
    pub fn remove(&self, id: &str) -> Result<(), Error> {
        let _guard = self.lock();
        let mut favorites = self.repository.load();
        let before = favorites.len();
        favorites.retain(|favorite| favorite.spot.id != id);
        if favorites.len() == before {
            return Ok(());
        }
        self.save(&favorites)
    }

    /// Flip the saved state of `spot` and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InternalError`] when the write fails.
    pub fn toggle(&self, spot: Spot) -> Result<bool, Error> {
        let _guard = self.lock();
        let mut favorites = self.repository.load();
        let before = favorites.len();
        favorites.retain(|favorite| favorite.spot.id != spot.id);
        let favorited = favorites.len() == before;
        if favorited {
            favorites.push(FavoriteSpot {
                spot,
                saved_at: self.clock.utc().timestamp_millis(),
            });
        }
        self.save(&favorites)?;
        Ok(favorited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::category::Category;
    use crate::domain::ports::{InMemoryFavoritesRepository, MockFavoritesRepository};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    const SAVED_AT: i64 = 1_700_000_000_000;

    fn spot(id: &str) -> Spot {
        Spot {
            id: id.to_owned(),
            name: "Run".to_owned(),
            category: Category::DogPark,
            lat: 35.0,
            lng: 139.0,
            address: None,
            phone: None,
            website: None,
            opening_hours: None,
            tags: Default::default(),
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_clock() -> Arc<dyn Clock> {
        let now = Utc
            .timestamp_millis_opt(SAVED_AT)
            .single()
            .expect("valid timestamp");
        Arc::new(FixedClock(now))
    }

    #[fixture]
    fn service() -> FavoritesService {
        FavoritesService::new(
            Arc::new(InMemoryFavoritesRepository::default()),
            fixed_clock(),
        )
    }

    fn ids(service: &FavoritesService) -> Vec<String> {
        service
            .list()
            .into_iter()
            .map(|favorite| favorite.spot.id)
            .collect()
    }

    #[rstest]
    fn add_then_list_contains_id(service: FavoritesService) {
        service.add(spot("node/1")).expect("add");
        service.add(spot("way/2")).expect("add");

        let favorites = service.list();
        assert_eq!(ids(&service), vec!["node/1", "way/2"]);
        assert!(favorites.iter().all(|favorite| favorite.saved_at == SAVED_AT));
        assert!(service.is_favorite("node/1"));
    }

    #[rstest]
    fn add_is_a_no_op_for_known_ids(service: FavoritesService) {
        service.add(spot("node/1")).expect("add");
        service.add(spot("node/1")).expect("add again");
        assert_eq!(ids(&service), vec!["node/1"]);
    }

    #[rstest]
    fn remove_then_list_lacks_id(service: FavoritesService) {
        service.add(spot("node/1")).expect("add");
        service.add(spot("node/2")).expect("add");
        service.remove("node/1").expect("remove");
        assert_eq!(ids(&service), vec!["node/2"]);
        assert!(!service.is_favorite("node/1"));
        service.remove("node/404").expect("removing unknown id");
    }

    #[rstest]
    fn toggle_twice_restores_original_state(service: FavoritesService) {
        assert!(service.toggle(spot("node/1")).expect("toggle on"));
        assert!(service.is_favorite("node/1"));
        assert!(!service.toggle(spot("node/1")).expect("toggle off"));
        assert!(service.list().is_empty());
    }

    #[test]
    fn write_failures_surface_as_internal_errors() {
        let mut repository = MockFavoritesRepository::new();
        repository.expect_load().returning(Vec::new);
        repository
            .expect_save()
            .times(1)
            .returning(|_| Err(FavoritesRepositoryError::storage("disk full")));
        let service = FavoritesService::new(Arc::new(repository), fixed_clock());

        let err = service.add(spot("node/1")).expect_err("write fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[test]
    fn removing_unknown_id_skips_the_write() {
        let mut repository = MockFavoritesRepository::new();
        repository.expect_load().returning(Vec::new);
        repository.expect_save().never();
        let service = FavoritesService::new(Arc::new(repository), fixed_clock());

        service.remove("node/1").expect("no-op");
    }
}
