//! File-backed favorites repository.
//!
//! The namespaced storage key maps to one JSON file inside a configured
//! directory. Writes replace the file atomically.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::{debug, warn};

use super::atomic_io::write_atomic;
use crate::domain::FavoriteSpot;
use crate::domain::ports::{FAVORITES_KEY, FavoritesRepository, FavoritesRepositoryError};

/// File name used for a storage key: `:` becomes `.`, plus a `.json` suffix.
///
/// # Examples
/// ```
/// use dogspot::outbound::favorites::file_name_for_key;
///
/// assert_eq!(file_name_for_key("dog-friendly-map:favorites"), "dog-friendly-map.favorites.json");
/// ```
#[must_use]
pub fn file_name_for_key(key: &str) -> String {
    format!("{}.json", key.replace(':', "."))
}

/// Favorites repository storing a JSON array in one file.
pub struct JsonFileFavoritesRepository {
    dir: Dir,
    root: Utf8PathBuf,
    file_name: Utf8PathBuf,
}

impl JsonFileFavoritesRepository {
    /// Open (creating if needed) `directory` and store favorites under the
    /// default key.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or opened.
    pub fn open(directory: &Utf8Path) -> io::Result<Self> {
        Self::open_with_key(directory, FAVORITES_KEY)
    }

    /// Open `directory` and store favorites under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or opened.
    pub fn open_with_key(directory: &Utf8Path, key: &str) -> io::Result<Self> {
        std::fs::create_dir_all(directory)?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority())?;
        Ok(Self {
            dir,
            root: directory.to_path_buf(),
            file_name: Utf8PathBuf::from(file_name_for_key(key)),
        })
    }

    /// Full path of the backing file, for logs and diagnostics.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.root.join(&self.file_name)
    }
}

impl FavoritesRepository for JsonFileFavoritesRepository {
    fn load(&self) -> Vec<FavoriteSpot> {
        let bytes = match self.dir.read(&self.file_name) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path(), "no favorites stored yet");
                return Vec::new();
            }
            Err(err) => {
                warn!(path = %self.path(), error = %err, "favorites unreadable; treating as empty");
                return Vec::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(path = %self.path(), error = %err, "favorites malformed; treating as empty");
            Vec::new()
        })
    }

    fn save(&self, favorites: &[FavoriteSpot]) -> Result<(), FavoritesRepositoryError> {
        let payload = serde_json::to_vec(favorites)
            .map_err(|err| FavoritesRepositoryError::storage(err.to_string()))?;
        write_atomic(&self.dir, &self.file_name, &payload).map_err(|err| {
            FavoritesRepositoryError::storage(format!("{}: {err}", self.path()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Spot};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Store {
        _tmp: TempDir,
        root: Utf8PathBuf,
        repository: JsonFileFavoritesRepository,
    }

    #[fixture]
    fn store() -> Store {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().join("favorites")).expect("utf8 path");
        let repository = JsonFileFavoritesRepository::open(&root).expect("open store");
        Store {
            _tmp: tmp,
            root,
            repository,
        }
    }

    fn favorite(id: &str, saved_at: i64) -> FavoriteSpot {
        FavoriteSpot {
            spot: Spot {
                id: id.to_owned(),
                name: "ドッグラン".to_owned(),
                category: Category::DogPark,
                lat: 35.0,
                lng: 139.0,
                address: Some("東京都".to_owned()),
                phone: None,
                website: None,
                opening_hours: None,
                tags: Default::default(),
            },
            saved_at,
        }
    }

    #[rstest]
    fn missing_file_reads_as_empty(store: Store) {
        assert!(store.repository.load().is_empty());
    }

    #[rstest]
    fn saved_collection_round_trips_in_order(store: Store) {
        let favorites = vec![favorite("way/2", 2), favorite("node/1", 1)];
        store.repository.save(&favorites).expect("save");

        assert_eq!(store.repository.load(), favorites);
        let on_disk = std::fs::read_to_string(store.root.join("dog-friendly-map.favorites.json"))
            .expect("file exists");
        assert!(on_disk.starts_with('['));
        assert!(on_disk.contains("\"savedAt\":2"));
    }

    #[rstest]
    #[case::not_json("{{{")]
    #[case::wrong_shape(r#"{"favorites": []}"#)]
    #[case::empty("")]
    fn malformed_content_reads_as_empty(store: Store, #[case] content: &str) {
        std::fs::write(store.repository.path(), content).expect("write garbage");
        assert!(store.repository.load().is_empty());
    }

    #[rstest]
    fn keys_are_isolated(store: Store) {
        let other = JsonFileFavoritesRepository::open_with_key(&store.root, "other:favorites")
            .expect("open other key");
        store
            .repository
            .save(&[favorite("node/1", 1)])
            .expect("save");
        assert!(other.load().is_empty());
    }
}
