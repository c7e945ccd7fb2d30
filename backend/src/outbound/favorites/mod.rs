//! Favorites storage adapters.

mod atomic_io;
mod json_file;

pub use json_file::{JsonFileFavoritesRepository, file_name_for_key};
