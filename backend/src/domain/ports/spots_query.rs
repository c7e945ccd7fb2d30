//! Driving port for looking up classified spots inside a viewport.

use async_trait::async_trait;

use crate::domain::{BoundingBox, Error, Spot};

/// Domain use-case port for spot lookups.
///
/// Fails with [`crate::domain::ErrorCode::ServiceUnavailable`] when no
/// geodata endpoint could answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotsQuery: Send + Sync {
    /// Classified spots inside `bbox`, in the order the service returned them.
    async fn find_spots(&self, bbox: &BoundingBox) -> Result<Vec<Spot>, Error>;
}

/// Fixture query returning a fixed spot list for any viewport.
#[derive(Debug, Clone, Default)]
pub struct FixtureSpotsQuery {
    spots: Vec<Spot>,
}

impl FixtureSpotsQuery {
    /// Query that always answers with `spots`.
    #[must_use]
    pub fn new(spots: Vec<Spot>) -> Self {
        Self { spots }
    }
}

#[async_trait]
impl SpotsQuery for FixtureSpotsQuery {
    async fn find_spots(&self, _bbox: &BoundingBox) -> Result<Vec<Spot>, Error> {
        Ok(self.spots.clone())
    }
}
