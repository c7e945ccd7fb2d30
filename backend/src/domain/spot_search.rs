//! Spot lookup with ordered endpoint failover.
//!
//! The service builds the combined category query once, asks each geodata
//! source in priority order until one answers, then classifies the returned
//! elements locally. Endpoints are never retried; a failure moves on to the
//! next source.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{GeodataSource, SpotsQuery};
use crate::domain::query::{DEFAULT_QUERY_TIMEOUT_SECONDS, build_overpass_query};
use crate::domain::{BoundingBox, Error, ErrorCode, Spot};

/// Spot search service implementing [`SpotsQuery`].
#[derive(Clone)]
pub struct SpotSearchService {
    sources: Vec<Arc<dyn GeodataSource>>,
    query_timeout_seconds: u32,
}

impl SpotSearchService {
    /// Create a service trying `sources` in the given order.
    pub fn new(sources: Vec<Arc<dyn GeodataSource>>) -> Self {
        Self {
            sources,
            query_timeout_seconds: DEFAULT_QUERY_TIMEOUT_SECONDS,
        }
    }

    /// Override the timeout hint embedded in the query.
    #[must_use]
    pub fn with_query_timeout(mut self, seconds: u32) -> Self {
        self.query_timeout_seconds = seconds;
        self
    }

    /// Number of configured sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

#[async_trait]
impl SpotsQuery for SpotSearchService {
    async fn find_spots(&self, bbox: &BoundingBox) -> Result<Vec<Spot>, Error> {
        let query = build_overpass_query(bbox, self.query_timeout_seconds);
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            match source.run_query(&query).await {
                Ok(elements) => {
                    let received = elements.len();
                    let spots: Vec<Spot> =
                        elements.into_iter().filter_map(Spot::from_element).collect();
                    debug!(
                        endpoint = source.endpoint(),
                        received,
                        kept = spots.len(),
                        "geodata query answered"
                    );
                    return Ok(spots);
                }
                Err(error) => {
                    warn!(endpoint = source.endpoint(), %error, "geodata endpoint failed");
                    attempts.push(json!({
                        "endpoint": source.endpoint(),
                        "error": error.to_string(),
                    }));
                }
            }
        }

        Err(Error::from_code(ErrorCode::ServiceUnavailable)
            .with_details(json!({ "attempts": attempts })))
    }
}
