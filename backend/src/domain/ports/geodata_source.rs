//! Driven port for running one Overpass query against one endpoint.
//!
//! Each configured endpoint is a separate source; failover across them is a
//! domain concern handled by the spot search service.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::spot::RawGeoElement;

define_port_error! {
    /// Errors surfaced while querying a geodata endpoint.
    pub enum GeodataSourceError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "geodata transport failed: {message}",
        /// The request exceeded its timeout.
        Timeout { message: String } =>
            "geodata request timed out: {message}",
        /// The endpoint answered with a non-success status.
        Status { status: u16, message: String } =>
            "geodata endpoint returned status {status}: {message}",
        /// The response body was not the expected JSON.
        Decode { message: String } =>
            "geodata response decode failed: {message}",
    }
}

/// Port for a single geodata endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeodataSource: Send + Sync {
    /// Endpoint label used in logs and error details.
    fn endpoint(&self) -> &str;

    /// Run an Overpass QL query and return the decoded elements.
    async fn run_query(&self, query: &str) -> Result<Vec<RawGeoElement>, GeodataSourceError>;
}

/// Fixture source returning a fixed element list.
#[derive(Debug, Clone, Default)]
pub struct FixtureGeodataSource {
    elements: Vec<RawGeoElement>,
}

impl FixtureGeodataSource {
    /// Source that always returns `elements`.
    #[must_use]
    pub fn new(elements: Vec<RawGeoElement>) -> Self {
        Self { elements }
    }
}

#[async_trait]
impl GeodataSource for FixtureGeodataSource {
    fn endpoint(&self) -> &str {
        "fixture"
    }

    async fn run_query(&self, _query: &str) -> Result<Vec<RawGeoElement>, GeodataSourceError> {
        Ok(self.elements.clone())
    }
}
