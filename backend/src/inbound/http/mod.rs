//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod favorites;
pub mod health;
pub mod routing;
pub mod schemas;
pub mod site;
pub mod spots;
pub mod state;
pub mod validation;

pub use error::ApiResult;
pub use validation::json_config;
