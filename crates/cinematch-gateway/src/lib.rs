//! HTTP boundary for the query pipeline: one POST endpoint and a health check.

mod error;
mod handlers;
mod router;
mod server;

pub use error::{ApiError, GatewayError};
pub use server::GatewayServer;
