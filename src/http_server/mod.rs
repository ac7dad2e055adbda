//! # sqlgate HTTP Server Module
//!
//! The request gateway: decodes statement payloads, dispatches them to the
//! engine adapter and renders the uniform JSON envelope.
//!
//! # Endpoints
//!
//! Gateway listener:
//! - `POST /exec` - Run a mutating statement
//! - `POST /query` - Run a reading statement and count its rows
//! - anything else - 404, empty body
//!
//! Metrics listener (optional):
//! - `GET /metrics` - Metrics snapshot as JSON
//! - `GET /health` - Health check

pub mod config;
pub mod envelope;
pub mod errors;
pub mod gateway_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use envelope::{ExecutionResponse, StatementRequest};
pub use errors::{GatewayError, GatewayResult};
pub use gateway_routes::{gateway_routes, GatewayState};
pub use server::HttpServer;
