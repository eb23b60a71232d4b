//! # HTTP Server Module
//!
//! Thin JSON transport over the session manager.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /observability/metrics` - Service counters
//! - `GET /api/domains` - Available domains
//! - `POST /api/domains/:domain/sessions` - Start a session
//! - `POST /api/sessions/:session_id/answer` - Answer the pending question
//! - `GET /api/sessions/:session_id` - Session status

pub mod config;
pub mod diagnostic_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
