//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `PUT /cache` / `DELETE /cache` - Store a value / clear everything
//! - `GET /cache/:key` / `DELETE /cache/:key` - Read / invalidate a key
//! - `POST /cache/cleanup` - Sweep expired entries
//! - `GET /prayer-times` - Read-through prayer schedule
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
