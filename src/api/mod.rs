//! API Module
//!
//! HTTP handlers and routing for the diagnostics service.
//!
//! # Endpoints
//! - `GET /fetch/:store/*key` - Cache-or-coalesced fetch
//! - `PUT /optimistic` - Optimistic write
//! - `DELETE /invalidate/:pattern` - Cross-store substring purge
//! - `POST /preload` - Asset preload
//! - `GET /stats` - Statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
