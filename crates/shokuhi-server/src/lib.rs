//! Shokuhi Server - Web dashboard for prefectural food-expenditure data
//!
//! This crate serves the dashboard over HTTP:
//!
//! - **Page**: `GET /` returns the single-page dashboard
//! - **Dashboard**: `POST /api/v1/dashboard` renders charts and tables for an uploaded CSV
//! - **Health**: `GET /api/v1/health`
//!
//! # API Documentation
//!
//! When running the server, interactive API documentation is available
//! at `/swagger-ui`.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
