//! HTTP request handlers for API endpoints.

pub mod dashboard;
pub mod health;
pub mod index;
