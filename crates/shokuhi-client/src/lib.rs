//! Shokuhi Client - Boundary data sources
//!
//! This crate provides the implementations of
//! [`BoundarySource`](shokuhi_core::traits::BoundarySource) used by the
//! dashboard:
//!
//! - [`geojson`] - GeoJSON document fetched over HTTP
//! - [`file`] - GeoJSON document read from a local file
//! - [`source`] - enum dispatch and selection from configuration

pub mod file;
pub mod geojson;
pub mod source;

// Re-export main client types
pub use file::LocalBoundaryFile;
pub use geojson::GeoJsonClient;
pub use source::BoundarySourceEnum;
