//! Shokuhi Core - Domain types, analysis and rendering for the dashboard.
//!
//! This crate provides the core functionality for Shokuhi, including:
//!
//! - **Ingest**: encoding detection and CSV parsing into a [`Dataset`]
//! - **Selection**: region column inference, category choice, region filtering
//! - **Analysis**: the detail table and Pearson correlation with verbal buckets
//! - **Charts**: [`BarChart`], [`ChoroplethMap`], [`ScatterPlot`] models and their SVG renderings
//! - **Services**: [`DashboardService`] tying the steps above into one interaction
//! - **Traits**: [`BoundarySource`] for the boundary geometry used by the map
//!
//! # Architecture
//!
//! This crate is designed to be reusable by different frontends (CLI, server, etc.).
//! The only external resource, the boundary GeoJSON, sits behind the
//! [`BoundarySource`] trait and is cached process-wide by [`BoundaryCache`].
//! Concrete sources live in `shokuhi-client`.
//!
//! # Example
//!
//! ```ignore
//! use shokuhi_core::{DashboardConfig, DashboardRequest, DashboardService};
//!
//! let service = DashboardService::new(source, DashboardConfig::default());
//! let request = DashboardRequest {
//!     category: Some("米".to_string()),
//!     regions: Some(vec!["東京都".to_string(), "大阪府".to_string()]),
//!     ..Default::default()
//! };
//! let view = service.render(&csv_bytes, &request).await?;
//! ```

pub mod boundary;
pub mod charts;
pub mod config;
pub mod correlation;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod selection;
pub mod traits;

// Configuration
pub use config::{DashboardConfig, HttpConfig, default_config_path, load_dashboard_config};

// Error handling
pub use error::AppError;

// Tabular data
pub use dataset::{Column, ColumnHandle, ColumnKind, Dataset, TablePreview, infer_region_column};
pub use ingest::{ParsedUpload, detect_encoding, ingest_bytes, ingest_reader, parse_csv};

// Selection and analysis
pub use correlation::{CorrelationStrength, column_correlation, pearson};
pub use selection::{
    DetailRow, FilteredRows, RegionSelection, detail_table, filter_rows, select_regions,
};

// Boundary data
pub use boundary::{BoundaryCache, BoundaryFeature, BoundarySet, Bounds};

// Figures
pub use charts::{BarChart, ChoroplethMap, ColorScale, ScatterPlot};

// Traits for dependency injection
pub use traits::BoundarySource;

// Services (generic over trait implementations)
pub use dashboard::{
    ComparisonView, CorrelationStatus, CorrelationView, DashboardRequest, DashboardService,
    DashboardView, Notice, NoticeLevel, SAME_AXIS_PROMPT,
};
