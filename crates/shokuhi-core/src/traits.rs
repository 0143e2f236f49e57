//! Trait definitions for external dependencies.
//!
//! The dashboard needs exactly one external resource: the boundary geometry
//! used by the choropleth map. [`BoundarySource`] abstracts where it comes
//! from (an HTTP endpoint, a local file, a test double), so core logic and
//! its tests never touch the network.
//!
//! # Example
//!
//! ```
//! use shokuhi_core::traits::BoundarySource;
//! use shokuhi_core::{AppError, BoundarySet};
//!
//! async fn region_count<S: BoundarySource>(source: &S) -> Result<usize, AppError> {
//!     Ok(source.load().await?.features().len())
//! }
//! ```

use std::future::Future;

use crate::{AppError, BoundarySet};

/// Provider of the boundary dataset joined against the region column.
pub trait BoundarySource: Send + Sync + Clone {
    /// Human-readable location of the data, for logs.
    fn describe(&self) -> String;

    /// Loads and parses the full boundary set.
    ///
    /// Called at most once per successful load by [`crate::BoundaryCache`].
    fn load(&self) -> impl Future<Output = Result<BoundarySet, AppError>> + Send;
}
