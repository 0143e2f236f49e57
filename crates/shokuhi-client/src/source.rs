//! Boundary source selection and enum dispatch.
//!
//! [`BoundarySource`] uses `impl Future` return types (RPITIT) and is not
//! object-safe, so the concrete sources are wrapped in [`BoundarySourceEnum`]
//! for static dispatch.

use std::path::Path;

use shokuhi_core::boundary::BoundarySet;
use shokuhi_core::config::DashboardConfig;
use shokuhi_core::error::AppError;
use shokuhi_core::traits::BoundarySource;

use crate::file::LocalBoundaryFile;
use crate::geojson::GeoJsonClient;

#[derive(Debug, Clone)]
pub enum BoundarySourceEnum {
    /// Document fetched over HTTP.
    Remote(GeoJsonClient),
    /// Document read from disk.
    Local(LocalBoundaryFile),
}

impl BoundarySourceEnum {
    /// Picks the local file when one is given, the configured URL otherwise.
    pub fn from_config(
        config: &DashboardConfig,
        boundary_file: Option<&Path>,
    ) -> Result<Self, AppError> {
        match boundary_file {
            Some(path) => Ok(Self::Local(LocalBoundaryFile::new(
                path,
                &config.boundary_join_property,
            ))),
            None => Ok(Self::Remote(GeoJsonClient::new(
                &config.boundary_url,
                &config.boundary_join_property,
                &config.http,
            )?)),
        }
    }
}

impl BoundarySource for BoundarySourceEnum {
    fn describe(&self) -> String {
        match self {
            Self::Remote(c) => c.describe(),
            Self::Local(f) => f.describe(),
        }
    }

    async fn load(&self) -> Result<BoundarySet, AppError> {
        match self {
            Self::Remote(c) => c.load().await,
            Self::Local(f) => f.load().await,
        }
    }
}
