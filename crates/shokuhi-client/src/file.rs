//! Boundary data read from a local GeoJSON file (offline mode).

use std::path::{Path, PathBuf};

use tracing::info;

use shokuhi_core::boundary::BoundarySet;
use shokuhi_core::error::AppError;
use shokuhi_core::traits::BoundarySource;

#[derive(Debug, Clone)]
pub struct LocalBoundaryFile {
    path: PathBuf,
    join_property: String,
}

impl LocalBoundaryFile {
    pub fn new(path: impl Into<PathBuf>, join_property: &str) -> Self {
        Self {
            path: path.into(),
            join_property: join_property.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoundarySource for LocalBoundaryFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<BoundarySet, AppError> {
        info!(path = %self.path.display(), "Reading boundary GeoJSON");
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Boundary(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        BoundarySet::from_geojson_str(&text, &self.join_property)
    }
}
