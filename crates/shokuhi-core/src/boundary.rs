//! Boundary geometry for the choropleth map and its process-wide cache.

use std::sync::Arc;

use geojson::{GeoJson, PolygonType, Value};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::traits::BoundarySource;

/// A closed ring of (longitude, latitude) points.
pub type Ring = Vec<(f64, f64)>;

/// Axis-aligned bounding box in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of a set of points, `None` when empty.
    pub fn of_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a (f64, f64)>,
    {
        points.into_iter().fold(None, |acc: Option<Bounds>, &(x, y)| {
            Some(match acc {
                None => Bounds {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the box by `ratio` of its size on every side (at least a small epsilon).
    pub fn padded(self, ratio: f64) -> Bounds {
        let dx = ((self.max_x - self.min_x) * ratio).max(0.01);
        let dy = ((self.max_y - self.min_y) * ratio).max(0.01);
        Bounds {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One named region outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Value of the join property, compared verbatim against region names.
    pub name: String,
    /// Exterior rings of every polygon of the feature.
    pub rings: Vec<Ring>,
}

impl BoundaryFeature {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.rings.iter().flatten())
    }
}

/// Read-only boundary dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    features: Vec<BoundaryFeature>,
}

impl BoundarySet {
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        Self { features }
    }

    /// Parses a GeoJSON FeatureCollection.
    ///
    /// Each feature's name is read from `join_property`; features without a
    /// string value there are skipped. Polygon and MultiPolygon geometries
    /// contribute their exterior rings; other geometry types are ignored.
    pub fn from_geojson_str(text: &str, join_property: &str) -> Result<Self, AppError> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| AppError::Boundary(e.to_string()))?;

        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            _ => {
                return Err(AppError::Boundary(
                    "expected a GeoJSON FeatureCollection".to_string(),
                ));
            }
        };

        let mut features = Vec::with_capacity(collection.features.len());
        let mut skipped = 0usize;
        for feature in collection.features {
            let name = match feature.property(join_property).and_then(|v| v.as_str()) {
                Some(name) => name.to_string(),
                None => {
                    skipped += 1;
                    continue;
                }
            };

            let rings = match feature.geometry.map(|g| g.value) {
                Some(Value::Polygon(polygon)) => exterior_ring(polygon).into_iter().collect(),
                Some(Value::MultiPolygon(polygons)) => {
                    polygons.into_iter().filter_map(exterior_ring).collect()
                }
                _ => Vec::new(),
            };

            features.push(BoundaryFeature { name, rings });
        }

        if skipped > 0 {
            warn!(
                skipped,
                join_property, "Boundary features without a join name were skipped"
            );
        }

        Ok(Self { features })
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name)
    }

    /// Bounds of all features.
    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(BoundaryFeature::bounds)
            .reduce(Bounds::union)
    }
}

fn exterior_ring(polygon: PolygonType) -> Option<Ring> {
    let ring: Ring = polygon
        .into_iter()
        .next()?
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(|p| (p[0], p[1]))
        .collect();
    (ring.len() >= 3).then_some(ring)
}

/// Process-wide, lazily loaded boundary set.
///
/// The first caller loads from the source; concurrent callers wait for that
/// same load. A successful result is kept for the life of the cache and
/// shared by every clone. A failed load is not kept, so the next caller tries
/// again.
pub struct BoundaryCache<S: BoundarySource> {
    source: S,
    cell: Arc<OnceCell<Arc<BoundarySet>>>,
}

impl<S: BoundarySource> Clone for BoundaryCache<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<S: BoundarySource> BoundaryCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Returns the cached set, loading it on first use.
    pub async fn get(&self) -> Result<Arc<BoundarySet>, AppError> {
        self.cell
            .get_or_try_init(|| async {
                info!(source = %self.source.describe(), "Loading boundary data");
                let set = self.source.load().await?;
                info!(features = set.features().len(), "Boundary data cached");
                Ok::<_, AppError>(Arc::new(set))
            })
            .await
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        let loaded = self.cell.initialized();
        debug!(loaded, "Boundary cache state");
        loaded
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
