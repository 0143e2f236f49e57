//! Response DTOs for API endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use shokuhi_core::charts::{Bar, MapRegion, ScatterPoint};
use shokuhi_core::dashboard::{BarSection, MapSection, ScatterSection};
use shokuhi_core::{
    ComparisonView, CorrelationView, DashboardView, DetailRow, Notice, TablePreview,
};

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("healthy")
    pub status: String,
    /// Server version
    pub version: String,
    /// Whether the boundary data has been fetched and cached yet
    pub boundaries_loaded: bool,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Everything the dashboard page shows for one upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Encoding the upload was decoded with
    #[schema(example = "Shift_JIS")]
    pub encoding: String,
    /// First rows of the upload
    pub preview: PreviewDto,
    /// Column treated as the region identifier
    #[schema(example = "都道府県")]
    pub region_column: String,
    /// Selectable categories
    pub categories: Vec<String>,
    /// Category in use; absent when the upload has no category columns
    pub category: Option<String>,
    /// Distinct region values of the upload, sorted
    pub region_options: Vec<String>,
    /// Regions in use
    pub selected_regions: Vec<String>,
    /// Advisory maximum for the region selection
    pub max_regions: usize,
    /// Charts and tables; absent when no region is selected
    pub comparison: Option<ComparisonDto>,
    /// Messages for the user, in order
    pub notices: Vec<NoticeDto>,
}

impl From<DashboardView> for DashboardResponse {
    fn from(v: DashboardView) -> Self {
        Self {
            encoding: v.encoding,
            preview: v.preview.into(),
            region_column: v.region_column,
            categories: v.categories,
            category: v.category,
            region_options: v.region_options,
            selected_regions: v.selected_regions,
            max_regions: v.max_regions,
            comparison: v.comparison.map(Into::into),
            notices: v.notices.into_iter().map(Into::into).collect(),
        }
    }
}

/// Head-of-file preview.
#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewDto {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row count of the whole upload
    pub total_rows: usize,
}

impl From<TablePreview> for PreviewDto {
    fn from(p: TablePreview) -> Self {
        Self {
            headers: p.headers,
            rows: p.rows,
            total_rows: p.total_rows,
        }
    }
}

/// A message for the user.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeDto {
    /// "info", "warning" or "error"
    #[schema(example = "warning")]
    pub level: String,
    pub message: String,
}

impl From<Notice> for NoticeDto {
    fn from(n: Notice) -> Self {
        let level = match n.level {
            shokuhi_core::NoticeLevel::Info => "info",
            shokuhi_core::NoticeLevel::Warning => "warning",
            shokuhi_core::NoticeLevel::Error => "error",
        };
        Self {
            level: level.to_string(),
            message: n.message,
        }
    }
}

/// Views that depend on the selected regions.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComparisonDto {
    pub bar: BarChartDto,
    /// Absent when the boundary data could not be loaded
    pub map: Option<MapDto>,
    /// Selected rows sorted by value, descending
    pub details: Vec<DetailRowDto>,
    /// Absent when the upload has a single category
    pub correlation: Option<CorrelationDto>,
}

impl From<ComparisonView> for ComparisonDto {
    fn from(c: ComparisonView) -> Self {
        Self {
            bar: c.bar.into(),
            map: c.map.map(Into::into),
            details: c.details.into_iter().map(Into::into).collect(),
            correlation: c.correlation.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BarChartDto {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<BarDto>,
    /// Rendered chart as an SVG document
    pub svg: String,
}

impl From<BarSection> for BarChartDto {
    fn from(s: BarSection) -> Self {
        Self {
            title: s.chart.title,
            x_label: s.chart.x_label,
            y_label: s.chart.y_label,
            bars: s.chart.bars.into_iter().map(Into::into).collect(),
            svg: s.svg,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BarDto {
    pub region: String,
    pub value: f64,
}

impl From<Bar> for BarDto {
    fn from(b: Bar) -> Self {
        Self {
            region: b.region,
            value: b.value,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MapDto {
    pub title: String,
    /// One entry per boundary feature
    pub regions: Vec<MapRegionDto>,
    /// Upload regions with no boundary feature of the same name
    pub unmatched_regions: Vec<String>,
    /// Lower end of the color scale
    pub min_value: Option<f64>,
    /// Upper end of the color scale
    pub max_value: Option<f64>,
    /// Rendered map as an SVG document
    pub svg: String,
}

impl From<MapSection> for MapDto {
    fn from(s: MapSection) -> Self {
        Self {
            title: s.map.title,
            regions: s.map.regions.into_iter().map(Into::into).collect(),
            unmatched_regions: s.map.unmatched_regions,
            min_value: s.map.scale.map(|scale| scale.min),
            max_value: s.map.scale.map(|scale| scale.max),
            svg: s.svg,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MapRegionDto {
    pub name: String,
    pub value: Option<f64>,
    /// Fill color as `#rrggbb`
    pub color: Option<String>,
}

impl From<MapRegion> for MapRegionDto {
    fn from(r: MapRegion) -> Self {
        Self {
            name: r.name,
            value: r.value,
            color: r.color,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetailRowDto {
    pub region: String,
    pub value: Option<f64>,
}

impl From<DetailRow> for DetailRowDto {
    fn from(r: DetailRow) -> Self {
        Self {
            region: r.region,
            value: r.value,
        }
    }
}

/// Scatter axes and correlation summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct CorrelationDto {
    pub x_options: Vec<String>,
    /// Categories other than the chosen x
    pub y_options: Vec<String>,
    pub x: String,
    pub y: String,
    /// "computed", "same_axis" or "undefined"
    #[schema(example = "computed")]
    pub status: String,
    /// Pearson coefficient over every row with both values
    pub coefficient: Option<f64>,
    /// Bucket key, e.g. "strong_positive"
    pub strength: Option<String>,
    /// Bucket label shown to users
    pub strength_label: Option<String>,
    /// Sentence describing the result, or the prompt to pick other axes
    pub summary: String,
    pub scatter: Option<ScatterDto>,
}

impl From<CorrelationView> for CorrelationDto {
    fn from(c: CorrelationView) -> Self {
        let status = match c.status {
            shokuhi_core::CorrelationStatus::Computed => "computed",
            shokuhi_core::CorrelationStatus::SameAxis => "same_axis",
            shokuhi_core::CorrelationStatus::Undefined => "undefined",
        };
        Self {
            x_options: c.x_options,
            y_options: c.y_options,
            x: c.x,
            y: c.y,
            status: status.to_string(),
            coefficient: c.coefficient,
            strength: c.strength.map(|s| s.as_str().to_string()),
            strength_label: c.strength.map(|s| s.label().to_string()),
            summary: c.summary,
            scatter: c.scatter.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScatterDto {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPointDto>,
    /// Rendered plot as an SVG document
    pub svg: String,
}

impl From<ScatterSection> for ScatterDto {
    fn from(s: ScatterSection) -> Self {
        Self {
            title: s.plot.title,
            x_label: s.plot.x_label,
            y_label: s.plot.y_label,
            points: s.plot.points.into_iter().map(Into::into).collect(),
            svg: s.svg,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScatterPointDto {
    pub region: String,
    pub x: f64,
    pub y: f64,
    /// Region is in the selection
    pub highlighted: bool,
    pub color: String,
}

impl From<ScatterPoint> for ScatterPointDto {
    fn from(p: ScatterPoint) -> Self {
        Self {
            region: p.region,
            x: p.x,
            y: p.y,
            highlighted: p.highlighted,
            color: p.color,
        }
    }
}
