//! Dashboard controller: one upload plus one set of choices in, one view out.
//!
//! [`DashboardService`] re-derives everything from the uploaded bytes on every
//! call. The only state it keeps between calls is the boundary cache.
//!
//! Failures split in two groups. Ingest failures (unreadable bytes, a
//! category or axis that does not exist) abort the render with an
//! [`AppError`]. Everything after ingest degrades into [`Notice`]s: an upload
//! without categories, non-numeric categories, too many regions, unknown
//! region names, equal scatter axes, and a boundary fetch that failed.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::boundary::BoundaryCache;
use crate::charts::{BarChart, ChoroplethMap, ScatterPlot};
use crate::config::DashboardConfig;
use crate::correlation::{CorrelationStrength, column_correlation, commentary};
use crate::dataset::{ColumnHandle, Dataset, TablePreview};
use crate::error::AppError;
use crate::ingest::ingest_bytes;
use crate::selection::{DetailRow, RegionSelection, detail_table, filter_rows, select_regions};
use crate::traits::BoundarySource;

/// Prompt shown when both scatter axes name the same category.
pub const SAME_AXIS_PROMPT: &str = "異なるカテゴリを選択してください";

const UNDEFINED_CORRELATION: &str =
    "相関係数を計算できません。両方の値がそろった行が2行未満か、値がすべて同じです。";
const NO_SELECTION: &str = "比較する都道府県を選択してください。";
const SINGLE_CATEGORY: &str = "相関分析には2つ以上のカテゴリが必要です。";

/// User choices for one interaction. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub category: Option<String>,
    /// `None` selects the default regions; `Some(vec![])` selects none.
    pub regions: Option<Vec<String>>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user that does not stop the render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSection {
    pub chart: BarChart,
    pub svg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSection {
    pub map: ChoroplethMap,
    pub svg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSection {
    pub plot: ScatterPlot,
    pub svg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStatus {
    /// Coefficient and bucket are available.
    Computed,
    /// Both axes are the same category; nothing was computed.
    SameAxis,
    /// Too few complete pairs or zero variance.
    Undefined,
}

/// Scatter axes, the plot and the correlation summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationView {
    pub x_options: Vec<String>,
    /// Categories other than the chosen x.
    pub y_options: Vec<String>,
    pub x: String,
    pub y: String,
    pub status: CorrelationStatus,
    pub scatter: Option<ScatterSection>,
    pub coefficient: Option<f64>,
    pub strength: Option<CorrelationStrength>,
    pub summary: String,
}

/// Everything that depends on a non-empty region selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub bar: BarSection,
    /// `None` when the boundary data could not be loaded.
    pub map: Option<MapSection>,
    pub details: Vec<DetailRow>,
    /// `None` when the dataset has a single category.
    pub correlation: Option<CorrelationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub encoding: String,
    pub preview: TablePreview,
    pub region_column: String,
    pub categories: Vec<String>,
    /// `None` when the upload has no category columns.
    pub category: Option<String>,
    pub region_options: Vec<String>,
    pub selected_regions: Vec<String>,
    pub max_regions: usize,
    pub comparison: Option<ComparisonView>,
    pub notices: Vec<Notice>,
}

/// Renders dashboards against a cached boundary source.
///
/// # Example
///
/// ```ignore
/// use shokuhi_core::{DashboardConfig, DashboardRequest, DashboardService};
///
/// let service = DashboardService::new(source, DashboardConfig::default());
/// let view = service.render(&bytes, &DashboardRequest::default()).await?;
/// for notice in &view.notices {
///     println!("{:?}: {}", notice.level, notice.message);
/// }
/// ```
pub struct DashboardService<S: BoundarySource> {
    boundaries: BoundaryCache<S>,
    config: DashboardConfig,
}

impl<S: BoundarySource> Clone for DashboardService<S> {
    fn clone(&self) -> Self {
        Self {
            boundaries: self.boundaries.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: BoundarySource> DashboardService<S> {
    pub fn new(source: S, config: DashboardConfig) -> Self {
        Self {
            boundaries: BoundaryCache::new(source),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn boundaries(&self) -> &BoundaryCache<S> {
        &self.boundaries
    }

    /// Renders the full dashboard for one upload.
    ///
    /// # Errors
    ///
    /// * `CsvParse`, `Encoding`, `EmptyDataset` if the upload cannot be read.
    /// * `UnknownColumn` if the requested category or a scatter axis is not a
    ///   category of the upload.
    /// * `Render` if an SVG cannot be drawn.
    pub async fn render(
        &self,
        bytes: &[u8],
        request: &DashboardRequest,
    ) -> Result<DashboardView, AppError> {
        let upload = ingest_bytes(bytes)?;
        let dataset = upload.dataset;

        let mut notices = Vec::new();

        let Some(default_category) = dataset.default_category() else {
            warn!(columns = dataset.headers().len(), "Upload has no category columns");
            notices.push(Notice::error(AppError::NoCategories.user_message()));
            return Ok(DashboardView {
                encoding: upload.encoding.to_string(),
                preview: dataset.preview(self.config.preview_rows),
                region_column: dataset.region_header().to_string(),
                categories: Vec::new(),
                category: None,
                region_options: dataset.region_values(),
                selected_regions: Vec::new(),
                max_regions: self.config.max_regions,
                comparison: None,
                notices,
            });
        };

        let category = match &request.category {
            Some(name) => dataset.resolve_category(name)?,
            None => default_category,
        };
        if let Some(notice) = non_numeric_notice(&dataset, category) {
            notices.push(notice);
        }

        let selection = select_regions(
            &dataset,
            request.regions.as_deref(),
            &self.config.default_regions,
            self.config.max_regions,
        );

        if !selection.unknown.is_empty() {
            warn!(unknown = ?selection.unknown, "Ignoring regions not present in the upload");
            notices.push(Notice::warning(format!(
                "データに存在しない都道府県を無視しました: {}",
                selection.unknown.join("、")
            )));
        }
        if selection.over_limit {
            notices.push(Notice::warning(format!(
                "選択できる都道府県は最大{}つまでです。選択数を減らしてください。",
                self.config.max_regions
            )));
        }

        info!(
            category = dataset.column(category).name(),
            selected = selection.regions.len(),
            "Rendering dashboard"
        );

        let comparison = if selection.is_empty() {
            notices.push(Notice::info(NO_SELECTION));
            None
        } else {
            Some(
                self.comparison(&dataset, category, &selection, request, &mut notices)
                    .await?,
            )
        };

        Ok(DashboardView {
            encoding: upload.encoding.to_string(),
            preview: dataset.preview(self.config.preview_rows),
            region_column: dataset.region_header().to_string(),
            categories: dataset.category_names(),
            category: Some(dataset.column(category).name().to_string()),
            region_options: dataset.region_values(),
            selected_regions: selection.regions,
            max_regions: self.config.max_regions,
            comparison,
            notices,
        })
    }

    async fn comparison(
        &self,
        dataset: &Dataset,
        category: ColumnHandle,
        selection: &RegionSelection,
        request: &DashboardRequest,
        notices: &mut Vec<Notice>,
    ) -> Result<ComparisonView, AppError> {
        let rows = filter_rows(dataset, selection);

        let chart = BarChart::build(dataset, &rows, category);
        let svg = chart.render_svg()?;
        let bar = BarSection { chart, svg };

        let map = match self.boundaries.get().await {
            Ok(boundaries) => {
                let map = ChoroplethMap::build(dataset, category, boundaries);
                if !map.unmatched_regions.is_empty() {
                    notices.push(Notice::info(format!(
                        "地図データと一致しない都道府県名があります: {}",
                        map.unmatched_regions.join("、")
                    )));
                }
                let svg = map.render_svg()?;
                Some(MapSection { map, svg })
            }
            Err(e) => {
                warn!(error = %e, "Boundary data unavailable, skipping map");
                notices.push(Notice::error(e.user_message()));
                None
            }
        };

        let details = detail_table(dataset, &rows, category);
        let correlation = correlation_view(dataset, selection, request, notices)?;

        Ok(ComparisonView {
            bar,
            map,
            details,
            correlation,
        })
    }
}

/// Warning for a category whose cells are not numbers; such a column draws
/// empty charts.
fn non_numeric_notice(dataset: &Dataset, handle: ColumnHandle) -> Option<Notice> {
    let column = dataset.column(handle);
    if column.is_numeric() {
        return None;
    }
    Some(Notice::warning(format!(
        "「{}」は数値データではないため、グラフや相関を計算できません。別のカテゴリを選択してください。",
        column.name()
    )))
}

fn correlation_view(
    dataset: &Dataset,
    selection: &RegionSelection,
    request: &DashboardRequest,
    notices: &mut Vec<Notice>,
) -> Result<Option<CorrelationView>, AppError> {
    let categories = dataset.categories();

    let x = match &request.scatter_x {
        Some(name) => dataset.resolve_category(name)?,
        None => match categories.first() {
            Some(&handle) => handle,
            None => return Ok(None),
        },
    };
    let y_options: Vec<ColumnHandle> = categories.iter().copied().filter(|&h| h != x).collect();
    let y = match &request.scatter_y {
        Some(name) => dataset.resolve_category(name)?,
        None => match y_options.first() {
            Some(&handle) => handle,
            None => {
                notices.push(Notice::info(SINGLE_CATEGORY));
                return Ok(None);
            }
        },
    };

    let names = |handles: &[ColumnHandle]| -> Vec<String> {
        handles
            .iter()
            .map(|&h| dataset.column(h).name().to_string())
            .collect()
    };
    let x_name = dataset.column(x).name();
    let y_name = dataset.column(y).name();

    let mut view = CorrelationView {
        x_options: names(&categories),
        y_options: names(&y_options),
        x: x_name.to_string(),
        y: y_name.to_string(),
        status: CorrelationStatus::SameAxis,
        scatter: None,
        coefficient: None,
        strength: None,
        summary: SAME_AXIS_PROMPT.to_string(),
    };

    if x == y {
        notices.push(Notice::warning(SAME_AXIS_PROMPT));
        return Ok(Some(view));
    }

    for notice in [x, y].into_iter().filter_map(|h| non_numeric_notice(dataset, h)) {
        if !notices.contains(&notice) {
            notices.push(notice);
        }
    }

    let plot = ScatterPlot::build(dataset, x, y, selection);
    let svg = plot.render_svg()?;
    view.scatter = Some(ScatterSection { plot, svg });

    let bucketed = column_correlation(dataset, x, y)
        .and_then(|r| CorrelationStrength::classify(r).map(|strength| (r, strength)));
    match bucketed {
        Some((r, strength)) => {
            info!(x = x_name, y = y_name, r, strength = strength.as_str(), "Correlation computed");
            view.status = CorrelationStatus::Computed;
            view.coefficient = Some(r);
            view.strength = Some(strength);
            view.summary = commentary(x_name, y_name, r, strength);
        }
        None => {
            view.status = CorrelationStatus::Undefined;
            view.summary = UNDEFINED_CORRELATION.to_string();
        }
    }

    Ok(Some(view))
}
