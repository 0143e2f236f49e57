//! Choropleth map of one category joined onto boundary outlines.

use std::collections::HashMap;
use std::sync::Arc;

use plotters::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::{FONT, hex, render_error};
use crate::boundary::{BoundarySet, Bounds};
use crate::dataset::{ColumnHandle, Dataset};
use crate::error::AppError;

const SIZE: (u32, u32) = (800, 760);
const LEGEND_WIDTH: u32 = 120;
const OCEAN: RGBColor = RGBColor(173, 216, 230);
const NO_DATA: RGBColor = RGBColor(200, 200, 200);
const OUTLINE: RGBColor = RGBColor(90, 90, 90);

/// Viridis anchor colors at evenly spaced stops from 0 to 1.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 45, 123),
    (59, 82, 139),
    (44, 114, 142),
    (33, 145, 140),
    (40, 174, 128),
    (94, 201, 98),
    (173, 220, 48),
    (253, 231, 37),
];

/// Viridis color at `t` in `[0, 1]`, linearly interpolated between anchors.
pub fn viridis(t: f64) -> (u8, u8, u8) {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lower as f64;
    let (a, b) = (VIRIDIS[lower], VIRIDIS[lower + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Continuous color scale over a value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Scale spanning every value, `None` when there are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| {
            Some(match acc {
                None => ColorScale { min: v, max: v },
                Some(s) => ColorScale {
                    min: s.min.min(v),
                    max: s.max.max(v),
                },
            })
        })
    }

    /// Position of `value` in the range; a degenerate range maps to the middle.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    pub fn color(&self, value: f64) -> (u8, u8, u8) {
        viridis(self.normalize(value))
    }
}

/// One boundary feature with its joined value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRegion {
    pub name: String,
    pub value: Option<f64>,
    /// Fill color as `#rrggbb`; `None` when there is no value to color by.
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMap {
    pub title: String,
    pub category: String,
    /// One entry per boundary feature, in boundary order.
    pub regions: Vec<MapRegion>,
    /// Dataset regions with no boundary feature of the same name.
    pub unmatched_regions: Vec<String>,
    pub scale: Option<ColorScale>,
    /// Visible extent of the map.
    pub view: Option<Bounds>,
    #[serde(skip)]
    boundaries: Arc<BoundarySet>,
}

impl ChoroplethMap {
    /// Joins every dataset row onto the boundary features by exact name.
    ///
    /// The color range covers the whole dataset, not only the selected
    /// regions. When a region appears in several rows the last row wins.
    pub fn build(dataset: &Dataset, category: ColumnHandle, boundaries: Arc<BoundarySet>) -> Self {
        let name = dataset.column(category).name().to_string();

        let mut by_region: HashMap<&str, Option<f64>> = HashMap::new();
        for r in 0..dataset.row_count() {
            by_region.insert(dataset.region_of(r), dataset.value(r, category));
        }

        let scale = ColorScale::spanning(by_region.values().flatten().copied());

        let regions: Vec<MapRegion> = boundaries
            .features()
            .iter()
            .map(|feature| {
                let value = by_region.get(feature.name.as_str()).copied().flatten();
                MapRegion {
                    name: feature.name.clone(),
                    value,
                    color: value.zip(scale).map(|(v, s)| hex(s.color(v))),
                }
            })
            .collect();

        let unmatched_regions: Vec<String> = dataset
            .region_values()
            .into_iter()
            .filter(|region| !boundaries.contains(region))
            .collect();
        if !unmatched_regions.is_empty() {
            debug!(
                category = %name,
                unmatched = ?unmatched_regions,
                "Dataset regions without a boundary feature"
            );
        }

        let joined = boundaries
            .features()
            .iter()
            .filter(|f| by_region.contains_key(f.name.as_str()))
            .filter_map(|f| f.bounds())
            .reduce(Bounds::union);
        let view = joined.or_else(|| boundaries.bounds()).map(|b| b.padded(0.05));

        Self {
            title: format!("都道府県別・{}支出マップ", name),
            category: name,
            regions,
            unmatched_regions,
            scale,
            view,
            boundaries,
        }
    }

    /// Number of features that received a value.
    pub fn colored_count(&self) -> usize {
        self.regions.iter().filter(|r| r.value.is_some()).count()
    }

    pub fn render_svg(&self) -> Result<String, AppError> {
        let map_width = SIZE.0 - LEGEND_WIDTH;
        let view = fit_aspect(
            self.view.unwrap_or(Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1.0,
                max_y: 1.0,
            }),
            map_width as f64 / SIZE.1 as f64,
        );

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            let (map_area, legend_area) = root.split_horizontally(map_width);

            let mut chart = ChartBuilder::on(&map_area)
                .caption(&self.title, (FONT, 22))
                .margin(10)
                .build_cartesian_2d(view.min_x..view.max_x, view.min_y..view.max_y)
                .map_err(render_error)?;
            chart.plotting_area().fill(&OCEAN).map_err(render_error)?;

            for (region, feature) in self.regions.iter().zip(self.boundaries.features()) {
                let fill = match (region.value, self.scale) {
                    (Some(v), Some(scale)) => {
                        let (r, g, b) = scale.color(v);
                        RGBColor(r, g, b)
                    }
                    _ => NO_DATA,
                };

                chart
                    .draw_series(
                        feature
                            .rings
                            .iter()
                            .map(|ring| Polygon::new(ring.clone(), fill.filled())),
                    )
                    .map_err(render_error)?;
                chart
                    .draw_series(feature.rings.iter().map(|ring| {
                        let mut closed = ring.clone();
                        closed.extend(ring.first().copied());
                        PathElement::new(closed, OUTLINE.stroke_width(1))
                    }))
                    .map_err(render_error)?;
            }

            if let Some(scale) = self.scale {
                draw_colorbar(&legend_area, scale, &format!("{}支出額", self.category))?;
            }

            root.present().map_err(render_error)?;
        }
        Ok(svg)
    }
}

/// Widens one side of `bounds` so its width/height ratio equals `aspect`.
fn fit_aspect(bounds: Bounds, aspect: f64) -> Bounds {
    let (w, h) = (bounds.width().max(f64::EPSILON), bounds.height().max(f64::EPSILON));
    let cx = (bounds.min_x + bounds.max_x) / 2.0;
    let cy = (bounds.min_y + bounds.max_y) / 2.0;
    let (w, h) = if w / h < aspect {
        (h * aspect, h)
    } else {
        (w, w / aspect)
    };
    Bounds {
        min_x: cx - w / 2.0,
        min_y: cy - h / 2.0,
        max_x: cx + w / 2.0,
        max_y: cy + h / 2.0,
    }
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    scale: ColorScale,
    label: &str,
) -> Result<(), AppError> {
    const STEPS: i32 = 64;
    let (top, bottom) = (80, 560);
    let (left, right) = (16, 40);
    let step = (bottom - top) / STEPS;

    area.draw(&Text::new(label.to_string(), (8, top - 30), (FONT, 14).into_font()))
        .map_err(render_error)?;

    for i in 0..STEPS {
        // Top of the bar is the maximum.
        let t = 1.0 - i as f64 / (STEPS - 1) as f64;
        let (r, g, b) = viridis(t);
        let y0 = top + i * step;
        area.draw(&Rectangle::new(
            [(left, y0), (right, y0 + step)],
            RGBColor(r, g, b).filled(),
        ))
        .map_err(render_error)?;
    }

    let tick_bottom = top + STEPS * step;
    for (value, y) in [(scale.max, top), (scale.min, tick_bottom)] {
        area.draw(&Text::new(
            format_tick(value),
            (right + 6, y - 6),
            (FONT, 12).into_font(),
        ))
        .map_err(render_error)?;
    }
    Ok(())
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
