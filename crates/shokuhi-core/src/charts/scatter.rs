//! Scatter plot of two categories, with the selected regions annotated.

use std::ops::Range;

use plotters::prelude::*;
use serde::Serialize;

use super::{FONT, hex, render_error};
use crate::correlation::paired_values;
use crate::dataset::{ColumnHandle, Dataset};
use crate::error::AppError;
use crate::selection::RegionSelection;

const SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub region: String,
    pub x: f64,
    pub y: f64,
    /// Point belongs to the selected regions: drawn larger and labeled.
    pub highlighted: bool,
    pub color: String,
    /// Palette slot: the region's position among the sorted region options.
    #[serde(skip)]
    pub palette_index: usize,
}

/// Every row with both values, one palette color per region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterPlot {
    pub fn build(
        dataset: &Dataset,
        x: ColumnHandle,
        y: ColumnHandle,
        selection: &RegionSelection,
    ) -> Self {
        let x_name = dataset.column(x).name();
        let y_name = dataset.column(y).name();
        let (rows, xs, ys) = paired_values(dataset, x, y);
        let region_options = dataset.region_values();

        let points = rows
            .iter()
            .zip(xs.iter().zip(&ys))
            .map(|(&r, (&px, &py))| {
                let region = dataset.region_of(r);
                let palette_index = region_options
                    .binary_search_by(|option| option.as_str().cmp(region))
                    .unwrap_or_else(|slot| slot);
                ScatterPoint {
                    region: region.to_string(),
                    x: px,
                    y: py,
                    highlighted: selection.contains(region),
                    color: hex(Palette99::pick(palette_index).rgb()),
                    palette_index,
                }
            })
            .collect();

        Self {
            title: format!("{}と{}の散布図", x_name, y_name),
            x_label: format!("{}支出額", x_name),
            y_label: format!("{}支出額", y_name),
            points,
        }
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.points.iter().filter(|p| p.highlighted)
    }

    pub fn render_svg(&self) -> Result<String, AppError> {
        let x_range = axis_range(self.points.iter().map(|p| p.x));
        let y_range = axis_range(self.points.iter().map(|p| p.y));

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&self.title, (FONT, 22))
                .margin(16)
                .x_label_area_size(48)
                .y_label_area_size(72)
                .build_cartesian_2d(x_range, y_range)
                .map_err(render_error)?;

            chart
                .configure_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .draw()
                .map_err(render_error)?;

            chart
                .draw_series(
                    self.points.iter().filter(|p| !p.highlighted).map(|p| {
                        Circle::new((p.x, p.y), 4, Palette99::pick(p.palette_index).filled())
                    }),
                )
                .map_err(render_error)?;

            chart
                .draw_series(
                    self.points.iter().filter(|p| p.highlighted).map(|p| {
                        EmptyElement::at((p.x, p.y))
                            + Circle::new((0, 0), 8, Palette99::pick(p.palette_index).filled())
                            + Text::new(p.region.clone(), (10, -10), (FONT, 14).into_font())
                    }),
                )
                .map_err(render_error)?;

            root.present().map_err(render_error)?;
        }
        Ok(svg)
    }
}

/// Data range padded by 5% on each side; a single value gets a unit window.
fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}
