//! Bar chart comparing one category across the selected regions.

use plotters::prelude::*;
use serde::Serialize;

use super::{FONT, render_error};
use crate::dataset::{ColumnHandle, Dataset};
use crate::error::AppError;
use crate::selection::FilteredRows;

const SIZE: (u32, u32) = (800, 480);
const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub region: String,
    pub value: f64,
}

/// One bar per filtered row that has a value, in filtered order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn build(dataset: &Dataset, rows: &FilteredRows, category: ColumnHandle) -> Self {
        let name = dataset.column(category).name();
        let bars = rows
            .indices()
            .iter()
            .filter_map(|&r| {
                dataset.value(r, category).map(|value| Bar {
                    region: dataset.region_of(r).to_string(),
                    value,
                })
            })
            .collect();

        Self {
            title: format!("選択した都道府県の{}支出比較", name),
            x_label: "都道府県".to_string(),
            y_label: format!("{}支出額", name),
            bars,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.value).collect()
    }

    pub fn render_svg(&self) -> Result<String, AppError> {
        let labels: Vec<&str> = self.bars.iter().map(|b| b.region.as_str()).collect();
        let max = self.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
        let min = self.bars.iter().map(|b| b.value).fold(0.0_f64, f64::min);
        let top = if max > 0.0 { max * 1.1 } else { 1.0 };
        let bottom = if min < 0.0 { min * 1.1 } else { 0.0 };
        let slots = self.bars.len().max(1) as u32;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&self.title, (FONT, 22))
                .margin(16)
                .x_label_area_size(48)
                .y_label_area_size(72)
                .build_cartesian_2d((0u32..slots).into_segmented(), bottom..top)
                .map_err(render_error)?;

            let format_region = |v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) => labels
                    .get(*i as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(labels.len().max(1))
                .x_label_formatter(&format_region)
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .draw()
                .map_err(render_error)?;

            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(BAR_COLOR.filled())
                        .margin(12)
                        .data(
                            self.bars
                                .iter()
                                .enumerate()
                                .map(|(i, bar)| (i as u32, bar.value)),
                        ),
                )
                .map_err(render_error)?;

            root.present().map_err(render_error)?;
        }
        Ok(svg)
    }
}
