//! Figure models and their SVG renderings.
//!
//! Every chart is built in two steps: a plain data model computed from the
//! dataset ([`BarChart`], [`ChoroplethMap`], [`ScatterPlot`]), then an SVG
//! string drawn from that model with the `plotters` SVG backend. The models
//! are what tests and JSON clients look at; the SVG is what people look at.

pub mod bar;
pub mod choropleth;
pub mod scatter;

pub use bar::{Bar, BarChart};
pub use choropleth::{ChoroplethMap, ColorScale, MapRegion};
pub use scatter::{ScatterPlot, ScatterPoint};

use crate::error::AppError;

pub(crate) const FONT: &str = "sans-serif";

pub(crate) fn render_error<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Render(err.to_string())
}

/// `#rrggbb` form of an RGB triple.
pub(crate) fn hex(rgb: (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2)
}
