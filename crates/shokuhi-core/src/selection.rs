//! Region selection, row filtering and the detail table.
//!
//! All functions here are pure projections over a [`Dataset`]: they pick rows
//! and columns but never change values.

use std::cmp::Ordering;

use serde::Serialize;

use crate::dataset::{ColumnHandle, Dataset};

/// Outcome of resolving the user's region choice against the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSelection {
    /// Chosen regions, in the order they were requested.
    pub regions: Vec<String>,
    /// Requested names that are not region values of the dataset.
    pub unknown: Vec<String>,
    /// True when more regions are chosen than the advisory maximum.
    pub over_limit: bool,
}

impl RegionSelection {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }
}

/// Default regions: the preferred names that exist in `available`, in preference order.
pub fn default_regions(preferred: &[String], available: &[String]) -> Vec<String> {
    preferred
        .iter()
        .filter(|p| available.contains(p))
        .cloned()
        .collect()
}

/// Resolves the requested regions (or the defaults when `requested` is `None`).
///
/// Unknown names are dropped and reported. Duplicates are collapsed. The
/// selection is never truncated: exceeding `max_regions` only sets
/// `over_limit`.
pub fn select_regions(
    dataset: &Dataset,
    requested: Option<&[String]>,
    preferred: &[String],
    max_regions: usize,
) -> RegionSelection {
    let available = dataset.region_values();

    let (regions, unknown) = match requested {
        None => (default_regions(preferred, &available), Vec::new()),
        Some(names) => {
            let mut regions: Vec<String> = Vec::new();
            let mut unknown = Vec::new();
            for name in names {
                if regions.contains(name) {
                    continue;
                }
                if available.contains(name) {
                    regions.push(name.clone());
                } else {
                    unknown.push(name.clone());
                }
            }
            (regions, unknown)
        }
    };

    let over_limit = regions.len() > max_regions;
    RegionSelection {
        regions,
        unknown,
        over_limit,
    }
}

/// Row indices whose region is in the selection, in dataset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredRows {
    rows: Vec<usize>,
}

impl FilteredRows {
    pub fn indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Keeps rows whose region value is in `selection`.
pub fn filter_rows(dataset: &Dataset, selection: &RegionSelection) -> FilteredRows {
    let rows = (0..dataset.row_count())
        .filter(|&r| selection.contains(dataset.region_of(r)))
        .collect();
    FilteredRows { rows }
}

/// One line of the detail table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub region: String,
    pub value: Option<f64>,
}

/// Projects filtered rows onto (region, category) sorted by value descending.
///
/// Missing values sort last; equal values keep dataset order.
pub fn detail_table(
    dataset: &Dataset,
    rows: &FilteredRows,
    category: ColumnHandle,
) -> Vec<DetailRow> {
    let mut table: Vec<DetailRow> = rows
        .indices()
        .iter()
        .map(|&r| DetailRow {
            region: dataset.region_of(r).to_string(),
            value: dataset.value(r, category),
        })
        .collect();

    table.sort_by(|a, b| match (a.value, b.value) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    table
}
