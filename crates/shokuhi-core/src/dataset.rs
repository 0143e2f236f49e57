//! Schema-on-read tabular dataset.
//!
//! An uploaded CSV is turned into a column-major [`Dataset`] once. Column
//! names are resolved to [`ColumnHandle`]s and every column is classified as
//! numeric or text at load time, so the rest of the dashboard never looks up
//! columns by string again.

use serde::Serialize;

use crate::error::AppError;

/// Header that designates the region column outright.
pub const CANONICAL_REGION_HEADER: &str = "Prefecture";

/// Substring that marks a Japanese region header (e.g. `都道府県名`).
const REGION_MARKER_JA: &str = "都道府県";

/// Substring that marks a Latin region header, matched case-insensitively.
const REGION_MARKER_LATIN: &str = "prefecture";

/// Cell contents treated as missing values in numeric columns.
const MISSING_MARKERS: &[&str] = &["", "-", "NA", "N/A", "NaN", "nan", "…", "***", "x", "X"];

/// Resolved reference to a column of one [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnHandle(usize);

impl ColumnHandle {
    /// Position of the column in the original header order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Column classification, decided once after parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-missing cell parses as a finite number, and at least one does.
    Numeric,
    /// Anything else (identifiers, labels, mixed content).
    Text,
}

/// One column: raw cells plus their numeric interpretation.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    cells: Vec<String>,
    values: Vec<Option<f64>>,
    kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<String>) -> Self {
        let values: Vec<Option<f64>> = cells.iter().map(|c| parse_number(c)).collect();

        let mut present = 0usize;
        let mut all_numeric = true;
        for (cell, value) in cells.iter().zip(&values) {
            if is_missing(cell) {
                continue;
            }
            present += 1;
            if value.is_none() {
                all_numeric = false;
                break;
            }
        }

        let kind = if all_numeric && present > 0 {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };

        Self {
            name: name.into(),
            cells,
            values,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Numeric value per row; `None` for missing or non-numeric cells.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Parses a cell as a number, accepting thousands separators (`12,345`).
fn parse_number(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Picks the region column from a header list.
///
/// Rule, in order: a header equal to [`CANONICAL_REGION_HEADER`]; the first
/// header containing `都道府県` or (case-insensitively) `prefecture`; the first
/// column. Never fails for a non-empty header list.
///
/// # Examples
///
/// ```
/// use shokuhi_core::dataset::infer_region_column;
///
/// assert_eq!(infer_region_column(&["Prefecture", "Rice"]), 0);
/// assert_eq!(infer_region_column(&["年", "都道府県名", "米"]), 1);
/// assert_eq!(infer_region_column(&["Area", "Rice"]), 0);
/// ```
pub fn infer_region_column<S: AsRef<str>>(headers: &[S]) -> usize {
    if let Some(i) = headers
        .iter()
        .position(|h| h.as_ref() == CANONICAL_REGION_HEADER)
    {
        return i;
    }

    headers
        .iter()
        .position(|h| {
            let h = h.as_ref();
            h.contains(REGION_MARKER_JA) || h.to_lowercase().contains(REGION_MARKER_LATIN)
        })
        .unwrap_or(0)
}

/// Head-of-file view of the upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row count of the whole dataset, not just the preview.
    pub total_rows: usize,
}

/// A parsed upload with its region column resolved.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
    region: ColumnHandle,
}

impl Dataset {
    /// Builds a dataset from a header row and row-major records.
    ///
    /// # Errors
    ///
    /// * `CsvParse` if there are no headers, a header is duplicated, or a row
    ///   length differs from the header length.
    /// * `EmptyDataset` if there are no rows.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, AppError> {
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(AppError::CsvParse("missing header row".to_string()));
        }

        for (i, h) in headers.iter().enumerate() {
            if headers[..i].contains(h) {
                return Err(AppError::CsvParse(format!("duplicate column '{}'", h)));
            }
        }

        if rows.is_empty() {
            return Err(AppError::EmptyDataset);
        }

        let width = headers.len();
        let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); width];
        for (line, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(AppError::CsvParse(format!(
                    "row {} has {} fields, expected {}",
                    line + 2,
                    row.len(),
                    width
                )));
            }
            for (col, cell) in row.into_iter().enumerate() {
                cells[col].push(cell);
            }
        }

        let row_count = cells[0].len();
        let region = ColumnHandle(infer_region_column(&headers));
        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();

        Ok(Self {
            columns,
            row_count,
            region,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn column(&self, handle: ColumnHandle) -> &Column {
        &self.columns[handle.0]
    }

    /// Resolves a header name to a handle.
    pub fn resolve(&self, name: &str) -> Option<ColumnHandle> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .map(ColumnHandle)
    }

    /// The inferred region column.
    pub fn region_column(&self) -> ColumnHandle {
        self.region
    }

    pub fn region_header(&self) -> &str {
        self.column(self.region).name()
    }

    /// Region value of a row.
    pub fn region_of(&self, row: usize) -> &str {
        &self.column(self.region).cells()[row]
    }

    /// Numeric value of a cell.
    pub fn value(&self, row: usize, column: ColumnHandle) -> Option<f64> {
        self.column(column).values()[row]
    }

    /// Selectable categories: every column except the region column, in order.
    pub fn categories(&self) -> Vec<ColumnHandle> {
        (0..self.columns.len())
            .map(ColumnHandle)
            .filter(|h| *h != self.region)
            .collect()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories()
            .into_iter()
            .map(|h| self.column(h).name().to_string())
            .collect()
    }

    /// Default category: the column right after the region column, or the
    /// second column when the region column is last.
    ///
    /// When that fallback would be the region column itself (region column
    /// is the second and last column) the first category is used instead.
    pub fn default_category(&self) -> Option<ColumnHandle> {
        let next = self.region.0 + 1;
        let candidate = if next < self.columns.len() { next } else { 1 };

        if candidate < self.columns.len() && candidate != self.region.0 {
            return Some(ColumnHandle(candidate));
        }
        self.categories().into_iter().next()
    }

    /// Resolves a requested category, rejecting the region column and unknown names.
    pub fn resolve_category(&self, name: &str) -> Result<ColumnHandle, AppError> {
        match self.resolve(name) {
            Some(h) if h != self.region => Ok(h),
            _ => Err(AppError::UnknownColumn(name.to_string())),
        }
    }

    /// Distinct non-empty region values sorted by code point.
    pub fn region_values(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .column(self.region)
            .cells()
            .iter()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect();
        values.sort();
        values.dedup();
        values
    }

    /// First `n` rows with all columns.
    pub fn preview(&self, n: usize) -> TablePreview {
        let rows = (0..self.row_count.min(n))
            .map(|r| self.columns.iter().map(|c| c.cells()[r].clone()).collect())
            .collect();

        TablePreview {
            headers: self.headers().into_iter().map(String::from).collect(),
            rows,
            total_rows: self.row_count,
        }
    }
}
