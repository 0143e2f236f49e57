//! Pearson correlation between two categories and its verbal bucket.

use serde::Serialize;

use crate::dataset::{ColumnHandle, Dataset};

/// Verbal strength of a correlation coefficient.
///
/// Intervals (r is clamped to `[-1, 1]` first):
///
/// | bucket              | interval            |
/// |---------------------|---------------------|
/// | `StrongPositive`    | `0.7 < r`           |
/// | `ModeratePositive`  | `0.4 < r <= 0.7`    |
/// | `WeakPositive`      | `0 < r <= 0.4`      |
/// | `WeakNegative`      | `-0.4 < r <= 0`     |
/// | `ModerateNegative`  | `-0.7 < r <= -0.4`  |
/// | `StrongNegative`    | `r <= -0.7`         |
///
/// Every boundary value belongs to the interval that is closed on that side,
/// so `r = 0` is `WeakNegative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    WeakPositive,
    WeakNegative,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationStrength {
    /// Classifies a coefficient. Returns `None` for NaN.
    pub fn classify(r: f64) -> Option<Self> {
        if r.is_nan() {
            return None;
        }
        let r = r.clamp(-1.0, 1.0);
        let bucket = if r > 0.7 {
            Self::StrongPositive
        } else if r > 0.4 {
            Self::ModeratePositive
        } else if r > 0.0 {
            Self::WeakPositive
        } else if r > -0.4 {
            Self::WeakNegative
        } else if r > -0.7 {
            Self::ModerateNegative
        } else {
            Self::StrongNegative
        };
        Some(bucket)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongPositive => "strong_positive",
            Self::ModeratePositive => "moderate_positive",
            Self::WeakPositive => "weak_positive",
            Self::WeakNegative => "weak_negative",
            Self::ModerateNegative => "moderate_negative",
            Self::StrongNegative => "strong_negative",
        }
    }

    /// Japanese label shown in the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongPositive => "強い正の相関",
            Self::ModeratePositive => "中程度の正の相関",
            Self::WeakPositive => "弱い正の相関",
            Self::WeakNegative => "弱い負の相関",
            Self::ModerateNegative => "中程度の負の相関",
            Self::StrongNegative => "強い負の相関",
        }
    }
}

/// Pearson correlation coefficient of two equally long samples.
///
/// Returns `None` with fewer than two pairs or when either side has zero
/// variance. The result is clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Rows where both columns have a value, as parallel samples.
pub fn paired_values(
    dataset: &Dataset,
    x: ColumnHandle,
    y: ColumnHandle,
) -> (Vec<usize>, Vec<f64>, Vec<f64>) {
    let mut rows = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for r in 0..dataset.row_count() {
        if let (Some(a), Some(b)) = (dataset.value(r, x), dataset.value(r, y)) {
            rows.push(r);
            xs.push(a);
            ys.push(b);
        }
    }
    (rows, xs, ys)
}

/// Correlation of two categories across all rows where both are present.
pub fn column_correlation(dataset: &Dataset, x: ColumnHandle, y: ColumnHandle) -> Option<f64> {
    let (_, xs, ys) = paired_values(dataset, x, y);
    pearson(&xs, &ys)
}

/// Commentary sentence for a coefficient.
pub fn commentary(x_name: &str, y_name: &str, r: f64, strength: CorrelationStrength) -> String {
    format!(
        "{}と{}の相関係数は {:.2} で、{}があります。",
        x_name,
        y_name,
        r,
        strength.label()
    )
}
