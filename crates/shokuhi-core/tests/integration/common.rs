//! Test utilities and mock implementations for integration tests.
//!
//! Provides mock implementations of [`BoundarySource`] for testing
//! `DashboardService` and `BoundaryCache` in isolation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use shokuhi_core::traits::BoundarySource;
use shokuhi_core::{AppError, BoundaryFeature, BoundarySet};

// =============================================================================
// Fixtures
// =============================================================================

/// The three-line upload used across the end-to-end tests.
pub const SAMPLE_CSV: &str = "都道府県,米,パン\n東京都,100,50\n大阪府,80,60\n";

/// A wider upload with enough rows for a defined correlation.
pub const WIDE_CSV: &str = "都道府県,米,パン,めん類\n\
                            北海道,90,40,25\n\
                            東京都,100,50,30\n\
                            大阪府,80,60,35\n\
                            福岡県,70,65,40\n\
                            沖縄県,60,70,45\n";

fn square(name: &str, x: f64, y: f64) -> BoundaryFeature {
    BoundaryFeature {
        name: name.to_string(),
        rings: vec![vec![(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)]],
    }
}

/// A small boundary set with one square per region.
pub fn sample_boundaries() -> BoundarySet {
    BoundarySet::new(vec![
        square("北海道", 141.0, 43.0),
        square("東京都", 139.0, 35.0),
        square("大阪府", 135.0, 34.0),
        square("福岡県", 130.0, 33.0),
    ])
}

// =============================================================================
// MockBoundarySource
// =============================================================================

/// Mock boundary source that counts loads.
///
/// Returns a fixed set after an optional delay, or fails every time when
/// constructed with [`MockBoundarySource::failing`].
#[derive(Clone)]
pub struct MockBoundarySource {
    set: Option<BoundarySet>,
    delay: Duration,
    loads: Arc<AtomicUsize>,
}

impl MockBoundarySource {
    pub fn new(set: BoundarySet) -> Self {
        Self {
            set: Some(set),
            delay: Duration::ZERO,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose every load fails with a network error.
    pub fn failing() -> Self {
        Self {
            set: None,
            delay: Duration::ZERO,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delays every load, to let concurrent callers pile up.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times `load` was called, across all clones.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl BoundarySource for MockBoundarySource {
    fn describe(&self) -> String {
        "mock://boundaries".to_string()
    }

    async fn load(&self) -> Result<BoundarySet, AppError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.set
            .clone()
            .ok_or_else(|| AppError::NetworkError("connection refused".to_string()))
    }
}
