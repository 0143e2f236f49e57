use shokuhi_client::BoundarySourceEnum;
use shokuhi_core::{DashboardConfig, DashboardService};

/// Shared application state for all handlers.
///
/// Cloned per request by Axum. The dashboard service shares one boundary
/// cache across all clones.
#[derive(Clone)]
pub struct AppState {
    /// Dashboard service rendering uploads against the cached boundaries
    pub dashboard: DashboardService<BoundarySourceEnum>,
}

impl AppState {
    pub fn new(source: BoundarySourceEnum, config: DashboardConfig) -> Self {
        Self {
            dashboard: DashboardService::new(source, config),
        }
    }
}
