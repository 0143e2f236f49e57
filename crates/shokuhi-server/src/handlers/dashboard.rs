//! Dashboard rendering endpoint.

use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::info;

use crate::dto::{DashboardForm, DashboardResponse};
use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

/// Renders the dashboard for an uploaded CSV.
///
/// Parses the upload, applies the category and region choices, and returns
/// the bar chart, choropleth map, detail table and correlation view. Problems
/// after parsing (too many regions, unknown names, map data unavailable)
/// come back as notices in a 200 response.
#[utoipa::path(
    post,
    path = "/api/v1/dashboard",
    request_body(content = DashboardForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Dashboard rendered", body = DashboardResponse),
        (status = 400, description = "Upload could not be read or a choice is invalid", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
    ),
    tag = "dashboard"
)]
pub async fn render_dashboard(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DashboardResponse>, ApiError> {
    let form = DashboardForm::from_multipart(multipart).await?;
    let (bytes, request) = form.into_parts();
    info!(bytes = bytes.len(), category = ?request.category, "Dashboard upload received");

    let view = state.dashboard.render(&bytes, &request).await?;
    Ok(Json(view.into()))
}
