//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::dto::{
    BarChartDto, BarDto, ComparisonDto, CorrelationDto, DashboardForm, DashboardResponse,
    DetailRowDto, HealthResponse, MapDto, MapRegionDto, NoticeDto, PreviewDto, ScatterDto,
    ScatterPointDto,
};
use crate::error::ErrorResponse;
use crate::handlers::{dashboard, health};

/// OpenAPI documentation for the Shokuhi API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shokuhi API",
        version = "1.0.0",
        description = "Prefectural food-expenditure dashboard.

Upload a CSV with one row per prefecture and one column per spending category,
then compare a category across prefectures on a bar chart, a choropleth map and
a detail table, and correlate two categories on a scatter plot.

## Quick Start

1. Check server health: `GET /api/v1/health`
2. Render a dashboard: `POST /api/v1/dashboard` with a multipart `file` field
",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health::health_check,
        dashboard::render_dashboard,
    ),
    components(
        schemas(
            // Request types
            DashboardForm,
            // Response types
            HealthResponse,
            DashboardResponse,
            PreviewDto,
            NoticeDto,
            ComparisonDto,
            BarChartDto,
            BarDto,
            MapDto,
            MapRegionDto,
            DetailRowDto,
            CorrelationDto,
            ScatterDto,
            ScatterPointDto,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health"),
        (name = "dashboard", description = "Dashboard rendering"),
    )
)]
pub struct ApiDoc;
