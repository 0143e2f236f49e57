//! Test utilities: a router backed by a temporary boundary file, and
//! multipart body builders.

use std::io::Write;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use serde_json::Value;
use tempfile::NamedTempFile;

use shokuhi_client::{BoundarySourceEnum, LocalBoundaryFile};
use shokuhi_core::DashboardConfig;
use shokuhi_server::{AppState, ServerConfig, create_router};

pub const BOUNDARY: &str = "shokuhi-test-boundary";

pub const SAMPLE_CSV: &str = "都道府県,米,パン\n東京都,100,50\n大阪府,80,60\n";

const GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "nam_ja": "東京都" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[139.0, 35.5], [140.0, 35.5], [140.0, 36.0], [139.0, 35.5]]]
            }
        },
        {
            "type": "Feature",
            "properties": { "nam_ja": "大阪府" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[135.0, 34.5], [136.0, 34.5], [136.0, 35.0], [135.0, 34.5]]]
            }
        }
    ]
}"#;

/// Router plus the temporary file it reads boundaries from.
///
/// The file must outlive the router, so both are returned together.
pub struct TestApp {
    pub router: Router,
    _boundaries: NamedTempFile,
}

pub fn server_config(max_upload_mb: usize) -> ServerConfig {
    ServerConfig {
        port: 0,
        host: "127.0.0.1".to_string(),
        config: None,
        boundary_url: None,
        boundary_file: None,
        cors_origins: "*".to_string(),
        max_upload_mb,
    }
}

pub fn test_app() -> TestApp {
    test_app_with_limit(10)
}

pub fn test_app_with_limit(max_upload_mb: usize) -> TestApp {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(GEOJSON.as_bytes()).expect("write geojson");

    let dashboard = DashboardConfig::default();
    let source = BoundarySourceEnum::Local(LocalBoundaryFile::new(
        file.path(),
        &dashboard.boundary_join_property,
    ));
    let state = AppState::new(source, dashboard);

    TestApp {
        router: create_router(state, &server_config(max_upload_mb)),
        _boundaries: file,
    }
}

/// Builds a multipart body with an optional CSV file and text fields.
pub fn multipart_body(csv: Option<&[u8]>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(csv) = csv {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"data.csv\"\r\nContent-Type: text/csv\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(csv);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn dashboard_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/dashboard")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
