//! Integration tests for the HTTP surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::integration::common::{
    SAMPLE_CSV, dashboard_request, json_body, multipart_body, test_app, test_app_with_limit,
};

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let response = app
        .router
        .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["boundaries_loaded"], false);
}

#[tokio::test]
async fn test_index_serves_dashboard_page() {
    let app = test_app();

    let response = app
        .router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("都道府県別・食料品支出ダッシュボード"));
}

#[tokio::test]
async fn test_openapi_document() {
    let app = test_app();

    let response = app
        .router
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/api/v1/dashboard"]["post"].is_object());
}

/// The sample upload with 米 for 東京都 and 大阪府 renders every section.
#[tokio::test]
async fn test_dashboard_renders_upload() {
    let app = test_app();
    let body = multipart_body(
        Some(SAMPLE_CSV.as_bytes()),
        &[("category", "米"), ("regions", "東京都"), ("regions", "大阪府")],
    );

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["encoding"], "UTF-8");
    assert_eq!(json["region_column"], "都道府県");
    assert_eq!(json["category"], "米");

    let comparison = &json["comparison"];
    assert_eq!(comparison["bar"]["bars"][0]["value"], 100.0);
    assert_eq!(comparison["bar"]["bars"][1]["value"], 80.0);
    assert_eq!(comparison["details"][0]["region"], "東京都");
    assert_eq!(comparison["map"]["unmatched_regions"].as_array().unwrap().len(), 0);
    assert!(comparison["map"]["svg"].as_str().unwrap().starts_with("<svg"));
    assert_eq!(comparison["correlation"]["x"], "米");
    assert_eq!(comparison["correlation"]["y"], "パン");
}

#[tokio::test]
async fn test_dashboard_same_axis_prompt() {
    let app = test_app();
    let body = multipart_body(
        Some(SAMPLE_CSV.as_bytes()),
        &[("scatter_x", "米"), ("scatter_y", "米")],
    );

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let correlation = &json["comparison"]["correlation"];
    assert_eq!(correlation["status"], "same_axis");
    assert!(correlation["scatter"].is_null());
    assert_eq!(correlation["summary"], "異なるカテゴリを選択してください");
    // y is not among its own options; the page re-adds it so the select shows it.
    assert_eq!(correlation["y"], "米");
    assert!(
        !correlation["y_options"]
            .as_array()
            .unwrap()
            .iter()
            .any(|o| o == "米")
    );
}

#[tokio::test]
async fn test_index_keeps_current_scatter_axis_selectable() {
    let app = test_app();

    let response = app
        .router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("withCurrent(corr.y_options, corr.y)"));
    assert!(html.contains("view.category ? [view.category] : []"));
}

/// An upload with only a region column still returns the preview.
#[tokio::test]
async fn test_dashboard_region_column_only_returns_preview() {
    let app = test_app();
    let body = multipart_body(Some("都道府県\n東京都\n".as_bytes()), &[]);

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["category"].is_null());
    assert!(json["comparison"].is_null());
    assert_eq!(json["preview"]["headers"][0], "都道府県");
    assert_eq!(json["notices"][0]["level"], "error");
}

/// An empty `regions` value is an explicit empty selection.
#[tokio::test]
async fn test_dashboard_empty_region_selection() {
    let app = test_app();
    let body = multipart_body(Some(SAMPLE_CSV.as_bytes()), &[("regions", "")]);

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["comparison"].is_null());
    assert_eq!(json["selected_regions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_dashboard_missing_file_is_bad_request() {
    let app = test_app();
    let body = multipart_body(None, &[("category", "米")]);

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_dashboard_unknown_category_is_bad_request() {
    let app = test_app();
    let body = multipart_body(Some(SAMPLE_CSV.as_bytes()), &[("category", "肉")]);

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["message"], "列「肉」は選択できません");
}

#[tokio::test]
async fn test_dashboard_ragged_csv_is_bad_request() {
    let app = test_app();
    let body = multipart_body(Some("都道府県,米\n東京都,1,2\n".as_bytes()), &[]);

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .starts_with("CSVの読み込みに失敗しました")
    );
}

#[tokio::test]
async fn test_dashboard_upload_limit() {
    let app = test_app_with_limit(1);
    let mut csv = String::from("都道府県,米\n");
    while csv.len() < 2 * 1024 * 1024 {
        csv.push_str("東京都,100\n");
    }
    let body = multipart_body(Some(csv.as_bytes()), &[]);

    let response = app.router.oneshot(dashboard_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
