//! Integration tests for DashboardService.
//!
//! These tests drive full renders from raw CSV bytes using mock boundary sources.

use crate::integration::common::{MockBoundarySource, SAMPLE_CSV, WIDE_CSV, sample_boundaries};
use shokuhi_core::{
    AppError, CorrelationStatus, DashboardConfig, DashboardRequest, DashboardService, NoticeLevel,
    SAME_AXIS_PROMPT,
};

fn service(source: MockBoundarySource) -> DashboardService<MockBoundarySource> {
    DashboardService::new(source, DashboardConfig::default())
}

fn regions(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|s| s.to_string()).collect())
}

/// Selecting 米 for 東京都 and 大阪府 gives bars 100, 80 and the matching table.
#[tokio::test]
async fn test_bar_chart_and_detail_table() {
    // Arrange
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let request = DashboardRequest {
        category: Some("米".to_string()),
        regions: regions(&["東京都", "大阪府"]),
        ..Default::default()
    };

    // Act
    let view = service.render(SAMPLE_CSV.as_bytes(), &request).await.unwrap();

    // Assert
    assert_eq!(view.encoding, "UTF-8");
    assert_eq!(view.region_column, "都道府県");
    assert_eq!(view.categories, vec!["米", "パン"]);
    assert_eq!(view.category.as_deref(), Some("米"));

    let comparison = view.comparison.expect("selection is not empty");
    assert_eq!(comparison.bar.chart.values(), vec![100.0, 80.0]);
    assert!(comparison.bar.svg.contains("<svg"));

    let table: Vec<(&str, Option<f64>)> = comparison
        .details
        .iter()
        .map(|r| (r.region.as_str(), r.value))
        .collect();
    assert_eq!(table, vec![("東京都", Some(100.0)), ("大阪府", Some(80.0))]);
}

/// Without explicit choices the first category after the region column and
/// the preferred regions are used.
#[tokio::test]
async fn test_defaults_without_choices() {
    let service = service(MockBoundarySource::new(sample_boundaries()));

    let view = service
        .render(WIDE_CSV.as_bytes(), &DashboardRequest::default())
        .await
        .unwrap();

    assert_eq!(view.category.as_deref(), Some("米"));
    assert_eq!(view.selected_regions, vec!["東京都", "大阪府"]);
    assert_eq!(view.preview.rows.len(), 5);
    assert_eq!(view.preview.total_rows, 5);
    assert_eq!(
        view.region_options,
        vec!["北海道", "大阪府", "東京都", "沖縄県", "福岡県"]
    );
}

/// Equal scatter axes give the prompt and no chart.
#[tokio::test]
async fn test_same_axis_prompt() {
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let request = DashboardRequest {
        scatter_x: Some("米".to_string()),
        scatter_y: Some("米".to_string()),
        ..Default::default()
    };

    let view = service.render(SAMPLE_CSV.as_bytes(), &request).await.unwrap();

    let correlation = view.comparison.unwrap().correlation.unwrap();
    assert_eq!(correlation.status, CorrelationStatus::SameAxis);
    assert!(correlation.scatter.is_none());
    assert!(correlation.coefficient.is_none());
    assert!(view.notices.iter().any(|n| n.message == SAME_AXIS_PROMPT));
}

/// A correlation across every row with both values, highlighted selection.
#[tokio::test]
async fn test_correlation_across_all_rows() {
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let request = DashboardRequest {
        regions: regions(&["福岡県"]),
        scatter_x: Some("パン".to_string()),
        scatter_y: Some("めん類".to_string()),
        ..Default::default()
    };

    let view = service.render(WIDE_CSV.as_bytes(), &request).await.unwrap();

    let correlation = view.comparison.unwrap().correlation.unwrap();
    assert_eq!(correlation.status, CorrelationStatus::Computed);
    let r = correlation.coefficient.unwrap();
    assert!(r > 0.7, "パン and めん類 rise together, got {}", r);
    assert!(correlation.summary.contains("強い正の相関"));

    let plot = &correlation.scatter.unwrap().plot;
    assert_eq!(plot.points.len(), 5);
    let highlighted: Vec<&str> = plot.highlighted().map(|p| p.region.as_str()).collect();
    assert_eq!(highlighted, vec!["福岡県"]);
}

/// A region missing from the boundary names renders uncolored, without error.
#[tokio::test]
async fn test_unmatched_region_is_not_an_error() {
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let request = DashboardRequest {
        regions: regions(&["沖縄県", "東京都"]),
        ..Default::default()
    };

    let view = service.render(WIDE_CSV.as_bytes(), &request).await.unwrap();

    let map = view.comparison.unwrap().map.expect("map renders");
    assert_eq!(map.map.unmatched_regions, vec!["沖縄県"]);
    assert!(map.map.regions.iter().all(|r| r.name != "沖縄県"));
    assert_eq!(map.map.colored_count(), 4);
    assert!(view.notices.iter().all(|n| n.level != NoticeLevel::Error));
}

/// A failed boundary fetch drops the map and keeps everything else.
#[tokio::test]
async fn test_boundary_failure_degrades_map_only() {
    let service = service(MockBoundarySource::failing());

    let view = service
        .render(SAMPLE_CSV.as_bytes(), &DashboardRequest::default())
        .await
        .unwrap();

    let comparison = view.comparison.unwrap();
    assert!(comparison.map.is_none());
    assert_eq!(comparison.bar.chart.values(), vec![100.0, 80.0]);
    assert_eq!(comparison.details.len(), 2);

    let errors: Vec<&str> = view
        .notices
        .iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(
        errors,
        vec!["地図データを取得できませんでした。地図の表示をスキップします"]
    );
}

/// An empty selection suppresses every dependent render.
#[tokio::test]
async fn test_empty_selection_suppresses_comparison() {
    let source = MockBoundarySource::new(sample_boundaries());
    let service = service(source.clone());
    let request = DashboardRequest {
        regions: Some(Vec::new()),
        ..Default::default()
    };

    let view = service.render(SAMPLE_CSV.as_bytes(), &request).await.unwrap();

    assert!(view.comparison.is_none());
    assert!(view.selected_regions.is_empty());
    assert_eq!(source.load_count(), 0, "No map means no boundary fetch");
}

/// Selecting more than the advisory maximum warns but keeps every region.
#[tokio::test]
async fn test_over_limit_warns_without_truncating() {
    let config = DashboardConfig {
        max_regions: 2,
        ..Default::default()
    };
    let service = DashboardService::new(MockBoundarySource::new(sample_boundaries()), config);
    let request = DashboardRequest {
        regions: regions(&["北海道", "東京都", "大阪府"]),
        ..Default::default()
    };

    let view = service.render(WIDE_CSV.as_bytes(), &request).await.unwrap();

    assert_eq!(view.selected_regions.len(), 3);
    assert_eq!(view.comparison.unwrap().bar.chart.bars.len(), 3);
    assert!(
        view.notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("最大2つ"))
    );
}

/// Unknown region names are dropped with a warning.
#[tokio::test]
async fn test_unknown_region_names_warn() {
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let request = DashboardRequest {
        regions: regions(&["東京都", "京都府"]),
        ..Default::default()
    };

    let view = service.render(SAMPLE_CSV.as_bytes(), &request).await.unwrap();

    assert_eq!(view.selected_regions, vec!["東京都"]);
    assert!(view.notices.iter().any(|n| n.message.contains("京都府")));
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let request = DashboardRequest {
        category: Some("肉".to_string()),
        ..Default::default()
    };

    let result = service.render(SAMPLE_CSV.as_bytes(), &request).await;

    assert!(matches!(result, Err(AppError::UnknownColumn(name)) if name == "肉"));
}

/// A region column alone still shows the preview, then stops with a message.
#[tokio::test]
async fn test_region_column_only_stops_after_preview() {
    let source = MockBoundarySource::new(sample_boundaries());
    let service = service(source.clone());

    let view = service
        .render("都道府県\n東京都\n".as_bytes(), &DashboardRequest::default())
        .await
        .unwrap();

    assert_eq!(view.preview.headers, vec!["都道府県"]);
    assert_eq!(view.preview.rows, vec![vec!["東京都".to_string()]]);
    assert!(view.categories.is_empty());
    assert!(view.category.is_none());
    assert!(view.comparison.is_none());
    assert_eq!(view.notices.len(), 1);
    assert_eq!(view.notices[0].level, NoticeLevel::Error);
    assert_eq!(view.notices[0].message, AppError::NoCategories.user_message());
    assert_eq!(source.load_count(), 0);
}

/// A text column right after the region column becomes the default category
/// and is flagged instead of silently drawing empty charts.
#[tokio::test]
async fn test_text_category_is_flagged() {
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let csv = "都道府県,備考,米\n東京都,多い,100\n大阪府,少ない,80\n";

    let view = service
        .render(csv.as_bytes(), &DashboardRequest::default())
        .await
        .unwrap();

    assert_eq!(view.category.as_deref(), Some("備考"));
    let flagged: Vec<_> = view
        .notices
        .iter()
        .filter(|n| n.level == NoticeLevel::Warning && n.message.contains("「備考」"))
        .collect();
    assert_eq!(flagged.len(), 1, "notices: {:?}", view.notices);
}

/// A numeric category with a text scatter axis flags only the axis.
#[tokio::test]
async fn test_text_scatter_axis_is_flagged() {
    let service = service(MockBoundarySource::new(sample_boundaries()));
    let csv = "都道府県,米,備考\n東京都,100,多い\n大阪府,80,少ない\n";
    let request = DashboardRequest {
        category: Some("米".to_string()),
        scatter_x: Some("米".to_string()),
        scatter_y: Some("備考".to_string()),
        ..Default::default()
    };

    let view = service.render(csv.as_bytes(), &request).await.unwrap();

    let correlation = view.comparison.unwrap().correlation.unwrap();
    assert_eq!(correlation.status, CorrelationStatus::Undefined);
    assert!(view.notices.iter().any(|n| n.message.contains("「備考」")));
    assert!(!view.notices.iter().any(|n| n.message.contains("「米」")));
}

#[tokio::test]
async fn test_unreadable_upload_is_a_user_error() {
    let service = service(MockBoundarySource::new(sample_boundaries()));

    let err = service
        .render(b"", &DashboardRequest::default())
        .await
        .unwrap_err();

    assert!(err.is_user_error());
    assert!(err.user_message().starts_with("CSVの読み込みに失敗しました"));
}
