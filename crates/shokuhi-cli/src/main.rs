mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use shokuhi_client::BoundarySourceEnum;
use shokuhi_core::traits::BoundarySource;
use shokuhi_core::{
    CorrelationStatus, CorrelationView, DashboardConfig, DashboardRequest, DashboardService,
    DashboardView, DetailRow, Notice, NoticeLevel, ParsedUpload, TablePreview, ingest_bytes,
    load_dashboard_config,
};

use config::{Command, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::parse();

    let mut dashboard_config =
        load_dashboard_config(config.config.clone()).context("Failed to load configuration")?;
    if let Some(url) = &config.boundary_url {
        dashboard_config.boundary_url = url.clone();
    }

    match config.command {
        Command::Inspect { csv } => {
            inspect(&csv, &dashboard_config).await?;
        }
        Command::Render {
            csv,
            category,
            regions,
            x,
            y,
            output,
        } => {
            let source =
                BoundarySourceEnum::from_config(&dashboard_config, config.boundary_file.as_deref())
                    .context("Failed to configure boundary source")?;
            info!(source = %source.describe(), "Boundary source configured");

            let service = DashboardService::new(source, dashboard_config);
            let request = DashboardRequest {
                category,
                regions: (!regions.is_empty()).then_some(regions),
                scatter_x: x,
                scatter_y: y,
            };
            render(&service, &csv, &request, &output).await?;
        }
    }

    Ok(())
}

async fn read_csv(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn inspect(path: &Path, config: &DashboardConfig) -> anyhow::Result<()> {
    let bytes = read_csv(path).await?;
    let ParsedUpload { encoding, dataset } =
        ingest_bytes(&bytes).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    println!("\n📄 {}\n", path.display());
    println!("  Encoding:              {}", encoding);
    println!("  Region column:         {}", dataset.region_header());
    println!("  Rows:                  {}", dataset.row_count());
    let categories = dataset.category_names();
    if categories.is_empty() {
        println!("  Categories:            (none)");
    } else {
        println!("  Categories:            {}", categories.join(", "));
    }
    println!();
    print!("{}", format_preview(&dataset.preview(config.preview_rows)));

    Ok(())
}

async fn render(
    service: &DashboardService<BoundarySourceEnum>,
    path: &Path,
    request: &DashboardRequest,
    output: &Path,
) -> anyhow::Result<()> {
    let bytes = read_csv(path).await?;
    let view = service
        .render(&bytes, request)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    print_summary(&view);

    let Some(comparison) = &view.comparison else {
        print_notices(&view.notices);
        return Ok(());
    };

    tokio::fs::create_dir_all(output)
        .await
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let mut written = vec![write_svg(output, "bar.svg", &comparison.bar.svg).await?];
    if let Some(map) = &comparison.map {
        written.push(write_svg(output, "map.svg", &map.svg).await?);
    }
    if let Some(scatter) = comparison.correlation.as_ref().and_then(|c| c.scatter.as_ref()) {
        written.push(write_svg(output, "scatter.svg", &scatter.svg).await?);
    }

    println!("\n{}の詳細データ\n", view.category.as_deref().unwrap_or_default());
    print!("{}", format_details(&comparison.details));

    if let Some(correlation) = &comparison.correlation {
        println!();
        print!("{}", format_correlation(correlation));
    }

    print_notices(&view.notices);

    println!();
    for file in &written {
        println!("  ✓ {}", file.display());
    }
    println!();

    Ok(())
}

async fn write_svg(dir: &Path, name: &str, svg: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    tokio::fs::write(&path, svg)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn print_summary(view: &DashboardView) {
    println!();
    println!("═══════════════════════════════════════════════════════");
    println!("  {}", view.category.as_deref().unwrap_or("(カテゴリなし)"));
    println!("═══════════════════════════════════════════════════════");
    println!("  Encoding:              {}", view.encoding);
    println!("  Region column:         {}", view.region_column);
    println!(
        "  Selected regions:      {} ({}/{})",
        view.selected_regions.join("、"),
        view.selected_regions.len(),
        view.max_regions
    );
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{}", format_notice(notice));
    }
}

fn format_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Warning => "⚠",
        NoticeLevel::Error => "✗",
    };
    format!("{} {}", marker, notice.message)
}

fn format_preview(preview: &TablePreview) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {}\n", preview.headers.join(" | ")));
    for row in &preview.rows {
        out.push_str(&format!("  {}\n", row.join(" | ")));
    }
    if preview.total_rows > preview.rows.len() {
        out.push_str(&format!(
            "  ... ({} of {} rows shown)\n",
            preview.rows.len(),
            preview.total_rows
        ));
    }
    out
}

fn format_details(rows: &[DetailRow]) -> String {
    rows.iter()
        .map(|row| {
            let value = row
                .value
                .map(format_amount)
                .unwrap_or_else(|| "-".to_string());
            format!("  {:<8} {:>12}\n", row.region, value)
        })
        .collect()
}

fn format_correlation(view: &CorrelationView) -> String {
    match (view.status, view.coefficient) {
        (CorrelationStatus::Computed, Some(r)) => {
            format!("  {} × {}: r = {:.3}\n  {}\n", view.x, view.y, r, view.summary)
        }
        _ => format!("  {}\n", view.summary),
    }
}

/// Integer amounts print without decimals.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
