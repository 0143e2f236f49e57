use clap::Parser;
use std::path::PathBuf;

use shokuhi_core::{AppError, DashboardConfig, load_dashboard_config};

/// Server configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug, Clone)]
#[command(name = "shokuhi-server")]
#[command(author, version, about = "Web dashboard for prefectural food-expenditure data")]
pub struct ServerConfig {
    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Path to dashboard.toml configuration file
    #[arg(long, env = "SHOKUHI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the boundary GeoJSON URL from the configuration file
    #[arg(long, env = "BOUNDARY_URL")]
    pub boundary_url: Option<String>,

    /// Read boundaries from a local GeoJSON file instead of the network
    #[arg(long, env = "BOUNDARY_FILE")]
    pub boundary_file: Option<PathBuf>,

    /// Allowed CORS origins, comma-separated, or "*" for any
    #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Maximum upload size in MiB
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "10")]
    pub max_upload_mb: usize,
}

impl ServerConfig {
    /// Loads the dashboard configuration and applies command-line overrides.
    pub fn dashboard_config(&self) -> Result<DashboardConfig, AppError> {
        let mut config = load_dashboard_config(self.config.clone())?;
        if let Some(url) = &self.boundary_url {
            config.boundary_url = url.clone();
        }
        Ok(config)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
