//! Configuration types for Shokuhi components.
//!
//! Configuration is layered: built-in defaults, then an optional
//! `dashboard.toml`, then command line flags / environment variables applied
//! by the binaries.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Default boundary dataset: Japanese prefecture polygons keyed by `nam_ja`.
pub const DEFAULT_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/dataofjapan/land/master/japan.geojson";

/// Feature property holding the prefecture name in the default boundary dataset.
pub const DEFAULT_JOIN_PROPERTY: &str = "nam_ja";

/// Number of selected regions above which the dashboard warns.
pub const DEFAULT_MAX_REGIONS: usize = 5;

/// Number of rows shown in the head-of-file preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "dashboard.toml";

/// HTTP client configuration for the boundary fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Dashboard configuration.
///
/// # Example
///
/// ```toml
/// boundary_url = "https://example.com/japan.geojson"
/// boundary_join_property = "nam_ja"
/// max_regions = 5
/// default_regions = ["東京都", "大阪府"]
///
/// [http]
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// URL of the GeoJSON boundary document.
    #[serde(default = "default_boundary_url")]
    pub boundary_url: String,

    /// Feature property used as the join key against the region column.
    #[serde(default = "default_join_property")]
    pub boundary_join_property: String,

    /// Selection size above which a warning is shown. Selections are never truncated.
    #[serde(default = "default_max_regions")]
    pub max_regions: usize,

    /// Regions pre-selected when the request carries no selection, in preference order.
    #[serde(default = "default_regions")]
    pub default_regions: Vec<String>,

    /// Number of rows in the head-of-file preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    #[serde(default)]
    pub http: HttpConfig,
}

fn default_boundary_url() -> String {
    DEFAULT_BOUNDARY_URL.to_string()
}

fn default_join_property() -> String {
    DEFAULT_JOIN_PROPERTY.to_string()
}

fn default_max_regions() -> usize {
    DEFAULT_MAX_REGIONS
}

fn default_regions() -> Vec<String> {
    vec!["東京都".to_string(), "大阪府".to_string()]
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            boundary_url: default_boundary_url(),
            boundary_join_property: default_join_property(),
            max_regions: default_max_regions(),
            default_regions: default_regions(),
            preview_rows: default_preview_rows(),
            http: HttpConfig::default(),
        }
    }
}

/// Returns the default configuration file path.
///
/// Path: `~/.config/shokuhi/dashboard.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("shokuhi").join(CONFIG_FILE_NAME))
}

/// Load dashboard configuration from a TOML file.
///
/// # Arguments
/// * `path` - Optional custom path. If `None`, uses the default XDG path.
///
/// # Behavior
/// * Custom path that does not exist → `ConfigError`.
/// * Default path that does not exist → built-in defaults.
/// * File exists but is invalid → `ConfigError`.
pub fn load_dashboard_config(path: Option<PathBuf>) -> Result<DashboardConfig, AppError> {
    let using_default_path = path.is_none();
    let config_path = match path {
        Some(p) => p,
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(DashboardConfig::default()),
        },
    };

    if !config_path.exists() {
        if using_default_path {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(DashboardConfig::default());
        }
        return Err(AppError::ConfigError(format!(
            "Config file not found: {}",
            config_path.display()
        )));
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        AppError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    let config: DashboardConfig = toml::from_str(&content).map_err(|e| {
        AppError::ConfigError(format!(
            "Invalid TOML in '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    tracing::info!("Loaded dashboard configuration from {}", config_path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_dashboard_config_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.boundary_url, DEFAULT_BOUNDARY_URL);
        assert_eq!(config.boundary_join_property, "nam_ja");
        assert_eq!(config.max_regions, 5);
        assert_eq!(config.default_regions, vec!["東京都", "大阪府"]);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DashboardConfig = toml::from_str("max_regions = 3\n").unwrap();
        assert_eq!(config.max_regions, 3);
        assert_eq!(config.boundary_join_property, "nam_ja");
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_load_dashboard_config_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
boundary_url = "https://example.com/pref.geojson"
default_regions = ["北海道"]

[http]
timeout_secs = 5
"#
        )
        .unwrap();

        let config = load_dashboard_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.boundary_url, "https://example.com/pref.geojson");
        assert_eq!(config.default_regions, vec!["北海道"]);
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.max_regions, 5);
    }

    #[test]
    fn test_load_dashboard_config_custom_path_not_found() {
        let result = load_dashboard_config(Some("/nonexistent/path/dashboard.toml".into()));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_load_dashboard_config_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let result = load_dashboard_config(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("shokuhi/dashboard.toml"));
        }
    }
}
