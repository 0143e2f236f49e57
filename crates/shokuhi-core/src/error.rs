use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all errors the dashboard can raise. Ingest errors
/// (`CsvParse`, `Encoding`, `EmptyDataset`) are user-facing and non-fatal: the
/// interaction stops after ingest and the message is shown to the user.
/// Boundary and network errors only ever affect the map.
///
/// # Examples
///
/// ```
/// use shokuhi_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::UnknownColumn("果物".to_string()))
/// }
///
/// assert!(example().unwrap_err().is_user_error());
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// The uploaded bytes are not well-formed CSV.
    ///
    /// Covers ragged rows, missing header row and duplicate headers.
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// The uploaded bytes could not be decoded with the detected encoding.
    #[error("Encoding error: could not decode input as {0}")]
    Encoding(String),

    /// The upload parsed but contains no data rows.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// A requested column does not exist or cannot be selected.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The dataset has no column besides the region column.
    #[error("Dataset has no category columns")]
    NoCategories,

    /// The boundary document could not be interpreted.
    #[error("Boundary data error: {0}")]
    Boundary(String),

    /// Network or connection error.
    ///
    /// This error occurs when the boundary fetch fails due to connectivity
    /// issues, DNS resolution failures, or the remote host being unreachable.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// HTTP client request failed (non-success status, body read failure).
    #[error("API Client error: {0}")]
    ClientError(String),

    /// Chart rendering failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration file error.
    ///
    /// This error occurs when reading or parsing the configuration file fails,
    /// such as when dashboard.toml is malformed or contains invalid values.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    #[error("Error: {0}")]
    Generic(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::CsvParse(err.to_string())
    }
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            AppError::CsvParse(msg) => format!("CSVの読み込みに失敗しました: {}", msg),
            AppError::Encoding(enc) => format!(
                "CSVの読み込みに失敗しました: 文字コード {} として解釈できません",
                enc
            ),
            AppError::EmptyDataset => "CSVの読み込みに失敗しました: データ行がありません".to_string(),
            AppError::UnknownColumn(name) => format!("列「{}」は選択できません", name),
            AppError::NoCategories => {
                "分析できる食料品カテゴリの列がありません。列が2つ以上あるCSVを使用してください"
                    .to_string()
            }
            AppError::Boundary(_)
            | AppError::NetworkError(_)
            | AppError::Timeout(_)
            | AppError::ClientError(_) => {
                "地図データを取得できませんでした。地図の表示をスキップします".to_string()
            }
            AppError::Render(msg) => format!("グラフの描画に失敗しました: {}", msg),
            AppError::ConfigError(msg) => format!("設定エラー: {}", msg),
            AppError::Generic(_) => self.to_string(),
        }
    }

    /// Returns true if this error was caused by the user's input rather than
    /// by the server or the network.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::CsvParse(_)
                | AppError::Encoding(_)
                | AppError::EmptyDataset
                | AppError::UnknownColumn(_)
                | AppError::NoCategories
        )
    }

    /// Returns true if this error came from fetching external data.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            AppError::NetworkError(_) | AppError::Timeout(_) | AppError::ClientError(_)
        )
    }
}
