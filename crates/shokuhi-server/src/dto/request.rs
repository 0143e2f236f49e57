//! Request DTOs for API endpoints.

use axum::extract::Multipart;
use utoipa::ToSchema;

use shokuhi_core::DashboardRequest;

use crate::error::ApiError;

/// Multipart form for `POST /api/v1/dashboard`.
///
/// Omitting `regions` selects the default regions. Sending `regions` with an
/// empty value selects none.
#[derive(Debug, Default, ToSchema)]
pub struct DashboardForm {
    /// CSV file in any common encoding (UTF-8, Shift_JIS, EUC-JP, ...)
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,

    /// Spending category to compare (default: column after the region column)
    #[schema(example = "米")]
    pub category: Option<String>,

    /// Regions to compare, repeated once per region
    #[schema(example = json!(["東京都", "大阪府"]))]
    pub regions: Option<Vec<String>>,

    /// Category on the scatter x axis
    pub scatter_x: Option<String>,

    /// Category on the scatter y axis
    pub scatter_y: Option<String>,
}

impl DashboardForm {
    /// Reads every field of the multipart body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for a malformed body or a missing file,
    /// `ApiError::PayloadTooLarge` when the body exceeds the upload limit.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = DashboardForm::default();
        let mut has_file = false;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file = field.bytes().await?.to_vec();
                    has_file = true;
                }
                "category" => form.category = non_empty(field.text().await?),
                "regions" => {
                    let value = field.text().await?;
                    let regions = form.regions.get_or_insert_with(Vec::new);
                    if let Some(region) = non_empty(value) {
                        regions.push(region);
                    }
                }
                "scatter_x" => form.scatter_x = non_empty(field.text().await?),
                "scatter_y" => form.scatter_y = non_empty(field.text().await?),
                _ => {}
            }
        }

        if !has_file || form.file.is_empty() {
            return Err(ApiError::BadRequest(
                "CSVファイルをアップロードしてください".to_string(),
            ));
        }

        Ok(form)
    }

    /// Splits into the raw upload and the user's choices.
    pub fn into_parts(self) -> (Vec<u8>, DashboardRequest) {
        let request = DashboardRequest {
            category: self.category,
            regions: self.regions,
            scatter_x: self.scatter_x,
            scatter_y: self.scatter_y,
        };
        (self.file, request)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
