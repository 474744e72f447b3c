//! Sheets v4 REST implementation of the backend trait
//!
//! One `reqwest::Client` is configured per process and reused for every
//! call. The three REST surfaces in play are document creation
//! (`POST /v4/spreadsheets`), value writes
//! (`PUT /v4/spreadsheets/{id}/values/{range}`), and batched structural
//! updates (`POST /v4/spreadsheets/{id}:batchUpdate`), which carry
//! formatting, dimension, validation, and add-sheet requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::Session;
use crate::sheets::range::GridRange;
use crate::sheets::types::{
    CellFormat, ColumnWidth, SheetsBackend, SheetsError, SpreadsheetHandle, ValidationRule,
};

/// Connect timeout for the shared HTTP client
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// REST backend for the hosted spreadsheet service
pub struct RestBackend {
    client: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl RestBackend {
    /// Create a new REST backend over an authorized session
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Client`] if the HTTP client cannot be
    /// constructed.
    pub fn new(session: Arc<Session>, base_url: impl Into<String>) -> Result<Self, SheetsError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .use_rustls_tls()
            .build()
            .map_err(|e| SheetsError::Client(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Send a request and surface non-success statuses as [`SheetsError`]
    async fn execute(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, SheetsError> {
        debug!(operation, "Executing backend request");

        let response = request
            .header(reqwest::header::AUTHORIZATION, self.session.bearer())
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(operation, status, &body))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<T, SheetsError> {
        response.json().await.map_err(|e| SheetsError::Decode {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }

    async fn batch_update(
        &self,
        operation: &str,
        spreadsheet_id: &str,
        requests: Vec<BatchRequest>,
    ) -> Result<BatchUpdateResponse, SheetsError> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, spreadsheet_id
        );
        let response = self
            .execute(
                operation,
                self.client.post(&url).json(&BatchUpdateBody { requests }),
            )
            .await?;
        Self::decode(operation, response).await
    }
}

#[async_trait]
impl SheetsBackend for RestBackend {
    async fn create_spreadsheet(&self, title: &str) -> Result<SpreadsheetHandle, SheetsError> {
        let operation = "spreadsheets.create";
        let url = format!("{}/v4/spreadsheets", self.base_url);
        let body = CreateSpreadsheetRequest {
            properties: DocumentProperties {
                title: title.to_string(),
            },
        };

        let response = self
            .execute(operation, self.client.post(&url).json(&body))
            .await?;
        let created: CreateSpreadsheetResponse = Self::decode(operation, response).await?;

        let first_sheet_id = created
            .sheets
            .first()
            .map(|sheet| sheet.properties.sheet_id)
            .ok_or_else(|| SheetsError::Decode {
                operation: operation.to_string(),
                message: "created document has no sheets".to_string(),
            })?;

        Ok(SpreadsheetHandle {
            spreadsheet_id: created.spreadsheet_id,
            url: created.spreadsheet_url,
            first_sheet_id,
        })
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let operation = "values.update";
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, spreadsheet_id, range
        );
        let body = ValueRangeBody {
            range: range.to_string(),
            major_dimension: "ROWS",
            values: rows.to_vec(),
        };

        self.execute(
            operation,
            self.client
                .put(&url)
                .query(&[("valueInputOption", "USER_ENTERED")])
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn format_range(
        &self,
        spreadsheet_id: &str,
        range: &GridRange,
        format: &CellFormat,
    ) -> Result<(), SheetsError> {
        let request = BatchRequest::RepeatCell(RepeatCellRequest {
            range: ApiGridRange::from(*range),
            cell: CellData {
                user_entered_format: ApiCellFormat::from(format),
            },
            fields: format_fields(format),
        });

        self.batch_update("format.repeatCell", spreadsheet_id, vec![request])
            .await?;
        Ok(())
    }

    async fn set_column_widths(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
        widths: &[ColumnWidth],
    ) -> Result<(), SheetsError> {
        let requests = widths
            .iter()
            .map(|width| {
                BatchRequest::UpdateDimensionProperties(UpdateDimensionPropertiesRequest {
                    range: DimensionRange {
                        sheet_id,
                        dimension: "COLUMNS",
                        start_index: width.column,
                        end_index: width.column + 1,
                    },
                    properties: DimensionProperties {
                        pixel_size: width.pixels,
                    },
                    fields: "pixelSize",
                })
            })
            .collect();

        self.batch_update("columns.resize", spreadsheet_id, requests)
            .await?;
        Ok(())
    }

    async fn set_validation(
        &self,
        spreadsheet_id: &str,
        rule: &ValidationRule,
    ) -> Result<(), SheetsError> {
        let request = BatchRequest::SetDataValidation(SetDataValidationRequest {
            range: ApiGridRange::from(rule.range),
            rule: ApiValidationRule {
                condition: BooleanCondition {
                    condition_type: "ONE_OF_LIST",
                    values: rule
                        .allowed_values
                        .iter()
                        .map(|value| ConditionValue {
                            user_entered_value: value.clone(),
                        })
                        .collect(),
                },
                show_custom_ui: true,
                strict: rule.strict,
            },
        });

        self.batch_update("validation.set", spreadsheet_id, vec![request])
            .await?;
        Ok(())
    }

    async fn add_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<i64, SheetsError> {
        let operation = "sheets.add";
        let request = BatchRequest::AddSheet(AddSheetRequest {
            properties: AddSheetProperties {
                title: title.to_string(),
                grid_properties: ApiGridProperties {
                    row_count: rows,
                    column_count: cols,
                },
            },
        });

        let response = self
            .batch_update(operation, spreadsheet_id, vec![request])
            .await?;

        response
            .replies
            .into_iter()
            .find_map(|reply| reply.add_sheet)
            .map(|reply| reply.properties.sheet_id)
            .ok_or_else(|| SheetsError::Decode {
                operation: operation.to_string(),
                message: "batch reply is missing the added sheet".to_string(),
            })
    }
}

/// Map a delivery failure to a transport error
///
/// The message wording is load-bearing: the retry gateway classifies by
/// substring, so timeouts and connection failures must render as such.
fn transport_error(operation: &str, err: &reqwest::Error) -> SheetsError {
    let message = if err.is_timeout() {
        format!("request timeout: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("network error: {err}")
    };
    SheetsError::Transport {
        operation: operation.to_string(),
        message,
    }
}

/// Map a non-success HTTP status to the matching error variant
///
/// 401/403 are authentication failures, 429 is quota, 5xx is a backend
/// outage; everything else is an API rejection. The response body's error
/// message is attached when it parses.
fn map_status_error(operation: &str, status: StatusCode, body: &str) -> SheetsError {
    let detail = api_error_message(body)
        .map(|message| format!("{status}: {message}"))
        .unwrap_or_else(|| status.to_string());
    let operation = operation.to_string();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SheetsError::Auth {
            operation,
            message: detail,
        },
        StatusCode::TOO_MANY_REQUESTS => SheetsError::Quota {
            operation,
            message: detail,
        },
        _ if status.is_server_error() => SheetsError::Outage {
            operation,
            message: detail,
        },
        _ => SheetsError::Api {
            operation,
            message: detail,
        },
    }
}

/// Best-effort extraction of the backend's error message from a body
fn api_error_message(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    Some(parsed.error.message)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Serialize)]
struct CreateSpreadsheetRequest {
    properties: DocumentProperties,
}

#[derive(Debug, Serialize)]
struct DocumentProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSpreadsheetResponse {
    spreadsheet_id: String,
    spreadsheet_url: String,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetEntryProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetEntryProperties {
    sheet_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody {
    range: String,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct BatchUpdateBody {
    requests: Vec<BatchRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum BatchRequest {
    RepeatCell(RepeatCellRequest),
    UpdateDimensionProperties(UpdateDimensionPropertiesRequest),
    SetDataValidation(SetDataValidationRequest),
    AddSheet(AddSheetRequest),
}

#[derive(Debug, Serialize)]
struct RepeatCellRequest {
    range: ApiGridRange,
    cell: CellData,
    fields: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CellData {
    user_entered_format: ApiCellFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiCellFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    background_color: Option<ApiColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_format: Option<ApiTextFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    horizontal_alignment: Option<&'static str>,
}

impl From<&CellFormat> for ApiCellFormat {
    fn from(format: &CellFormat) -> Self {
        let text_format = if format.bold.is_some()
            || format.foreground.is_some()
            || format.font_size.is_some()
        {
            Some(ApiTextFormat {
                bold: format.bold,
                foreground_color: format.foreground.map(ApiColor::from),
                font_size: format.font_size,
            })
        } else {
            None
        };

        Self {
            background_color: format.background.map(ApiColor::from),
            text_format,
            horizontal_alignment: format.horizontal_alignment.map(|a| a.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTextFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    foreground_color: Option<ApiColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_size: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ApiColor {
    red: f64,
    green: f64,
    blue: f64,
}

impl From<crate::sheets::types::Color> for ApiColor {
    fn from(color: crate::sheets::types::Color) -> Self {
        Self {
            red: color.red,
            green: color.green,
            blue: color.blue,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGridRange {
    sheet_id: i64,
    start_row_index: u32,
    end_row_index: u32,
    start_column_index: u32,
    end_column_index: u32,
}

impl From<GridRange> for ApiGridRange {
    fn from(range: GridRange) -> Self {
        Self {
            sheet_id: range.sheet_id,
            start_row_index: range.start_row,
            end_row_index: range.end_row,
            start_column_index: range.start_col,
            end_column_index: range.end_col,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDimensionPropertiesRequest {
    range: DimensionRange,
    properties: DimensionProperties,
    fields: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DimensionRange {
    sheet_id: i64,
    dimension: &'static str,
    start_index: u32,
    end_index: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DimensionProperties {
    pixel_size: u32,
}

#[derive(Debug, Serialize)]
struct SetDataValidationRequest {
    range: ApiGridRange,
    rule: ApiValidationRule,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiValidationRule {
    condition: BooleanCondition,
    show_custom_ui: bool,
    strict: bool,
}

#[derive(Debug, Serialize)]
struct BooleanCondition {
    #[serde(rename = "type")]
    condition_type: &'static str,
    values: Vec<ConditionValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConditionValue {
    user_entered_value: String,
}

#[derive(Debug, Serialize)]
struct AddSheetRequest {
    properties: AddSheetProperties,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddSheetProperties {
    title: String,
    grid_properties: ApiGridProperties,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGridProperties {
    row_count: u32,
    column_count: u32,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<BatchReply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchReply {
    add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Deserialize)]
struct AddSheetReply {
    properties: AddedSheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddedSheetProperties {
    sheet_id: i64,
}

/// Build the update mask for a repeatCell request from the set fields
fn format_fields(format: &CellFormat) -> String {
    let mut fields = Vec::new();
    if format.background.is_some() {
        fields.push("backgroundColor");
    }
    if format.bold.is_some() || format.foreground.is_some() || format.font_size.is_some() {
        fields.push("textFormat");
    }
    if format.horizontal_alignment.is_some() {
        fields.push("horizontalAlignment");
    }

    if fields.is_empty() {
        "userEnteredFormat".to_string()
    } else {
        format!("userEnteredFormat({})", fields.join(","))
    }
}
