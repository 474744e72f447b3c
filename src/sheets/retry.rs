//! Retry gateway for outbound backend calls
//!
//! Every call to the spreadsheet backend is routed through
//! [`call_with_retry`], which classifies failures as retryable or fatal and
//! reattempts retryable ones with exponential backoff. Classification is a
//! case-insensitive substring test against the error's rendered message; the
//! pattern list and the delay formula are part of the tool's observable
//! behavior and must not drift.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::sheets::range::GridRange;
use crate::sheets::types::{
    CellFormat, ColumnWidth, SheetsBackend, SheetsError, SpreadsheetHandle, ValidationRule,
};

/// Total attempts per call, including the first
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt; doubles per further attempt
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// Message fragments that mark an error as transient
const RETRYABLE_PATTERNS: [&str; 8] = [
    "quota exceeded",
    "rate limit",
    "timeout",
    "connection",
    "network",
    "internal error",
    "service unavailable",
    "temporary failure",
];

/// Classify an error as retryable or fatal
///
/// This is a best-effort textual policy: it matches the whole lower-cased
/// message, not a structured error code, so it only works as long as the
/// error's string representation is preserved end to end.
#[must_use]
pub fn is_retryable_error(err: &SheetsError) -> bool {
    let message = err.to_string().to_lowercase();
    RETRYABLE_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// Execute an operation with the retry policy
///
/// The operation is any async closure; its arguments are whatever the
/// closure captured, so the wrapping logic stays oblivious to the wrapped
/// call's shape.
///
/// - Success returns immediately, with no further attempts and no delay.
/// - A fatal failure is returned immediately.
/// - A retryable failure sleeps `BASE_DELAY * 2^attempt_index` (1s, 2s) and
///   retries, up to [`MAX_ATTEMPTS`] total attempts; the last error is then
///   returned.
///
/// # Errors
///
/// Returns the wrapped operation's error once it is fatal or retries are
/// exhausted.
pub async fn call_with_retry<T, F, Fut>(operation: &str, mut call: F) -> Result<T, SheetsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SheetsError>>,
{
    let mut attempt: u32 = 0;

    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;

                if !is_retryable_error(&err) {
                    error!(operation, error = %err, "Backend call failed");
                    return Err(err);
                }

                if attempt >= MAX_ATTEMPTS {
                    error!(
                        operation,
                        attempts = attempt,
                        error = %err,
                        "Backend call failed after retries"
                    );
                    return Err(err);
                }

                let backoff = BASE_DELAY * 2u32.pow(attempt - 1);
                warn!(
                    operation,
                    attempt,
                    backoff_secs = backoff.as_secs(),
                    error = %err,
                    "Transient backend error, will retry"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

/// A wrapper around a [`SheetsBackend`] that applies the retry policy to
/// every call
///
/// The orchestration sequence talks to this decorator so that no outbound
/// call can bypass the gateway.
pub struct RetryingBackend {
    inner: Arc<dyn SheetsBackend>,
}

impl RetryingBackend {
    #[must_use]
    pub fn new(inner: Arc<dyn SheetsBackend>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SheetsBackend for RetryingBackend {
    async fn create_spreadsheet(&self, title: &str) -> Result<SpreadsheetHandle, SheetsError> {
        call_with_retry("spreadsheets.create", || {
            self.inner.create_spreadsheet(title)
        })
        .await
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        call_with_retry("values.update", || {
            self.inner.update_values(spreadsheet_id, range, rows)
        })
        .await
    }

    async fn format_range(
        &self,
        spreadsheet_id: &str,
        range: &GridRange,
        format: &CellFormat,
    ) -> Result<(), SheetsError> {
        call_with_retry("format.repeatCell", || {
            self.inner.format_range(spreadsheet_id, range, format)
        })
        .await
    }

    async fn set_column_widths(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
        widths: &[ColumnWidth],
    ) -> Result<(), SheetsError> {
        call_with_retry("columns.resize", || {
            self.inner.set_column_widths(spreadsheet_id, sheet_id, widths)
        })
        .await
    }

    async fn set_validation(
        &self,
        spreadsheet_id: &str,
        rule: &ValidationRule,
    ) -> Result<(), SheetsError> {
        call_with_retry("validation.set", || {
            self.inner.set_validation(spreadsheet_id, rule)
        })
        .await
    }

    async fn add_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<i64, SheetsError> {
        call_with_retry("sheets.add", || {
            self.inner.add_sheet(spreadsheet_id, title, rows, cols)
        })
        .await
    }
}
