//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use async_trait::async_trait;
use sheetcal::sheets::{
    CellFormat, ColumnWidth, GridRange, SheetsBackend, SheetsError, SpreadsheetHandle,
    ValidationRule,
};

/// Sheet id the recording backend hands out for added sheets
pub const ADDED_SHEET_ID: i64 = 99;

/// One observed backend call, reduced to the fields the tests assert on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CreateSpreadsheet { title: String },
    UpdateValues { range: String, rows: usize, cols: usize },
    FormatRange { sheet_id: i64, start_row: u32, start_col: u32 },
    SetColumnWidths { sheet_id: i64, columns: usize },
    SetValidation { column: u32, options: usize },
    AddSheet { title: String, rows: u32, cols: u32 },
}

/// In-memory backend that records every call
///
/// Failure injection: `fail_column_widths` and `fail_validations` make those
/// calls fail fatally; `transient_update_failures` makes the next N value
/// writes fail with a retryable outage.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    created: AtomicI64,
    pub fail_column_widths: bool,
    pub fail_validations: bool,
    pub transient_update_failures: AtomicU32,
}

impl RecordingBackend {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejection(operation: &str) -> SheetsError {
        SheetsError::Api {
            operation: operation.to_string(),
            message: "rejected by test double".to_string(),
        }
    }
}

#[async_trait]
impl SheetsBackend for RecordingBackend {
    async fn create_spreadsheet(&self, title: &str) -> Result<SpreadsheetHandle, SheetsError> {
        self.record(BackendCall::CreateSpreadsheet {
            title: title.to_string(),
        });
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SpreadsheetHandle {
            spreadsheet_id: format!("doc-{n}"),
            url: format!("https://sheets.example.com/doc-{n}"),
            first_sheet_id: 0,
        })
    }

    async fn update_values(
        &self,
        _spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        self.record(BackendCall::UpdateValues {
            range: range.to_string(),
            rows: rows.len(),
            cols: rows.first().map_or(0, Vec::len),
        });

        if self.transient_update_failures.load(Ordering::SeqCst) > 0 {
            self.transient_update_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(SheetsError::Outage {
                operation: "values.update".to_string(),
                message: "503 injected".to_string(),
            });
        }
        Ok(())
    }

    async fn format_range(
        &self,
        _spreadsheet_id: &str,
        range: &GridRange,
        _format: &CellFormat,
    ) -> Result<(), SheetsError> {
        self.record(BackendCall::FormatRange {
            sheet_id: range.sheet_id,
            start_row: range.start_row,
            start_col: range.start_col,
        });
        Ok(())
    }

    async fn set_column_widths(
        &self,
        _spreadsheet_id: &str,
        sheet_id: i64,
        widths: &[ColumnWidth],
    ) -> Result<(), SheetsError> {
        self.record(BackendCall::SetColumnWidths {
            sheet_id,
            columns: widths.len(),
        });
        if self.fail_column_widths {
            return Err(Self::rejection("columns.resize"));
        }
        Ok(())
    }

    async fn set_validation(
        &self,
        _spreadsheet_id: &str,
        rule: &ValidationRule,
    ) -> Result<(), SheetsError> {
        self.record(BackendCall::SetValidation {
            column: rule.range.start_col,
            options: rule.allowed_values.len(),
        });
        if self.fail_validations {
            return Err(Self::rejection("validation.set"));
        }
        Ok(())
    }

    async fn add_sheet(
        &self,
        _spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<i64, SheetsError> {
        self.record(BackendCall::AddSheet {
            title: title.to_string(),
            rows,
            cols,
        });
        Ok(ADDED_SHEET_ID)
    }
}
