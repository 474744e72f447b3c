//! Orchestration of the calendar creation sequence
//!
//! The sequence is fixed: create the document, write and format the header
//! row, set column widths, write the sample and planning rows, attach the
//! dropdown validations, then build the instructions sheet. Column widths
//! and validations are cosmetic enhancements whose failures are downgraded
//! to warnings; everything else aborts the run. Nothing is rolled back on a
//! later failure, and running the sequence twice creates two distinct
//! documents.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::sheets::{GridRange, SheetsBackend, SheetsError, SpreadsheetHandle, column_letter};
use crate::template;
use crate::validate;

/// A validated request for one calendar
///
/// Built only from raw user input through the validator; immutable once
/// constructed and consumed once by [`CalendarGenerator::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRequest {
    /// Sanitized client label, at most 50 characters
    pub client_name: String,
    /// Planning horizon, clamped into [1, 52]
    pub horizon_weeks: u32,
}

impl CalendarRequest {
    /// Build a request from the two raw prompt answers
    ///
    /// Never fails: both values degrade to safe defaults.
    #[must_use]
    pub fn from_raw(client_name: &str, horizon_weeks: &str) -> Self {
        Self {
            client_name: validate::client_name(client_name),
            horizon_weeks: validate::horizon_weeks(horizon_weeks),
        }
    }
}

/// Drives the fixed backend-call sequence for one calendar
pub struct CalendarGenerator {
    backend: Arc<dyn SheetsBackend>,
}

impl CalendarGenerator {
    #[must_use]
    pub fn new(backend: Arc<dyn SheetsBackend>) -> Self {
        Self { backend }
    }

    /// Create a calendar dated from today
    ///
    /// # Errors
    ///
    /// Returns the first non-cosmetic backend failure; see the module docs
    /// for which steps are cosmetic.
    pub async fn create(
        &self,
        request: &CalendarRequest,
    ) -> Result<SpreadsheetHandle, SheetsError> {
        self.create_with_start(request, chrono::Local::now().date_naive())
            .await
    }

    /// [`create`](Self::create) with an explicit start date for the sample
    /// and planning rows
    pub async fn create_with_start(
        &self,
        request: &CalendarRequest,
        start: NaiveDate,
    ) -> Result<SpreadsheetHandle, SheetsError> {
        let title = template::document_title(&request.client_name);
        info!(title = %title, weeks = request.horizon_weeks, "Creating content calendar");

        let handle = self.backend.create_spreadsheet(&title).await?;
        let id = &handle.spreadsheet_id;
        let sheet = handle.first_sheet_id;
        let columns = template::HEADERS.len() as u32;
        let last_col = column_letter(columns - 1);

        self.backend
            .update_values(id, &format!("A1:{last_col}1"), &template::header_rows())
            .await?;
        self.backend
            .format_range(
                id,
                &GridRange::row_span(sheet, 0, 0, columns),
                &template::header_format(),
            )
            .await?;

        // Cosmetic step: a failure here must not abort the run.
        if let Err(err) = self
            .backend
            .set_column_widths(id, sheet, &template::column_widths())
            .await
        {
            warn!(error = %err, "Could not set column widths");
        }

        let samples = template::sample_rows(start);
        self.backend
            .update_values(
                id,
                &format!("A2:{last_col}{}", 1 + samples.len()),
                &samples,
            )
            .await?;

        let planning = template::planning_rows(start, request.horizon_weeks);
        if !planning.is_empty() {
            let first_row = samples.len() + 2;
            let last_row = first_row + planning.len() - 1;
            self.backend
                .update_values(
                    id,
                    &format!("A{first_row}:{last_col}{last_row}"),
                    &planning,
                )
                .await?;
        }

        // Cosmetic step: each column's rule is attempted independently.
        for (column, rule) in template::validation_rules(sheet) {
            if let Err(err) = self.backend.set_validation(id, &rule).await {
                warn!(column, error = %err, "Could not attach dropdown validation");
            }
        }

        self.create_instructions_sheet(id).await?;

        info!(url = %handle.url, "Content calendar ready");
        Ok(handle)
    }

    async fn create_instructions_sheet(&self, spreadsheet_id: &str) -> Result<(), SheetsError> {
        let sheet_id = self
            .backend
            .add_sheet(
                spreadsheet_id,
                template::INSTRUCTIONS_SHEET_TITLE,
                template::INSTRUCTIONS_SHEET_ROWS,
                template::INSTRUCTIONS_SHEET_COLS,
            )
            .await?;

        let rows = template::instructions_rows();
        let last_col = column_letter(template::INSTRUCTIONS_SHEET_COLS - 1);
        self.backend
            .update_values(
                spreadsheet_id,
                &format!(
                    "{}!A1:{last_col}{}",
                    template::INSTRUCTIONS_SHEET_TITLE,
                    rows.len()
                ),
                &rows,
            )
            .await?;

        self.backend
            .format_range(
                spreadsheet_id,
                &GridRange::cell(sheet_id, 0, 0),
                &template::title_format(),
            )
            .await?;
        for row in template::INSTRUCTIONS_SECTION_ROWS {
            self.backend
                .format_range(
                    spreadsheet_id,
                    &GridRange::cell(sheet_id, row, 0),
                    &template::section_format(),
                )
                .await?;
        }

        Ok(())
    }
}
