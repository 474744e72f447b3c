//! Core types for the spreadsheet backend abstraction

use async_trait::async_trait;
use thiserror::Error;

use crate::sheets::range::GridRange;

/// Errors from the spreadsheet backend
///
/// The retry gateway classifies these by their rendered message, so each
/// variant's wording is part of the retry contract: quota/outage/transport
/// messages carry the substrings the classifier looks for, auth and API
/// rejections do not.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// A request could not be delivered or the response could not be read
    #[error("{operation} failed: {message}")]
    Transport { operation: String, message: String },

    /// The backend rejected our credentials (401/403)
    #[error("{operation} authentication rejected: {message}")]
    Auth { operation: String, message: String },

    /// The backend throttled us (429)
    #[error("{operation} rate limit exceeded: {message}")]
    Quota { operation: String, message: String },

    /// The backend reported a server-side failure (5xx)
    #[error("{operation} service unavailable: {message}")]
    Outage { operation: String, message: String },

    /// The backend rejected the request itself (other 4xx)
    #[error("{operation} rejected: {message}")]
    Api { operation: String, message: String },

    /// The response did not have the expected shape
    #[error("{operation} returned an unexpected response: {message}")]
    Decode { operation: String, message: String },
}

/// Handle to a created spreadsheet document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetHandle {
    /// Backend identifier of the document
    pub spreadsheet_id: String,
    /// Sharable URL
    pub url: String,
    /// Sheet id of the first (default) worksheet
    pub first_sheet_id: i64,
}

/// RGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Horizontal cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Center => "CENTER",
            Self::Right => "RIGHT",
        }
    }
}

/// Visual formatting applied to a cell range
///
/// Unset fields are left untouched on the target cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFormat {
    pub background: Option<Color>,
    pub bold: Option<bool>,
    pub foreground: Option<Color>,
    pub font_size: Option<u32>,
    pub horizontal_alignment: Option<HorizontalAlignment>,
}

impl CellFormat {
    #[must_use]
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    #[must_use]
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.horizontal_alignment = Some(alignment);
        self
    }
}

/// Pixel width for a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidth {
    /// 0-based column index
    pub column: u32,
    pub pixels: u32,
}

/// Declarative dropdown constraint for a column range
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    /// Cells the rule applies to
    pub range: GridRange,
    /// Ordered list of allowed values
    pub allowed_values: Vec<String>,
    /// Reject values outside the list (as opposed to warning)
    pub strict: bool,
}

/// Trait for spreadsheet backend implementations
///
/// The orchestration sequence works against this trait, so the REST
/// implementation, the retrying decorator, and test doubles are
/// interchangeable.
#[async_trait]
pub trait SheetsBackend: Send + Sync {
    /// Create a new document, returning its handle and sharable URL
    async fn create_spreadsheet(&self, title: &str) -> Result<SpreadsheetHandle, SheetsError>;

    /// Write a rectangular block of cell values at an A1 range reference
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError>;

    /// Apply visual formatting to a range
    async fn format_range(
        &self,
        spreadsheet_id: &str,
        range: &GridRange,
        format: &CellFormat,
    ) -> Result<(), SheetsError>;

    /// Set column pixel widths in a single batched structural update
    async fn set_column_widths(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
        widths: &[ColumnWidth],
    ) -> Result<(), SheetsError>;

    /// Attach a dropdown validation rule to a column range
    async fn set_validation(
        &self,
        spreadsheet_id: &str,
        rule: &ValidationRule,
    ) -> Result<(), SheetsError>;

    /// Create an additional named sheet, returning its sheet id
    async fn add_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<i64, SheetsError>;
}
