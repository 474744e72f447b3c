//! Spreadsheet backend abstraction
//!
//! The [`SheetsBackend`] trait is the capability surface the generator
//! consumes: create a document, write a rectangular block of values, apply
//! formatting, perform a batched structural update, attach a dropdown
//! validation rule, and add a named sheet.
//!
//! [`RestBackend`] implements the trait against the Sheets v4 REST API.
//! [`RetryingBackend`] decorates any backend so that every call goes through
//! the retry gateway, which is the single chokepoint for backend-call error
//! handling.

mod range;
mod rest;
mod retry;
mod types;

pub use range::{GridRange, column_letter};
pub use rest::RestBackend;
pub use retry::{RetryingBackend, call_with_retry, is_retryable_error};
pub use types::{
    CellFormat, Color, ColumnWidth, HorizontalAlignment, SheetsBackend, SheetsError,
    SpreadsheetHandle, ValidationRule,
};
