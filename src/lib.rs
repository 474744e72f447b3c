//! sheetcal - Content calendar generator for Google Sheets
//!
//! sheetcal creates a ready-to-use content-planning spreadsheet for a client:
//! a formatted header row, a few sample entries, pre-dated planning rows,
//! dropdown validation for the Platform / Content Type / Status columns, and
//! a populated Instructions sheet.
//!
//! sheetcal can be used in two ways:
//! - **CLI**: Install via `cargo install sheetcal` and run from command line
//! - **Library**: Add as a dependency and drive [`CalendarGenerator`] with
//!   your own [`SheetsBackend`] implementation
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Interactive: prompts for the client name and planning horizon
//! sheetcal
//!
//! # Non-interactive
//! sheetcal --client "Acme, Inc!" --weeks 8
//! ```
//!
//! The tool expects a Google API credentials descriptor (`credentials.json`)
//! and an authorized-user token artifact (`token.json`) in the working
//! directory; see the `auth` module for the exact shapes. On success the
//! sharable spreadsheet URL is printed to stdout.
//!
//! # Architecture
//!
//! - [`validate`] sanitizes the two free-text inputs into a [`CalendarRequest`]
//! - [`sheets`] defines the [`SheetsBackend`] trait, the REST implementation,
//!   and the retrying gateway every outbound call is routed through
//! - [`template`] holds the static calendar content
//! - [`generator`] sequences the backend calls in a fixed order
//!
//! All backend calls are classified on failure as retryable or fatal;
//! retryable calls are reattempted up to 3 times with exponential backoff.

pub mod auth;
pub mod cli;
pub mod config;
pub mod generator;
pub mod logging;
pub mod sheets;
pub mod template;
pub mod validate;

pub use config::{Config, ConfigBuilder};
pub use generator::{CalendarGenerator, CalendarRequest};
pub use sheets::{
    RestBackend, RetryingBackend, SheetsBackend, SheetsError, SpreadsheetHandle,
};
