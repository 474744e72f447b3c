//! End-to-end orchestration against a recording backend

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::{ADDED_SHEET_ID, BackendCall, RecordingBackend};
use sheetcal::{CalendarGenerator, CalendarRequest};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
}

fn update(range: &str, rows: usize, cols: usize) -> BackendCall {
    BackendCall::UpdateValues {
        range: range.to_string(),
        rows,
        cols,
    }
}

#[tokio::test]
async fn full_sequence_issues_the_expected_calls_in_order() {
    let backend = Arc::new(RecordingBackend::default());
    let generator = CalendarGenerator::new(backend.clone());

    let request = CalendarRequest::from_raw("Acme, Inc!", "8");
    assert_eq!(request.client_name, "Acme, Inc!");
    assert_eq!(request.horizon_weeks, 8);

    let handle = generator
        .create_with_start(&request, start())
        .await
        .unwrap();
    assert_eq!(handle.spreadsheet_id, "doc-1");
    assert_eq!(handle.url, "https://sheets.example.com/doc-1");

    // 8 weeks of planning rows: day offsets 3 through 55, i.e. 53 rows
    // occupying A5:G57.
    let expected = vec![
        BackendCall::CreateSpreadsheet {
            title: "Acme, Inc! - Content Calendar".to_string(),
        },
        update("A1:G1", 1, 7),
        BackendCall::FormatRange {
            sheet_id: 0,
            start_row: 0,
            start_col: 0,
        },
        BackendCall::SetColumnWidths {
            sheet_id: 0,
            columns: 7,
        },
        update("A2:G4", 3, 7),
        update("A5:G57", 53, 7),
        BackendCall::SetValidation { column: 2, options: 8 },
        BackendCall::SetValidation { column: 3, options: 8 },
        BackendCall::SetValidation { column: 5, options: 7 },
        BackendCall::AddSheet {
            title: "Instructions".to_string(),
            rows: 50,
            cols: 10,
        },
        update("Instructions!A1:J26", 26, 10),
        BackendCall::FormatRange {
            sheet_id: ADDED_SHEET_ID,
            start_row: 0,
            start_col: 0,
        },
        BackendCall::FormatRange {
            sheet_id: ADDED_SHEET_ID,
            start_row: 2,
            start_col: 0,
        },
        BackendCall::FormatRange {
            sheet_id: ADDED_SHEET_ID,
            start_row: 11,
            start_col: 0,
        },
        BackendCall::FormatRange {
            sheet_id: ADDED_SHEET_ID,
            start_row: 19,
            start_col: 0,
        },
    ];

    assert_eq!(backend.calls(), expected);
}

#[tokio::test]
async fn one_week_horizon_still_writes_planning_rows() {
    let backend = Arc::new(RecordingBackend::default());
    let generator = CalendarGenerator::new(backend.clone());

    generator
        .create_with_start(&CalendarRequest::from_raw("Acme", "1"), start())
        .await
        .unwrap();

    // Offsets 3 through 6: four rows below the samples.
    assert!(backend.calls().contains(&update("A5:G8", 4, 7)));
}

#[tokio::test]
async fn cosmetic_failures_do_not_abort_the_run() {
    let mut inner = RecordingBackend::default();
    inner.fail_column_widths = true;
    inner.fail_validations = true;
    let backend = Arc::new(inner);
    let generator = CalendarGenerator::new(backend.clone());

    let handle = generator
        .create_with_start(&CalendarRequest::from_raw("Acme", "4"), start())
        .await
        .unwrap();
    assert_eq!(handle.spreadsheet_id, "doc-1");

    // The failing steps were attempted once each and the sequence went on
    // to build the instructions sheet.
    assert_eq!(
        backend.count(|c| matches!(c, BackendCall::SetColumnWidths { .. })),
        1
    );
    assert_eq!(
        backend.count(|c| matches!(c, BackendCall::SetValidation { .. })),
        3
    );
    assert_eq!(
        backend.count(|c| matches!(c, BackendCall::AddSheet { .. })),
        1
    );
}

#[tokio::test]
async fn running_twice_creates_two_distinct_documents() {
    let backend = Arc::new(RecordingBackend::default());
    let generator = CalendarGenerator::new(backend.clone());
    let request = CalendarRequest::from_raw("Acme", "2");

    let first = generator.create_with_start(&request, start()).await.unwrap();
    let second = generator.create_with_start(&request, start()).await.unwrap();

    assert_ne!(first.spreadsheet_id, second.spreadsheet_id);
    assert_eq!(
        backend.count(|c| matches!(c, BackendCall::CreateSpreadsheet { .. })),
        2
    );
}
