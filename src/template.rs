//! Static calendar content
//!
//! Everything on a generated calendar that is data rather than logic lives
//! here: the header row, the dropdown lists, column widths, formats, the
//! sample and planning rows, and the instructions sheet.

use chrono::NaiveDate;

use crate::sheets::{CellFormat, Color, ColumnWidth, GridRange, HorizontalAlignment, ValidationRule};

/// Header row of the calendar sheet, columns A through G
pub const HEADERS: [&str; 7] = [
    "Date",
    "Time",
    "Platform",
    "Content Type",
    "Post Content",
    "Status",
    "Notes",
];

/// Dropdown options for the Platform column
pub const PLATFORMS: [&str; 8] = [
    "LinkedIn",
    "Facebook",
    "Instagram",
    "Twitter",
    "TikTok",
    "YouTube",
    "Blog",
    "Email",
];

/// Dropdown options for the Content Type column
pub const CONTENT_TYPES: [&str; 8] = [
    "Image Post",
    "Video",
    "Carousel",
    "Story",
    "Text Post",
    "Reel",
    "Live Stream",
    "Poll",
];

/// Dropdown options for the Status column
pub const STATUSES: [&str; 7] = [
    "Planned",
    "Draft",
    "In Review",
    "Approved",
    "Scheduled",
    "Published",
    "Cancelled",
];

/// Pixel widths for columns A through G
pub const COLUMN_WIDTH_PIXELS: [u32; 7] = [100, 80, 100, 120, 400, 100, 200];

/// Dropdown validation covers rows 2 through this row
pub const VALIDATION_LAST_ROW: u32 = 1000;

/// Title of the instructions sheet
pub const INSTRUCTIONS_SHEET_TITLE: &str = "Instructions";

/// Requested capacity of the instructions sheet
pub const INSTRUCTIONS_SHEET_ROWS: u32 = 50;
pub const INSTRUCTIONS_SHEET_COLS: u32 = 10;

/// 0-based rows of the instructions sheet that get the section format
/// ("How to Use", "Tips for Success", "Content Guidelines")
pub const INSTRUCTIONS_SECTION_ROWS: [u32; 3] = [2, 11, 19];

/// Date format used in the Date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accent color shared by the header row and the instructions title
pub const ACCENT_BLUE: Color = Color {
    red: 0.2,
    green: 0.6,
    blue: 0.9,
};

pub const WHITE: Color = Color {
    red: 1.0,
    green: 1.0,
    blue: 1.0,
};

/// Document title for a client's calendar
#[must_use]
pub fn document_title(client_name: &str) -> String {
    format!("{client_name} - Content Calendar")
}

/// Header row as a one-row value block
#[must_use]
pub fn header_rows() -> Vec<Vec<String>> {
    vec![HEADERS.iter().map(|h| h.to_string()).collect()]
}

/// Format for the header row: accent background, bold white text, centered
#[must_use]
pub fn header_format() -> CellFormat {
    CellFormat::default()
        .background(ACCENT_BLUE)
        .bold(true)
        .foreground(WHITE)
        .horizontal_alignment(HorizontalAlignment::Center)
}

/// Format for the instructions title cell
#[must_use]
pub fn title_format() -> CellFormat {
    CellFormat::default()
        .background(ACCENT_BLUE)
        .bold(true)
        .foreground(WHITE)
        .font_size(14)
}

/// Format for instructions section headers
#[must_use]
pub fn section_format() -> CellFormat {
    CellFormat::default().bold(true).font_size(12)
}

/// Column widths for the calendar sheet
#[must_use]
pub fn column_widths() -> Vec<ColumnWidth> {
    COLUMN_WIDTH_PIXELS
        .iter()
        .enumerate()
        .map(|(column, &pixels)| ColumnWidth {
            column: column as u32,
            pixels,
        })
        .collect()
}

/// Three filled-in example entries, dated from `start`
#[must_use]
pub fn sample_rows(start: NaiveDate) -> Vec<Vec<String>> {
    let date = |offset: u64| {
        (start + chrono::Days::new(offset))
            .format(DATE_FORMAT)
            .to_string()
    };

    vec![
        row([
            &date(0),
            "09:00",
            "LinkedIn",
            "Image Post",
            "Share industry insights about digital marketing trends...",
            "Draft",
            "Need to add company logo",
        ]),
        row([
            &date(1),
            "14:30",
            "Instagram",
            "Story",
            "Behind-the-scenes content from team meeting",
            "Planned",
            "Coordinate with design team",
        ]),
        row([
            &date(2),
            "10:15",
            "Facebook",
            "Video",
            "Client testimonial video - case study feature",
            "In Review",
            "Waiting for client approval",
        ]),
    ]
}

/// Empty planning rows with pre-filled dates, one per day
///
/// Picks up where the sample entries leave off (day offset 3) and runs to
/// the end of the planning horizon.
#[must_use]
pub fn planning_rows(start: NaiveDate, horizon_weeks: u32) -> Vec<Vec<String>> {
    (3..u64::from(horizon_weeks) * 7)
        .map(|offset| {
            let date = (start + chrono::Days::new(offset))
                .format(DATE_FORMAT)
                .to_string();
            row([&date, "", "", "", "", "Planned", ""])
        })
        .collect()
}

/// The three dropdown rules, labeled with their column header
///
/// Covers rows 2 through [`VALIDATION_LAST_ROW`] so future entries inherit
/// the dropdowns.
#[must_use]
pub fn validation_rules(sheet_id: i64) -> Vec<(&'static str, ValidationRule)> {
    let rule = |column: u32, values: &[&str]| ValidationRule {
        range: GridRange::column_span(sheet_id, column, 1, VALIDATION_LAST_ROW),
        allowed_values: values.iter().map(|v| v.to_string()).collect(),
        strict: true,
    };

    vec![
        ("Platform", rule(2, &PLATFORMS)),
        ("Content Type", rule(3, &CONTENT_TYPES)),
        ("Status", rule(5, &STATUSES)),
    ]
}

/// Content of the instructions sheet, padded to its full column count
#[must_use]
pub fn instructions_rows() -> Vec<Vec<String>> {
    let lines: [(&str, &str); 26] = [
        ("Content Calendar Instructions", ""),
        ("", ""),
        ("How to Use This Calendar:", ""),
        ("", ""),
        ("1. Date & Time", "Enter the scheduled publication date and time"),
        (
            "2. Platform",
            "Select from the dropdown: LinkedIn, Facebook, Instagram, etc.",
        ),
        (
            "3. Content Type",
            "Choose the format: Image Post, Video, Carousel, Story, etc.",
        ),
        (
            "4. Post Content",
            "Write your post text, including hashtags and mentions",
        ),
        (
            "5. Status",
            "Track progress: Planned → Draft → In Review → Approved → Scheduled → Published",
        ),
        (
            "6. Notes",
            "Add any special instructions, asset needs, or reminders",
        ),
        ("", ""),
        ("Tips for Success:", ""),
        ("", ""),
        ("• Plan content 1-2 weeks in advance", ""),
        ("• Keep post content concise but engaging", ""),
        ("• Use the Notes column for asset requirements", ""),
        ("• Update Status as content moves through workflow", ""),
        ("• Coordinate with your Cadent Creative team for approvals", ""),
        ("", ""),
        ("Content Guidelines:", ""),
        ("", ""),
        ("• Each platform has different optimal posting times", ""),
        ("• Keep Instagram captions under 2,200 characters", ""),
        ("• LinkedIn posts perform well with 150-300 words", ""),
        ("• Include relevant hashtags for discoverability", ""),
        ("• Always include a call-to-action when appropriate", ""),
    ];

    lines
        .iter()
        .map(|(first, second)| {
            let mut cells = vec![first.to_string(), second.to_string()];
            cells.resize(INSTRUCTIONS_SHEET_COLS as usize, String::new());
            cells
        })
        .collect()
}

fn row(cells: [&str; 7]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
    }

    #[test]
    fn headers_cover_seven_columns() {
        assert_eq!(HEADERS.len(), 7);
        assert_eq!(COLUMN_WIDTH_PIXELS.len(), HEADERS.len());
        assert_eq!(header_rows(), vec![HEADERS.map(String::from).to_vec()]);
    }

    #[test]
    fn column_widths_are_indexed_in_order() {
        let widths = column_widths();
        assert_eq!(widths.len(), 7);
        assert_eq!(widths[0], ColumnWidth { column: 0, pixels: 100 });
        assert_eq!(widths[4], ColumnWidth { column: 4, pixels: 400 });
        assert_eq!(widths[6], ColumnWidth { column: 6, pixels: 200 });
    }

    #[test]
    fn sample_rows_are_dated_consecutively() {
        let rows = sample_rows(start());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 7));
        assert_eq!(rows[0][0], "2026-08-03");
        assert_eq!(rows[1][0], "2026-08-04");
        assert_eq!(rows[2][0], "2026-08-05");
        // Sample cells only use values the dropdowns allow.
        for row in &rows {
            assert!(PLATFORMS.contains(&row[2].as_str()));
            assert!(CONTENT_TYPES.contains(&row[3].as_str()));
            assert!(STATUSES.contains(&row[5].as_str()));
        }
    }

    #[test]
    fn planning_rows_fill_the_horizon() {
        let rows = planning_rows(start(), 1);
        assert_eq!(rows.len(), 4); // day offsets 3, 4, 5, 6
        assert_eq!(rows[0][0], "2026-08-06");
        assert_eq!(rows[0][5], "Planned");
        assert!(rows[0][1].is_empty());

        assert_eq!(planning_rows(start(), 8).len(), 53);
        assert_eq!(planning_rows(start(), 52).len(), 52 * 7 - 3);
    }

    #[test]
    fn validation_rules_target_platform_type_and_status() {
        let rules = validation_rules(42);
        assert_eq!(rules.len(), 3);

        let (label, platform) = &rules[0];
        assert_eq!(*label, "Platform");
        assert_eq!(platform.range.sheet_id, 42);
        assert_eq!(platform.range.start_col, 2);
        assert_eq!(platform.range.start_row, 1);
        assert_eq!(platform.range.end_row, VALIDATION_LAST_ROW);
        assert_eq!(platform.allowed_values, PLATFORMS.map(String::from).to_vec());
        assert!(platform.strict);

        assert_eq!(rules[1].1.range.start_col, 3);
        assert_eq!(rules[2].1.range.start_col, 5);
        assert_eq!(rules[2].1.allowed_values.len(), STATUSES.len());
    }

    #[test]
    fn instructions_rows_are_rectangular() {
        let rows = instructions_rows();
        assert_eq!(rows.len(), 26);
        assert!(rows.iter().all(|r| r.len() == INSTRUCTIONS_SHEET_COLS as usize));
        assert_eq!(rows[0][0], "Content Calendar Instructions");
    }

    #[test]
    fn section_rows_line_up_with_the_content() {
        let rows = instructions_rows();
        assert_eq!(rows[INSTRUCTIONS_SECTION_ROWS[0] as usize][0], "How to Use This Calendar:");
        assert_eq!(rows[INSTRUCTIONS_SECTION_ROWS[1] as usize][0], "Tips for Success:");
        assert_eq!(rows[INSTRUCTIONS_SECTION_ROWS[2] as usize][0], "Content Guidelines:");
    }

    #[test]
    fn document_title_embeds_the_client_name() {
        assert_eq!(document_title("Acme, Inc!"), "Acme, Inc! - Content Calendar");
    }

    #[test]
    fn formats_match_the_house_style() {
        let header = header_format();
        assert_eq!(header.background, Some(ACCENT_BLUE));
        assert_eq!(header.bold, Some(true));
        assert_eq!(header.horizontal_alignment, Some(HorizontalAlignment::Center));
        assert_eq!(header.font_size, None);

        assert_eq!(title_format().font_size, Some(14));
        let section = section_format();
        assert_eq!(section.font_size, Some(12));
        assert_eq!(section.background, None);
    }
}
