//! Input sanitization for the two user-supplied values
//!
//! Both validators are total functions: malformed input degrades to a safe
//! default instead of failing, so the CLI never rejects what the user typed.

/// Fallback label used when a client name sanitizes down to nothing
pub const FALLBACK_CLIENT_NAME: &str = "Sample Client";

/// Default planning horizon in weeks
pub const DEFAULT_HORIZON_WEEKS: u32 = 4;

/// Minimum and maximum accepted planning horizon
pub const HORIZON_RANGE: std::ops::RangeInclusive<u32> = 1..=52;

/// Maximum length of a sanitized client name, in characters
pub const MAX_CLIENT_NAME_CHARS: usize = 50;

/// Characters stripped from client names
///
/// The sanitized name ends up in the document title, and titles routinely get
/// reused as file names when a spreadsheet is exported. None of these
/// characters are valid in a Windows path component.
const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitize a raw client name
///
/// Strips the forbidden character set anywhere in the string, trims leading
/// and trailing whitespace, and truncates to 50 characters. An input that
/// sanitizes down to the empty string (empty, whitespace-only, or composed
/// entirely of forbidden characters) yields the fixed fallback label.
///
/// # Examples
///
/// ```
/// use sheetcal::validate::client_name;
///
/// assert_eq!(client_name("Acme, Inc!"), "Acme, Inc!");
/// assert_eq!(client_name("  <Acme>  "), "Acme");
/// assert_eq!(client_name("///"), "Sample Client");
/// ```
pub fn client_name(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect();

    let sanitized: String = stripped.trim().chars().take(MAX_CLIENT_NAME_CHARS).collect();

    if sanitized.is_empty() {
        FALLBACK_CLIENT_NAME.to_string()
    } else {
        sanitized
    }
}

/// Parse and clamp a raw planning-horizon input
///
/// An empty or unparsable input yields the default of 4 weeks; anything that
/// parses as an integer is clamped into [1, 52] rather than rejected.
///
/// # Examples
///
/// ```
/// use sheetcal::validate::horizon_weeks;
///
/// assert_eq!(horizon_weeks("8"), 8);
/// assert_eq!(horizon_weeks("0"), 1);
/// assert_eq!(horizon_weeks("next month"), 4);
/// ```
pub fn horizon_weeks(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_HORIZON_WEEKS;
    }

    match trimmed.parse::<i64>() {
        Ok(weeks) => weeks.clamp(*HORIZON_RANGE.start() as i64, *HORIZON_RANGE.end() as i64) as u32,
        Err(_) => DEFAULT_HORIZON_WEEKS,
    }
}
