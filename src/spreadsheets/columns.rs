// src/spreadsheets/columns.rs

//! Column schemas and the date format shared by every tabular format.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Header row of the backing sheet. Rows are keyed by "Lead ID".
pub const SHEET_HEADERS: [&str; 19] = [
    "Lead ID",
    "Customer Name",
    "Mobile",
    "Email",
    "Status",
    "Sales Person",
    "Lead Date",
    "Source",
    "Project",
    "Budget",
    "Location",
    "Temperature",
    "Next Follow Up",
    "Visit Date",
    "Missed Visits",
    "Remarks",
    "Last Activity",
    "Month",
    "Read",
];

/// Columns understood by the CSV importer.
pub const IMPORT_HEADERS: [&str; 12] = [
    "Customer Name",
    "Mobile",
    "Email",
    "Status",
    "Sales Person",
    "Lead Date",
    "Source",
    "Project",
    "Budget",
    "Location",
    "Temperature",
    "Remarks",
];

/// Column order of CSV and XLSX exports: the import schema plus tracking columns.
pub const EXPORT_HEADERS: [&str; 16] = [
    "Customer Name",
    "Mobile",
    "Email",
    "Status",
    "Sales Person",
    "Lead Date",
    "Source",
    "Project",
    "Budget",
    "Location",
    "Temperature",
    "Remarks",
    "Next Follow Up",
    "Visit Date",
    "Missed Visits",
    "Last Activity",
];

pub const SHEET_DATE_FORMAT: &str = "%d/%m/%Y";
pub const SHEET_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Day-first date, with `HH:MM` appended unless the value sits at midnight.
pub fn format_sheet_date(at: NaiveDateTime) -> String {
    if at.num_seconds_from_midnight() == 0 {
        at.format(SHEET_DATE_FORMAT).to_string()
    } else {
        at.format(SHEET_DATETIME_FORMAT).to_string()
    }
}

pub fn format_opt_date(at: Option<NaiveDateTime>) -> String {
    at.map(format_sheet_date).unwrap_or_default()
}

/// Parse `DD/MM/YYYY` (the sheet format) or ISO dates, with or without a time.
/// Date-only values land at midnight.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const DATETIME_FORMATS: [&str; 5] = [
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Index of each wanted header within `header_row`, matched case-insensitively.
pub fn locate_columns<const N: usize>(header_row: &[String], wanted: &[&str; N]) -> [Option<usize>; N] {
    let mut out = [None; N];
    for (slot, name) in out.iter_mut().zip(wanted.iter()) {
        *slot = header_row
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name));
    }
    out
}
