// src/spreadsheets/import.rs

use crate::domain::lead::month_bucket;
use crate::domain::user::{find_user, User};
use crate::domain::{Lead, LeadStatus, Temperature};
use crate::errors::ServerError;
use crate::spreadsheets::columns::{locate_columns, parse_sheet_date, IMPORT_HEADERS};
use crate::spreadsheets::csv::parse_csv;
use chrono::NaiveDateTime;

pub const DEFAULT_IMPORT_SOURCE: &str = "CSV Import";

#[derive(Debug)]
pub struct ImportOutcome {
    pub leads: Vec<Lead>,
    /// Data rows dropped for lacking a name or mobile.
    pub skipped: usize,
}

/// Parse an uploaded CSV into new leads.
///
/// Unknown salespeople fall back to `current_user_id`; unparseable lead
/// dates fall back to `now`.
pub fn import_csv(
    text: &str,
    users: &[User],
    current_user_id: &str,
    mut next_id: impl FnMut() -> String,
    now: NaiveDateTime,
) -> Result<ImportOutcome, ServerError> {
    let mut records = parse_csv(text).into_iter();
    let header = records
        .next()
        .ok_or_else(|| ServerError::Validation("the file is empty".into()))?;

    let [name_col, mobile_col, email_col, status_col, person_col, date_col, source_col, project_col, budget_col, location_col, temp_col, remarks_col] =
        locate_columns(&header, &IMPORT_HEADERS);

    if name_col.is_none() || mobile_col.is_none() {
        return Err(ServerError::Validation(
            "the header must include Customer Name and Mobile".into(),
        ));
    }

    let cell = |record: &[String], col: Option<usize>| -> Option<String> {
        col.and_then(|i| record.get(i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut leads = Vec::new();
    let mut skipped = 0;

    for record in records {
        let (Some(customer_name), Some(mobile)) = (cell(&record, name_col), cell(&record, mobile_col)) else {
            skipped += 1;
            continue;
        };

        let lead_date = cell(&record, date_col)
            .and_then(|d| parse_sheet_date(&d))
            .unwrap_or(now);
        let owner = cell(&record, person_col)
            .and_then(|name| find_user(users, &name).map(|u| u.id.clone()))
            .unwrap_or_else(|| current_user_id.to_string());

        leads.push(Lead {
            id: next_id(),
            customer_name,
            mobile,
            email: cell(&record, email_col),
            source: cell(&record, source_col).unwrap_or_else(|| DEFAULT_IMPORT_SOURCE.to_string()),
            project: cell(&record, project_col),
            budget: cell(&record, budget_col),
            location: cell(&record, location_col),
            status: cell(&record, status_col)
                .and_then(|s| LeadStatus::parse(&s))
                .unwrap_or(LeadStatus::New),
            assigned_salesperson_id: owner,
            temperature: cell(&record, temp_col).and_then(|t| Temperature::parse(&t)),
            lead_date,
            month: month_bucket(lead_date),
            next_follow_up_date: None,
            visit_date: None,
            missed_visits_count: 0,
            is_read: false,
            last_remark: cell(&record, remarks_col),
            last_activity_date: None,
        });
    }

    Ok(ImportOutcome { leads, skipped })
}
