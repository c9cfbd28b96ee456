// src/spreadsheets/export.rs

use crate::crm::lifecycle::display_name;
use crate::domain::{Lead, User};
use crate::errors::ServerError;
use crate::responses::{csv_response, xlsx_response, ResultResp};
use crate::spreadsheets::columns::{format_opt_date, format_sheet_date, EXPORT_HEADERS};
use crate::spreadsheets::csv::write_csv;
use rust_xlsxwriter::{Format, Workbook};

/// Cells of one lead in `EXPORT_HEADERS` order.
pub fn export_row(lead: &Lead, users: &[User]) -> Vec<String> {
    vec![
        lead.customer_name.clone(),
        lead.mobile.clone(),
        lead.email.clone().unwrap_or_default(),
        lead.status.label().to_string(),
        display_name(users, &lead.assigned_salesperson_id),
        format_sheet_date(lead.lead_date),
        lead.source.clone(),
        lead.project.clone().unwrap_or_default(),
        lead.budget.clone().unwrap_or_default(),
        lead.location.clone().unwrap_or_default(),
        lead.temperature.map(|t| t.label().to_string()).unwrap_or_default(),
        lead.last_remark.clone().unwrap_or_default(),
        format_opt_date(lead.next_follow_up_date),
        format_opt_date(lead.visit_date),
        lead.missed_visits_count.to_string(),
        format_opt_date(lead.last_activity_date),
    ]
}

pub fn leads_to_csv(leads: &[Lead], users: &[User]) -> String {
    let rows: Vec<Vec<String>> = leads.iter().map(|l| export_row(l, users)).collect();
    write_csv(&EXPORT_HEADERS, &rows)
}

pub fn export_leads_csv(leads: &[Lead], users: &[User], stamp: &str) -> ResultResp {
    csv_response(leads_to_csv(leads, users), &format!("leads_{stamp}.csv"))
}

pub fn export_leads_xlsx(leads: &[Lead], users: &[User], stamp: &str) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    // Headers
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows. Missed Visits is written as a number.
    let missed_col = EXPORT_HEADERS.iter().position(|h| *h == "Missed Visits");

    for (i, lead) in leads.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in export_row(lead, users).iter().enumerate() {
            if Some(col) == missed_col {
                worksheet
                    .write_number(r, col as u16, lead.missed_visits_count as f64)
                    .map_err(|e| ServerError::XlsxError(format!("Failed to write missed visits: {}", e)))?;
                continue;
            }
            worksheet
                .write_string(r, col as u16, value)
                .map_err(|e| {
                    ServerError::XlsxError(format!(
                        "Failed to write '{}' for {}: {}",
                        EXPORT_HEADERS[col], lead.id, e
                    ))
                })?;
        }
    }

    worksheet.autofit();

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, &format!("leads_{stamp}.xlsx"))
}
