// src/spreadsheets/backend.rs

use crate::crm::lifecycle::display_name;
use crate::domain::lead::month_bucket;
use crate::domain::user::{find_user, User};
use crate::domain::{Lead, LeadStatus, Temperature};
use crate::errors::ServerError;
use crate::spreadsheets::columns::{format_opt_date, format_sheet_date, parse_sheet_date, SHEET_HEADERS};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One data row of the sheet, cells aligned with `SHEET_HEADERS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetRow(Vec<String>);

impl SheetRow {
    /// Pads or truncates to the header width.
    pub fn from_cells(mut cells: Vec<String>) -> Self {
        cells.resize(SHEET_HEADERS.len(), String::new());
        SheetRow(cells)
    }

    pub fn get(&self, header: &str) -> &str {
        SHEET_HEADERS
            .iter()
            .position(|h| *h == header)
            .and_then(|i| self.0.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    fn opt(&self, header: &str) -> Option<String> {
        Some(self.get(header))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn lead_id(&self) -> &str {
        self.get("Lead ID")
    }

    pub fn from_lead(lead: &Lead, users: &[User]) -> Self {
        SheetRow::from_cells(vec![
            lead.id.clone(),
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
            format_opt_date(lead.next_follow_up_date),
            format_opt_date(lead.visit_date),
            lead.missed_visits_count.to_string(),
            lead.last_remark.clone().unwrap_or_default(),
            format_opt_date(lead.last_activity_date),
            lead.month.clone(),
            if lead.is_read { "Yes" } else { "No" }.to_string(),
        ])
    }

    /// Rebuild a lead from its row. Rows without id, name or mobile are
    /// unusable and yield `None`. Unknown salespeople go to `fallback_owner`.
    pub fn to_lead(&self, users: &[User], fallback_owner: &str, now: NaiveDateTime) -> Option<Lead> {
        let id = self.opt("Lead ID")?;
        let customer_name = self.opt("Customer Name")?;
        let mobile = self.opt("Mobile")?;

        let lead_date = parse_sheet_date(self.get("Lead Date")).unwrap_or(now);
        let owner = find_user(users, self.get("Sales Person"))
            .map(|u| u.id.clone())
            .unwrap_or_else(|| fallback_owner.to_string());

        Some(Lead {
            id,
            customer_name,
            mobile,
            email: self.opt("Email"),
            source: self.opt("Source").unwrap_or_else(|| "Sheet".to_string()),
            project: self.opt("Project"),
            budget: self.opt("Budget"),
            location: self.opt("Location"),
            status: LeadStatus::parse(self.get("Status")).unwrap_or(LeadStatus::New),
            assigned_salesperson_id: owner,
            temperature: Temperature::parse(self.get("Temperature")),
            lead_date,
            month: self.opt("Month").unwrap_or_else(|| month_bucket(lead_date)),
            next_follow_up_date: parse_sheet_date(self.get("Next Follow Up")),
            visit_date: parse_sheet_date(self.get("Visit Date")),
            missed_visits_count: self.get("Missed Visits").parse().unwrap_or(0),
            is_read: self.get("Read").eq_ignore_ascii_case("yes"),
            last_remark: self.opt("Remarks"),
            last_activity_date: parse_sheet_date(self.get("Last Activity")),
        })
    }
}

/// A tabular store addressed by data-row index (0 is the first row under
/// the header).
pub trait SheetBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn get_rows(&self) -> Result<Vec<SheetRow>, ServerError>;
    fn append_row(&self, row: &SheetRow) -> Result<(), ServerError>;
    fn update_row(&self, index: usize, row: &SheetRow) -> Result<(), ServerError>;
}

/// Write `lead` to the sheet, replacing its row when one exists.
pub fn upsert_lead(backend: &dyn SheetBackend, lead: &Lead, users: &[User]) -> Result<(), ServerError> {
    upsert_leads(backend, std::slice::from_ref(lead), users)
}

/// Write a batch of leads with a single read of the sheet.
pub fn upsert_leads(backend: &dyn SheetBackend, leads: &[Lead], users: &[User]) -> Result<(), ServerError> {
    let rows = backend.get_rows()?;
    let mut len = rows.len();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, r) in rows.iter().enumerate() {
        index.entry(r.lead_id().to_string()).or_insert(i);
    }

    for lead in leads {
        let row = SheetRow::from_lead(lead, users);
        match index.get(&lead.id) {
            Some(&i) => backend.update_row(i, &row)?,
            None => {
                backend.append_row(&row)?;
                index.insert(lead.id.clone(), len);
                len += 1;
            }
        }
    }
    Ok(())
}

/// Leads stored in the sheet, skipping unusable rows.
pub fn load_leads(
    backend: &dyn SheetBackend,
    users: &[User],
    fallback_owner: &str,
    now: NaiveDateTime,
) -> Result<Vec<Lead>, ServerError> {
    Ok(backend
        .get_rows()?
        .iter()
        .filter_map(|r| r.to_lead(users, fallback_owner, now))
        .collect())
}
