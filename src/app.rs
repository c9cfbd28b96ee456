// src/app.rs

use crate::auth::SessionStore;
use crate::config::{ensure_parent_dir, Settings, SheetKind};
use crate::crm::{CrmState, CrmStore};
use crate::db::connection::Database;
use crate::domain::user::default_owner;
use crate::domain::Lead;
use crate::seed;
use crate::spreadsheets::backend::upsert_lead;
use crate::spreadsheets::{load_leads, upsert_leads, HttpSheet, SheetBackend, SqliteSheet};
use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

/// Everything a request handler needs.
pub struct AppContext {
    pub settings: Settings,
    pub store: CrmStore,
    pub sessions: SessionStore,
    pub sheet: Option<Box<dyn SheetBackend>>,
}

impl AppContext {
    pub fn new(settings: Settings, state: CrmState, sheet: Option<Box<dyn SheetBackend>>) -> Self {
        Self {
            settings,
            store: CrmStore::new(state),
            sessions: SessionStore::new(),
            sheet,
        }
    }

    /// Mirror a lead to the sheet. Failures are logged, never returned.
    pub fn sync_lead(&self, lead: &Lead) {
        let Some(sheet) = self.sheet.as_deref() else {
            return;
        };
        let users = match self.store.users() {
            Ok(users) => users,
            Err(e) => {
                warn!(lead_id = %lead.id, error = %e, "sheet sync skipped");
                return;
            }
        };
        if let Err(e) = upsert_lead(sheet, lead, &users) {
            warn!(lead_id = %lead.id, backend = sheet.name(), error = %e, "sheet sync failed");
        }
    }

    /// Mirror a batch of leads with one read of the sheet.
    pub fn sync_leads(&self, leads: &[Lead]) {
        let Some(sheet) = self.sheet.as_deref() else {
            return;
        };
        if leads.is_empty() {
            return;
        }
        let users = match self.store.users() {
            Ok(users) => users,
            Err(e) => {
                warn!(count = leads.len(), error = %e, "sheet sync skipped");
                return;
            }
        };
        if let Err(e) = upsert_leads(sheet, leads, &users) {
            warn!(count = leads.len(), backend = sheet.name(), error = %e, "sheet batch sync failed");
        }
    }
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn open_sheet(settings: &Settings) -> anyhow::Result<Option<Box<dyn SheetBackend>>> {
    match settings.sheet_backend {
        SheetKind::None => Ok(None),
        SheetKind::Sqlite => {
            ensure_parent_dir(&settings.sheet_db_path)?;
            let db = Database::new(settings.sheet_db_path.clone());
            let sheet = SqliteSheet::open(db, &settings.schema_path)
                .with_context(|| format!("failed to open sheet at '{}'", settings.sheet_db_path))?;
            Ok(Some(Box::new(sheet)))
        }
        SheetKind::Http => {
            let url = settings
                .sheet_url
                .clone()
                .context("sheet_url is required for the http backend")?;
            Ok(Some(Box::new(HttpSheet::new(url)?)))
        }
    }
}

/// Initial state: the sheet's leads when it has any, otherwise the demo set.
pub fn initial_state(
    settings: &Settings,
    sheet: Option<&dyn SheetBackend>,
    now: NaiveDateTime,
) -> CrmState {
    let mut state = if settings.seed_mock_data {
        seed::mock_state(now, settings.monthly_target)
    } else {
        CrmState {
            users: seed::mock_users(),
            monthly_target: settings.monthly_target,
            ..CrmState::default()
        }
    };

    let Some(sheet) = sheet else {
        return state;
    };

    let fallback = default_owner(&state.users).map(|u| u.id.clone()).unwrap_or_default();
    match load_leads(sheet, &state.users, &fallback, now) {
        Ok(leads) if !leads.is_empty() => {
            info!(count = leads.len(), backend = sheet.name(), "loaded leads from sheet");
            state.leads = leads;
            state.activities.clear();
        }
        Ok(_) => info!(backend = sheet.name(), "sheet is empty, using seed data"),
        Err(e) => warn!(backend = sheet.name(), error = %e, "could not read sheet, using seed data"),
    }
    state
}

pub fn build_context(settings: Settings) -> anyhow::Result<AppContext> {
    let sheet = open_sheet(&settings)?;
    let state = initial_state(&settings, sheet.as_deref(), now());
    info!(
        users = state.users.len(),
        leads = state.leads.len(),
        tasks = state.tasks.len(),
        "crm state ready"
    );
    Ok(AppContext::new(settings, state, sheet))
}
