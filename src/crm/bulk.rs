// src/crm/bulk.rs

use crate::crm::lifecycle::{display_name, visit_missed_on_transition};
use crate::domain::user::{default_owner, find_user, User};
use crate::domain::{ActivityDraft, Lead, LeadStatus};
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// One bulk edit request from the lead list.
#[derive(Debug, Clone, Default)]
pub struct BulkChange {
    pub lead_ids: Vec<String>,
    pub status: Option<LeadStatus>,
    pub assignee_id: Option<String>,
}

/// Result of planning a bulk edit against the current leads.
#[derive(Debug, Default)]
pub struct BulkPlan {
    /// Leads that changed, in request order, ready to replace the stored ones.
    pub updated: Vec<Lead>,
    /// One note per updated lead, same order as `updated`.
    pub activities: Vec<ActivityDraft>,
    pub unchanged: usize,
    pub unknown_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub changed: usize,
    pub unchanged: usize,
    pub unknown_ids: Vec<String>,
}

impl From<&BulkPlan> for BulkReport {
    fn from(plan: &BulkPlan) -> Self {
        Self {
            changed: plan.updated.len(),
            unchanged: plan.unchanged,
            unknown_ids: plan.unknown_ids.clone(),
        }
    }
}

/// Work out what a bulk edit does to each lead without touching the store.
///
/// Cancelled leads, whether cancelled now or already, stay with the default
/// owner whatever assignee was supplied. Leads that end up identical produce
/// no activity.
pub fn plan_bulk_update(
    leads: &[Lead],
    users: &[User],
    change: &BulkChange,
    actor_id: &str,
    now: NaiveDateTime,
) -> Result<BulkPlan, ServerError> {
    let requested_owner = match change.assignee_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Some(
            find_user(users, id)
                .ok_or_else(|| ServerError::Validation(format!("unknown assignee '{id}'")))?
                .id
                .clone(),
        ),
        _ => None,
    };

    let cancel_owner = default_owner(users).map(|u| u.id.clone());

    let mut plan = BulkPlan::default();
    let mut seen = HashSet::new();

    for id in &change.lead_ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        let Some(existing) = leads.iter().find(|l| &l.id == id) else {
            plan.unknown_ids.push(id.clone());
            continue;
        };

        let status = change.status.unwrap_or(existing.status);
        let forced_owner = if status == LeadStatus::Cancelled {
            cancel_owner.clone()
        } else {
            None
        };
        let owner = forced_owner
            .or_else(|| requested_owner.clone())
            .unwrap_or_else(|| existing.assigned_salesperson_id.clone());

        let mut summary = Vec::new();
        if status != existing.status {
            summary.push(format!(
                "status changed from {} to {}",
                existing.status.label(),
                status.label()
            ));
        }
        if owner != existing.assigned_salesperson_id {
            summary.push(format!(
                "reassigned from {} to {}",
                display_name(users, &existing.assigned_salesperson_id),
                display_name(users, &owner)
            ));
        }

        if summary.is_empty() {
            plan.unchanged += 1;
            continue;
        }

        let mut lead = existing.clone();
        if visit_missed_on_transition(existing, status, now) {
            lead.missed_visits_count += 1;
        }
        lead.status = status;
        lead.assigned_salesperson_id = owner;
        lead.last_activity_date = Some(now);

        plan.activities.push(ActivityDraft::note(
            &lead.id,
            actor_id,
            format!("Bulk update: {}.", summary.join("; ")),
        ));
        plan.updated.push(lead);
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{day, lead, team};

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_note_per_changed_lead() {
        let mut leads = vec![lead("L-1", "U-2"), lead("L-2", "U-2"), lead("L-3", "U-3")];
        leads[1].status = LeadStatus::Contacted;

        let change = BulkChange {
            lead_ids: ids(&["L-1", "L-2", "L-3"]),
            status: Some(LeadStatus::Contacted),
            assignee_id: None,
        };
        let plan = plan_bulk_update(&leads, &team(), &change, "U-1", day(2026, 10, 16)).unwrap();

        assert_eq!(plan.updated.len(), 2);
        assert_eq!(plan.activities.len(), 2);
        assert_eq!(plan.unchanged, 1);
        assert!(plan.activities[0].remarks.contains("from New to Contacted"));
    }

    #[test]
    fn bulk_cancel_overrides_explicit_assignee() {
        let leads = vec![lead("L-1", "U-2"), lead("L-2", "U-3")];
        let change = BulkChange {
            lead_ids: ids(&["L-1", "L-2"]),
            status: Some(LeadStatus::Cancelled),
            assignee_id: Some("U-3".to_string()),
        };
        let plan = plan_bulk_update(&leads, &team(), &change, "U-1", day(2026, 10, 16)).unwrap();

        assert!(plan.updated.iter().all(|l| l.assigned_salesperson_id == "U-1"));
        assert!(plan.updated.iter().all(|l| l.status == LeadStatus::Cancelled));
        assert_eq!(plan.activities.len(), 2);
        assert!(plan.activities[1].remarks.contains("reassigned from Rahul Verma to Admin"));
    }

    #[test]
    fn reassign_only_skips_leads_already_owned() {
        let leads = vec![lead("L-1", "U-2"), lead("L-2", "U-3")];
        let change = BulkChange {
            lead_ids: ids(&["L-1", "L-2", "L-404", "L-1"]),
            status: None,
            assignee_id: Some("rahul verma".to_string()),
        };
        let plan = plan_bulk_update(&leads, &team(), &change, "U-1", day(2026, 10, 16)).unwrap();

        assert_eq!(plan.updated.len(), 1);
        assert_eq!(plan.updated[0].id, "L-1");
        assert_eq!(plan.updated[0].assigned_salesperson_id, "U-3");
        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.unknown_ids, vec!["L-404".to_string()]);
    }

    #[test]
    fn reassigning_cancelled_leads_keeps_them_with_admin() {
        let mut cancelled = lead("L-1", "U-1");
        cancelled.status = LeadStatus::Cancelled;
        let leads = vec![cancelled, lead("L-2", "U-2")];
        let change = BulkChange {
            lead_ids: ids(&["L-1", "L-2"]),
            status: None,
            assignee_id: Some("U-3".to_string()),
        };
        let plan = plan_bulk_update(&leads, &team(), &change, "U-1", day(2026, 10, 16)).unwrap();

        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.updated.len(), 1);
        assert_eq!(plan.updated[0].id, "L-2");
        assert_eq!(plan.updated[0].assigned_salesperson_id, "U-3");
    }

    #[test]
    fn unknown_assignee_is_rejected() {
        let leads = vec![lead("L-1", "U-2")];
        let change = BulkChange {
            lead_ids: ids(&["L-1"]),
            status: None,
            assignee_id: Some("U-99".to_string()),
        };
        let err = plan_bulk_update(&leads, &team(), &change, "U-1", day(2026, 10, 16)).unwrap_err();
        assert!(matches!(err, ServerError::Validation(_)));
    }

    #[test]
    fn bulk_status_change_counts_overdue_visits() {
        let mut overdue = lead("L-1", "U-2");
        overdue.status = LeadStatus::VisitScheduled;
        overdue.visit_date = Some(day(2026, 10, 1));

        let change = BulkChange {
            lead_ids: ids(&["L-1"]),
            status: Some(LeadStatus::Negotiation),
            assignee_id: None,
        };
        let plan =
            plan_bulk_update(&[overdue], &team(), &change, "U-1", day(2026, 10, 16)).unwrap();
        assert_eq!(plan.updated[0].missed_visits_count, 1);
    }
}
