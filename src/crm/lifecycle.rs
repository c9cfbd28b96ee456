// src/crm/lifecycle.rs

//! Status transition rules for a single lead.
//!
//! These functions are pure: they take the stored lead plus the proposed
//! state and return the lead to store together with at most one activity to
//! append. The store applies the result under its write lock.

use crate::domain::user::{default_owner, User};
use crate::domain::{ActivityDraft, Lead, LeadStatus};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct LeadUpdate {
    pub lead: Lead,
    pub activity: Option<ActivityDraft>,
}

/// A visit counts as missed when the lead was waiting on it, its date has
/// passed, and the lead is now leaving `VisitScheduled` for a status that
/// does not record the visit as done.
pub fn visit_missed_on_transition(previous: &Lead, next_status: LeadStatus, now: NaiveDateTime) -> bool {
    previous.visit_overdue(now) && next_status != previous.status && !next_status.completes_visit()
}

/// Apply an edit to `existing`, deriving the side effects of the transition.
///
/// The identity and the missed-visit counter always come from `existing`;
/// whatever the caller put in those fields is ignored.
pub fn apply_lead_update(
    existing: &Lead,
    proposed: Lead,
    users: &[User],
    actor_id: &str,
    now: NaiveDateTime,
) -> LeadUpdate {
    let mut lead = proposed;
    lead.id = existing.id.clone();
    lead.missed_visits_count = existing.missed_visits_count;

    if visit_missed_on_transition(existing, lead.status, now) {
        lead.missed_visits_count += 1;
    }

    let mut activity = None;
    if lead.status == LeadStatus::Cancelled {
        if let Some(admin) = default_owner(users) {
            if lead.assigned_salesperson_id != admin.id {
                let previous_owner = display_name(users, &lead.assigned_salesperson_id);
                lead.assigned_salesperson_id = admin.id.clone();
                activity = Some(ActivityDraft::note(
                    &lead.id,
                    actor_id,
                    format!(
                        "Lead cancelled. Automatically reassigned from {previous_owner} to {}.",
                        admin.name
                    ),
                ));
            }
        }
    }

    lead.last_activity_date = Some(now);
    lead.is_read = true;

    LeadUpdate { lead, activity }
}

/// Move a lead's visit to `new_date`.
///
/// If the visit being replaced was already overdue it was missed, and the
/// counter moves by one, the same as leaving `VisitScheduled` late.
pub fn reschedule_visit(
    existing: &Lead,
    new_date: NaiveDateTime,
    actor_id: &str,
    now: NaiveDateTime,
) -> LeadUpdate {
    let missed = existing.visit_overdue(now);

    let mut lead = existing.clone();
    if missed {
        lead.missed_visits_count += 1;
    }
    lead.status = LeadStatus::VisitScheduled;
    lead.visit_date = Some(new_date);
    lead.last_activity_date = Some(now);
    lead.is_read = true;

    let mut remarks = format!("Visit rescheduled to {}.", new_date.format("%d/%m/%Y %H:%M"));
    if missed {
        remarks.push_str(" Previous visit was missed.");
    }

    LeadUpdate {
        activity: Some(ActivityDraft::note(&lead.id, actor_id, remarks)),
        lead,
    }
}

pub(crate) fn display_name(users: &[User], id: &str) -> String {
    users
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{day, lead, team};
    use crate::domain::ActivityType;

    fn scheduled(visit: NaiveDateTime) -> Lead {
        let mut l = lead("L-1", "U-2");
        l.status = LeadStatus::VisitScheduled;
        l.next_follow_up_date = Some(visit);
        l
    }

    #[test]
    fn leaving_overdue_visit_increments_missed_count() {
        let now = day(2026, 10, 16);
        let existing = scheduled(day(2026, 10, 15));
        let mut proposed = existing.clone();
        proposed.status = LeadStatus::Contacted;

        let out = apply_lead_update(&existing, proposed, &team(), "U-2", now);
        assert_eq!(out.lead.missed_visits_count, 1);
        assert!(out.activity.is_none());
        assert!(out.lead.is_read);
        assert_eq!(out.lead.last_activity_date, Some(now));
    }

    #[test]
    fn completing_the_visit_does_not_count_as_missed() {
        let now = day(2026, 10, 16);
        let existing = scheduled(day(2026, 10, 15));
        for status in [LeadStatus::VisitDone, LeadStatus::Booked] {
            let mut proposed = existing.clone();
            proposed.status = status;
            let out = apply_lead_update(&existing, proposed, &team(), "U-2", now);
            assert_eq!(out.lead.missed_visits_count, 0, "{status:?}");
        }
    }

    #[test]
    fn unchanged_status_or_future_visit_is_not_missed() {
        let now = day(2026, 10, 16);

        let overdue = scheduled(day(2026, 10, 15));
        let same = apply_lead_update(&overdue, overdue.clone(), &team(), "U-2", now);
        assert_eq!(same.lead.missed_visits_count, 0);

        let upcoming = scheduled(day(2026, 10, 20));
        let mut proposed = upcoming.clone();
        proposed.status = LeadStatus::Negotiation;
        let out = apply_lead_update(&upcoming, proposed, &team(), "U-2", now);
        assert_eq!(out.lead.missed_visits_count, 0);
    }

    #[test]
    fn caller_cannot_rewrite_the_counter() {
        let now = day(2026, 10, 16);
        let mut existing = lead("L-1", "U-2");
        existing.missed_visits_count = 2;
        let mut proposed = existing.clone();
        proposed.missed_visits_count = 0;
        proposed.id = "L-other".to_string();

        let out = apply_lead_update(&existing, proposed, &team(), "U-2", now);
        assert_eq!(out.lead.missed_visits_count, 2);
        assert_eq!(out.lead.id, "L-1");
    }

    #[test]
    fn cancelling_reassigns_to_admin_with_one_note() {
        let now = day(2026, 10, 16);
        let existing = lead("L-1", "U-2");
        let mut proposed = existing.clone();
        proposed.status = LeadStatus::Cancelled;

        let out = apply_lead_update(&existing, proposed, &team(), "U-2", now);
        assert_eq!(out.lead.assigned_salesperson_id, "U-1");
        let note = out.activity.expect("reassignment note");
        assert_eq!(note.activity_type, ActivityType::Note);
        assert_eq!(note.lead_id, "L-1");
        assert!(note.remarks.contains("Priya Shah"));
        assert!(note.remarks.contains("Admin"));
    }

    #[test]
    fn cancelling_an_admin_lead_adds_no_note() {
        let now = day(2026, 10, 16);
        let existing = lead("L-1", "U-1");
        let mut proposed = existing.clone();
        proposed.status = LeadStatus::Cancelled;

        let out = apply_lead_update(&existing, proposed, &team(), "U-1", now);
        assert_eq!(out.lead.assigned_salesperson_id, "U-1");
        assert!(out.activity.is_none());
    }

    #[test]
    fn overdue_cancel_counts_missed_and_reassigns() {
        let now = day(2026, 10, 16);
        let existing = scheduled(day(2026, 10, 10));
        let mut proposed = existing.clone();
        proposed.status = LeadStatus::Cancelled;

        let out = apply_lead_update(&existing, proposed, &team(), "U-2", now);
        assert_eq!(out.lead.missed_visits_count, 1);
        assert_eq!(out.lead.assigned_salesperson_id, "U-1");
        assert!(out.activity.is_some());
    }

    #[test]
    fn rescheduling_an_overdue_visit_counts_it_once() {
        let now = day(2026, 10, 16);
        let existing = scheduled(day(2026, 10, 14));

        let out = reschedule_visit(&existing, day(2026, 10, 18), "U-2", now);
        assert_eq!(out.lead.missed_visits_count, 1);
        assert_eq!(out.lead.status, LeadStatus::VisitScheduled);
        assert_eq!(out.lead.visit_date, Some(day(2026, 10, 18)));
        assert!(out.activity.unwrap().remarks.contains("missed"));

        // The new visit is in the future, so rescheduling again is free.
        let again = reschedule_visit(&out.lead, day(2026, 10, 19), "U-2", now);
        assert_eq!(again.lead.missed_visits_count, 1);
    }

    #[test]
    fn scheduling_a_first_visit_is_not_missed() {
        let now = day(2026, 10, 16);
        let existing = lead("L-1", "U-2");
        let out = reschedule_visit(&existing, day(2026, 10, 18), "U-2", now);
        assert_eq!(out.lead.missed_visits_count, 0);
        assert_eq!(out.lead.status, LeadStatus::VisitScheduled);
    }
}
