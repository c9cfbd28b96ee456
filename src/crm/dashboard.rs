// src/crm/dashboard.rs

use crate::domain::{Lead, LeadStatus, SalesTarget, Task, Temperature};
use chrono::NaiveDateTime;

/// Figures shown on the dashboard for the leads a user can see.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: Vec<(LeadStatus, usize)>,
    pub hot: usize,
    pub unread: usize,
    pub due_today: usize,
    pub overdue: usize,
    pub missed_visits: u32,
    /// Booked leads as a whole percentage of all leads.
    pub conversion_percent: u32,
    pub open_tasks: usize,
    pub overdue_tasks: usize,
    pub targets: Vec<SalesTarget>,
}

pub fn compute_stats(
    leads: &[Lead],
    tasks: &[Task],
    targets: Vec<SalesTarget>,
    now: NaiveDateTime,
) -> DashboardStats {
    let count = |status: LeadStatus| leads.iter().filter(|l| l.status == status).count();
    let booked = count(LeadStatus::Booked);

    DashboardStats {
        total: leads.len(),
        by_status: LeadStatus::ALL.into_iter().map(|s| (s, count(s))).collect(),
        hot: leads
            .iter()
            .filter(|l| l.temperature == Some(Temperature::Hot))
            .count(),
        unread: leads.iter().filter(|l| !l.is_read).count(),
        due_today: leads
            .iter()
            .filter(|l| l.is_open() && l.follow_up_due_on(now.date()))
            .count(),
        overdue: leads.iter().filter(|l| l.follow_up_overdue(now)).count(),
        missed_visits: leads.iter().map(|l| l.missed_visits_count).sum(),
        conversion_percent: if leads.is_empty() {
            0
        } else {
            ((booked * 100) / leads.len()) as u32
        },
        open_tasks: tasks.iter().filter(|t| !t.completed).count(),
        overdue_tasks: tasks.iter().filter(|t| t.is_overdue(now.date())).count(),
        targets,
    }
}
