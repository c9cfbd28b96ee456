// src/seed.rs

//! Demo dataset used when no sheet rows exist. Dates are relative to `now`
//! so the dashboard always has something due, overdue and missed.

use crate::crm::CrmState;
use crate::domain::lead::month_bucket;
use crate::domain::{Activity, ActivityType, Lead, LeadStatus, Role, Task, Temperature, User};
use chrono::{Duration, NaiveDateTime};

fn user(id: &str, name: &str, role: Role, reports_to: Option<&str>) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        role,
        reports_to: reports_to.map(str::to_string),
    }
}

pub fn mock_users() -> Vec<User> {
    vec![
        user("U-1", "Admin", Role::Admin, None),
        user("U-2", "Meera Nair", Role::SalesManager, None),
        user("U-3", "Priya Shah", Role::Salesperson, Some("U-2")),
        user("U-4", "Rahul Verma", Role::Salesperson, Some("U-2")),
        user("U-5", "Arjun Das", Role::Salesperson, None),
    ]
}

struct MockLead {
    name: &'static str,
    mobile: &'static str,
    source: &'static str,
    project: &'static str,
    budget: &'static str,
    status: LeadStatus,
    owner: &'static str,
    temperature: Option<Temperature>,
    age_days: i64,
    follow_up_in_days: Option<i64>,
    visit_in_days: Option<i64>,
    missed: u32,
    read: bool,
    remark: Option<&'static str>,
}

const MOCK_LEADS: &[MockLead] = &[
    MockLead { name: "Anil Kapoor", mobile: "9811122233", source: "Website", project: "Palm Grove", budget: "80L-1Cr", status: LeadStatus::New, owner: "U-3", temperature: Some(Temperature::Hot), age_days: 0, follow_up_in_days: Some(0), visit_in_days: None, missed: 0, read: false, remark: Some("Website lead | Looking for 3BHK") },
    MockLead { name: "Sunita Rao", mobile: "9822233344", source: "Facebook", project: "Lake View", budget: "50-60L", status: LeadStatus::Contacted, owner: "U-3", temperature: Some(Temperature::Warm), age_days: 3, follow_up_in_days: Some(-1), visit_in_days: None, missed: 0, read: true, remark: Some("Asked for brochure") },
    MockLead { name: "Vikram Singh", mobile: "9833344455", source: "IVR", project: "Palm Grove", budget: "1-1.2Cr", status: LeadStatus::VisitScheduled, owner: "U-4", temperature: Some(Temperature::Hot), age_days: 6, follow_up_in_days: None, visit_in_days: Some(-2), missed: 0, read: true, remark: Some("Visit fixed for weekend") },
    MockLead { name: "Neha Gupta", mobile: "9844455566", source: "Instagram", project: "Skyline Towers", budget: "70L", status: LeadStatus::VisitScheduled, owner: "U-4", temperature: Some(Temperature::Warm), age_days: 4, follow_up_in_days: None, visit_in_days: Some(2), missed: 1, read: true, remark: Some("Rescheduled once") },
    MockLead { name: "Farhan Qureshi", mobile: "9855566677", source: "Website", project: "Lake View", budget: "45L", status: LeadStatus::VisitDone, owner: "U-5", temperature: Some(Temperature::Warm), age_days: 10, follow_up_in_days: Some(1), visit_in_days: None, missed: 0, read: true, remark: Some("Liked the clubhouse") },
    MockLead { name: "Lakshmi Menon", mobile: "9866677788", source: "Referral", project: "Skyline Towers", budget: "90L", status: LeadStatus::Negotiation, owner: "U-3", temperature: Some(Temperature::Hot), age_days: 15, follow_up_in_days: Some(0), visit_in_days: None, missed: 0, read: true, remark: Some("Negotiating on floor rise") },
    MockLead { name: "Deepak Joshi", mobile: "9877788899", source: "Facebook", project: "Palm Grove", budget: "1.1Cr", status: LeadStatus::Booked, owner: "U-4", temperature: Some(Temperature::Hot), age_days: 25, follow_up_in_days: None, visit_in_days: None, missed: 0, read: true, remark: Some("Token amount received") },
    MockLead { name: "Pooja Bhatt", mobile: "9888899900", source: "Website", project: "Lake View", budget: "40L", status: LeadStatus::Cancelled, owner: "U-1", temperature: Some(Temperature::Cold), age_days: 20, follow_up_in_days: None, visit_in_days: None, missed: 1, read: true, remark: Some("Bought elsewhere") },
    MockLead { name: "Rohan Mehta", mobile: "9899900011", source: "IVR", project: "Skyline Towers", budget: "65L", status: LeadStatus::New, owner: "U-5", temperature: None, age_days: 1, follow_up_in_days: None, visit_in_days: None, missed: 0, read: false, remark: Some("IVR lead | Call status: missed") },
    MockLead { name: "Kavya Iyer", mobile: "9810011122", source: "Instagram", project: "Palm Grove", budget: "85L", status: LeadStatus::Contacted, owner: "U-5", temperature: Some(Temperature::Cold), age_days: 8, follow_up_in_days: Some(-3), visit_in_days: None, missed: 0, read: true, remark: None },
    MockLead { name: "Sanjay Patil", mobile: "9820022233", source: "Walk-in", project: "Lake View", budget: "55L", status: LeadStatus::Booked, owner: "U-3", temperature: Some(Temperature::Hot), age_days: 30, follow_up_in_days: None, visit_in_days: None, missed: 0, read: true, remark: Some("Agreement signed") },
    MockLead { name: "Ritu Saxena", mobile: "9830033344", source: "Website", project: "Skyline Towers", budget: "75L", status: LeadStatus::VisitScheduled, owner: "U-3", temperature: Some(Temperature::Warm), age_days: 2, follow_up_in_days: None, visit_in_days: Some(0), missed: 0, read: false, remark: None },
];

pub fn mock_leads(now: NaiveDateTime) -> Vec<Lead> {
    MOCK_LEADS
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let lead_date = now - Duration::days(m.age_days);
            Lead {
                id: format!("L-{}", 1001 + i),
                customer_name: m.name.to_string(),
                mobile: m.mobile.to_string(),
                email: None,
                source: m.source.to_string(),
                project: Some(m.project.to_string()),
                budget: Some(m.budget.to_string()),
                location: None,
                status: m.status,
                assigned_salesperson_id: m.owner.to_string(),
                temperature: m.temperature,
                lead_date,
                month: month_bucket(lead_date),
                next_follow_up_date: m.follow_up_in_days.map(|d| now + Duration::days(d)),
                visit_date: m.visit_in_days.map(|d| now + Duration::days(d)),
                missed_visits_count: m.missed,
                is_read: m.read,
                last_remark: m.remark.map(str::to_string),
                last_activity_date: m.remark.map(|_| lead_date),
            }
        })
        .collect()
}

fn mock_activities(leads: &[Lead]) -> Vec<Activity> {
    leads
        .iter()
        .filter_map(|l| {
            let remarks = l.last_remark.clone()?;
            let activity_type = match l.status {
                LeadStatus::VisitDone | LeadStatus::Booked => ActivityType::SiteVisit,
                LeadStatus::Negotiation => ActivityType::Meeting,
                LeadStatus::Contacted => ActivityType::Call,
                _ => ActivityType::Note,
            };
            Some(Activity {
                id: format!("A-{}", &l.id[2..]),
                lead_id: l.id.clone(),
                salesperson_id: l.assigned_salesperson_id.clone(),
                activity_type,
                timestamp: l.last_activity_date.unwrap_or(l.lead_date),
                remarks,
            })
        })
        .collect()
}

fn mock_tasks(now: NaiveDateTime) -> Vec<Task> {
    let today = now.date();
    let task = |id: &str, title: &str, assignee: &str, due_in: i64, completed: bool| Task {
        id: id.to_string(),
        title: title.to_string(),
        assignee_id: assignee.to_string(),
        due_date: today + Duration::days(due_in),
        completed,
    };
    vec![
        task("T-1", "Send Palm Grove price sheet to walk-ins", "U-3", 0, false),
        task("T-2", "Confirm weekend site visits", "U-4", 1, false),
        task("T-3", "Update Lake View inventory", "U-2", -1, false),
        task("T-4", "Call back IVR missed calls", "U-5", 0, true),
    ]
}

/// The full demo state.
pub fn mock_state(now: NaiveDateTime, monthly_target: u32) -> CrmState {
    let leads = mock_leads(now);
    CrmState {
        users: mock_users(),
        activities: mock_activities(&leads),
        leads,
        tasks: mock_tasks(now),
        monthly_target,
    }
}
