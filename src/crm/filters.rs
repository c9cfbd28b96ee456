// src/crm/filters.rs

use crate::domain::{Lead, LeadStatus, Temperature};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Quick views offered above the lead table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadView {
    #[default]
    All,
    Unread,
    DueToday,
    Overdue,
    MissedVisits,
}

impl LeadView {
    pub const ALL: [LeadView; 5] = [
        LeadView::All,
        LeadView::Unread,
        LeadView::DueToday,
        LeadView::Overdue,
        LeadView::MissedVisits,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LeadView::All => "all",
            LeadView::Unread => "unread",
            LeadView::DueToday => "today",
            LeadView::Overdue => "overdue",
            LeadView::MissedVisits => "missed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeadView::All => "All",
            LeadView::Unread => "Unread",
            LeadView::DueToday => "Due today",
            LeadView::Overdue => "Overdue",
            LeadView::MissedVisits => "Missed visits",
        }
    }

    pub fn parse(raw: &str) -> Self {
        LeadView::ALL
            .into_iter()
            .find(|v| v.key() == raw)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub salesperson_id: Option<String>,
    pub temperature: Option<Temperature>,
    pub source: Option<String>,
    pub search: Option<String>,
    pub view: LeadView,
}

impl LeadFilter {
    /// Build from decoded query-string pairs. Empty values mean "any".
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |k: &str| {
            params
                .get(k)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            status: get("status").and_then(|s| LeadStatus::parse(&s)),
            salesperson_id: get("salesperson"),
            temperature: get("temperature").and_then(|t| Temperature::parse(&t)),
            source: get("source"),
            search: get("q"),
            view: get("view").map(|v| LeadView::parse(&v)).unwrap_or_default(),
        }
    }

    pub fn matches(&self, lead: &Lead, now: NaiveDateTime) -> bool {
        if self.status.is_some_and(|s| s != lead.status) {
            return false;
        }
        if let Some(sp) = &self.salesperson_id {
            if &lead.assigned_salesperson_id != sp {
                return false;
            }
        }
        if self.temperature.is_some() && self.temperature != lead.temperature {
            return false;
        }
        if let Some(source) = &self.source {
            if !lead.source.eq_ignore_ascii_case(source) {
                return false;
            }
        }
        if let Some(q) = &self.search {
            if !matches_search(lead, q) {
                return false;
            }
        }

        match self.view {
            LeadView::All => true,
            LeadView::Unread => !lead.is_read,
            LeadView::DueToday => lead.follow_up_due_on(now.date()),
            LeadView::Overdue => lead.follow_up_overdue(now),
            LeadView::MissedVisits => lead.missed_visits_count > 0,
        }
    }
}

fn matches_search(lead: &Lead, query: &str) -> bool {
    let q = query.to_lowercase();
    let digits: String = q.chars().filter(char::is_ascii_digit).collect();

    lead.customer_name.to_lowercase().contains(&q)
        || lead
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&q))
        || (!digits.is_empty() && lead.mobile.contains(&digits))
}

/// Filter and order for display: newest lead first.
pub fn apply(leads: Vec<Lead>, filter: &LeadFilter, now: NaiveDateTime) -> Vec<Lead> {
    let mut out: Vec<Lead> = leads.into_iter().filter(|l| filter.matches(l, now)).collect();
    out.sort_by(|a, b| b.lead_date.cmp(&a.lead_date));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{day, lead};

    #[test]
    fn search_matches_name_email_and_mobile_digits() {
        let mut l = lead("L-1", "U-2");
        l.customer_name = "Anita Desai".to_string();
        l.email = Some("anita@example.com".to_string());
        l.mobile = "9812345678".to_string();
        let now = day(2026, 10, 16);

        for q in ["anita", "DESAI", "example.com", "98123", "98-123"] {
            let f = LeadFilter {
                search: Some(q.to_string()),
                ..Default::default()
            };
            assert!(f.matches(&l, now), "{q}");
        }
        let miss = LeadFilter {
            search: Some("rahul".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&l, now));
    }

    #[test]
    fn views_follow_dates() {
        let now = day(2026, 10, 16);
        let mut today = lead("L-1", "U-2");
        today.next_follow_up_date = Some(day(2026, 10, 16));
        let mut late = lead("L-2", "U-2");
        late.next_follow_up_date = Some(day(2026, 10, 12));
        let mut closed = late.clone();
        closed.id = "L-3".to_string();
        closed.status = LeadStatus::Booked;

        let leads = vec![today, late, closed];
        let due = LeadFilter {
            view: LeadView::DueToday,
            ..Default::default()
        };
        let overdue = LeadFilter {
            view: LeadView::Overdue,
            ..Default::default()
        };

        let due_ids: Vec<_> = apply(leads.clone(), &due, now).into_iter().map(|l| l.id).collect();
        assert_eq!(due_ids, vec!["L-1"]);
        let overdue_ids: Vec<_> = apply(leads, &overdue, now).into_iter().map(|l| l.id).collect();
        assert_eq!(overdue_ids, vec!["L-2"]);
    }

    #[test]
    fn from_params_ignores_blank_values() {
        let params: HashMap<String, String> = [
            ("status", "visit_scheduled"),
            ("salesperson", ""),
            ("temperature", "Hot"),
            ("view", "unread"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let f = LeadFilter::from_params(&params);
        assert_eq!(f.status, Some(LeadStatus::VisitScheduled));
        assert_eq!(f.salesperson_id, None);
        assert_eq!(f.temperature, Some(Temperature::Hot));
        assert_eq!(f.view, LeadView::Unread);
    }
}
