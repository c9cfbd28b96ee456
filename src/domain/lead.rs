// src/domain/lead.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle position of a lead in the sales pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    New,
    Contacted,
    VisitScheduled,
    VisitDone,
    Negotiation,
    Booked,
    Cancelled,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::VisitScheduled,
        LeadStatus::VisitDone,
        LeadStatus::Negotiation,
        LeadStatus::Booked,
        LeadStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::VisitScheduled => "Visit Scheduled",
            LeadStatus::VisitDone => "Visit Done",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::Booked => "Booked",
            LeadStatus::Cancelled => "Cancelled",
        }
    }

    /// Stable token used in forms and query strings.
    pub fn key(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::VisitScheduled => "visit_scheduled",
            LeadStatus::VisitDone => "visit_done",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Booked => "booked",
            LeadStatus::Cancelled => "cancelled",
        }
    }

    /// Lenient parse accepting labels, keys and enum names in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "visitscheduled" => Some(LeadStatus::VisitScheduled),
            "visitdone" => Some(LeadStatus::VisitDone),
            "negotiation" => Some(LeadStatus::Negotiation),
            "booked" => Some(LeadStatus::Booked),
            "cancelled" | "canceled" => Some(LeadStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses that mean a scheduled visit actually took place.
    pub fn completes_visit(self) -> bool {
        matches!(self, LeadStatus::VisitDone | LeadStatus::Booked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

impl Temperature {
    pub const ALL: [Temperature; 3] = [Temperature::Hot, Temperature::Warm, Temperature::Cold];

    pub fn label(self) -> &'static str {
        match self {
            Temperature::Hot => "Hot",
            Temperature::Warm => "Warm",
            Temperature::Cold => "Cold",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hot" => Some(Temperature::Hot),
            "warm" => Some(Temperature::Warm),
            "cold" => Some(Temperature::Cold),
            _ => None,
        }
    }
}

/// A prospective buyer tracked through the sales pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,

    // === Contact ===
    pub customer_name: String,
    pub mobile: String,
    pub email: Option<String>,

    // === Enquiry ===
    pub source: String,
    pub project: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,

    // === Lifecycle ===
    pub status: LeadStatus,
    pub assigned_salesperson_id: String,
    pub temperature: Option<Temperature>,
    pub lead_date: NaiveDateTime,
    /// Reporting bucket such as "October 2026".
    pub month: String,
    pub next_follow_up_date: Option<NaiveDateTime>,
    pub visit_date: Option<NaiveDateTime>,
    pub missed_visits_count: u32,

    // === Engagement ===
    pub is_read: bool,
    pub last_remark: Option<String>,
    pub last_activity_date: Option<NaiveDateTime>,
}

impl Lead {
    /// The date the lead's visit is booked for. Older records only carry the
    /// follow-up date, so that stands in when no visit date was recorded.
    pub fn scheduled_visit_date(&self) -> Option<NaiveDateTime> {
        self.visit_date.or(self.next_follow_up_date)
    }

    /// True when the lead is waiting on a visit whose date is already behind us.
    pub fn visit_overdue(&self, now: NaiveDateTime) -> bool {
        self.status == LeadStatus::VisitScheduled
            && self.scheduled_visit_date().is_some_and(|d| d < now)
    }

    pub fn follow_up_due_on(&self, day: chrono::NaiveDate) -> bool {
        self.next_follow_up_date.is_some_and(|d| d.date() == day)
    }

    /// Follow-up date in the past on a lead that is still open.
    pub fn follow_up_overdue(&self, now: NaiveDateTime) -> bool {
        self.is_open()
            && self
                .next_follow_up_date
                .is_some_and(|d| d.date() < now.date())
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.status, LeadStatus::Booked | LeadStatus::Cancelled)
    }
}

/// Month bucket string stamped on every new lead.
pub fn month_bucket(at: NaiveDateTime) -> String {
    at.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn status_parse_accepts_labels_and_keys() {
        assert_eq!(LeadStatus::parse("Visit Scheduled"), Some(LeadStatus::VisitScheduled));
        assert_eq!(LeadStatus::parse("visit_done"), Some(LeadStatus::VisitDone));
        assert_eq!(LeadStatus::parse("CANCELED"), Some(LeadStatus::Cancelled));
        assert_eq!(LeadStatus::parse("Booked"), Some(LeadStatus::Booked));
        assert_eq!(LeadStatus::parse("lost"), None);

        for status in LeadStatus::ALL {
            assert_eq!(LeadStatus::parse(status.label()), Some(status));
            assert_eq!(LeadStatus::parse(status.key()), Some(status));
        }
    }

    #[test]
    fn temperature_parse_is_case_insensitive() {
        assert_eq!(Temperature::parse(" HOT "), Some(Temperature::Hot));
        assert_eq!(Temperature::parse("warm"), Some(Temperature::Warm));
        assert_eq!(Temperature::parse("lukewarm"), None);
    }

    #[test]
    fn month_bucket_uses_full_month_name() {
        assert_eq!(month_bucket(at(2026, 10, 16)), "October 2026");
    }

    #[test]
    fn scheduled_visit_falls_back_to_follow_up() {
        let mut lead = crate::domain::fixtures::lead("L-1", "U-2");
        lead.status = LeadStatus::VisitScheduled;
        lead.next_follow_up_date = Some(at(2026, 10, 1));
        assert_eq!(lead.scheduled_visit_date(), Some(at(2026, 10, 1)));
        assert!(lead.visit_overdue(at(2026, 10, 2)));

        lead.visit_date = Some(at(2026, 10, 5));
        assert_eq!(lead.scheduled_visit_date(), Some(at(2026, 10, 5)));
        assert!(!lead.visit_overdue(at(2026, 10, 2)));
    }
}
