// src/domain/activity.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Call,
    WhatsApp,
    Email,
    Meeting,
    SiteVisit,
    Note,
}

impl ActivityType {
    pub const ALL: [ActivityType; 6] = [
        ActivityType::Call,
        ActivityType::WhatsApp,
        ActivityType::Email,
        ActivityType::Meeting,
        ActivityType::SiteVisit,
        ActivityType::Note,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActivityType::Call => "Call",
            ActivityType::WhatsApp => "WhatsApp",
            ActivityType::Email => "Email",
            ActivityType::Meeting => "Meeting",
            ActivityType::SiteVisit => "Site Visit",
            ActivityType::Note => "Note",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "call" => Some(ActivityType::Call),
            "whatsapp" => Some(ActivityType::WhatsApp),
            "email" => Some(ActivityType::Email),
            "meeting" => Some(ActivityType::Meeting),
            "sitevisit" | "visit" => Some(ActivityType::SiteVisit),
            "note" => Some(ActivityType::Note),
            _ => None,
        }
    }
}

/// Append-only log entry. Once stored an activity is never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub lead_id: String,
    pub salesperson_id: String,
    pub activity_type: ActivityType,
    pub timestamp: NaiveDateTime,
    pub remarks: String,
}

/// An activity computed by the lifecycle rules but not yet stored.
/// The store assigns the id and timestamp when it appends it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub lead_id: String,
    pub salesperson_id: String,
    pub activity_type: ActivityType,
    pub remarks: String,
}

impl ActivityDraft {
    pub fn note(lead_id: &str, salesperson_id: &str, remarks: impl Into<String>) -> Self {
        Self {
            lead_id: lead_id.to_string(),
            salesperson_id: salesperson_id.to_string(),
            activity_type: ActivityType::Note,
            remarks: remarks.into(),
        }
    }
}

/// Newest first. Ties keep the later-appended entry on top.
pub fn newest_first(activities: &[Activity]) -> Vec<Activity> {
    let mut out: Vec<Activity> = activities.iter().rev().cloned().collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}
