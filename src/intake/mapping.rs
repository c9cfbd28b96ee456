// src/intake/mapping.rs

//! Declarative field tables for each inbound channel.
//!
//! Each canonical attribute lists the payload keys that may carry it, in
//! priority order. Adding a channel means adding a table, not code.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundSource {
    Website,
    Facebook,
    Instagram,
    Ivr,
}

impl InboundSource {
    pub const ALL: [InboundSource; 4] = [
        InboundSource::Website,
        InboundSource::Facebook,
        InboundSource::Instagram,
        InboundSource::Ivr,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            InboundSource::Website => "website",
            InboundSource::Facebook => "facebook",
            InboundSource::Instagram => "instagram",
            InboundSource::Ivr => "ivr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InboundSource::Website => "Website",
            InboundSource::Facebook => "Facebook",
            InboundSource::Instagram => "Instagram",
            InboundSource::Ivr => "IVR",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        InboundSource::ALL
            .into_iter()
            .find(|s| s.slug().eq_ignore_ascii_case(slug))
    }

    pub fn mapping(self) -> &'static SourceMapping {
        match self {
            InboundSource::Website => &WEBSITE,
            InboundSource::Facebook => &FACEBOOK,
            InboundSource::Instagram => &INSTAGRAM,
            InboundSource::Ivr => &IVR,
        }
    }
}

impl fmt::Display for InboundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lead attributes a payload can fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    CustomerName,
    Mobile,
    Email,
    Project,
    Budget,
    Location,
    Temperature,
    Assignee,
    /// Overrides the channel label, e.g. "Google Ads" from a website form.
    SourceLabel,
    Message,
}

pub struct SourceMapping {
    pub fields: &'static [(CanonicalField, &'static [&'static str])],
    /// Context folded into the remark as `Label: value`, in order.
    pub remark_context: &'static [(&'static str, &'static [&'static str])],
}

impl SourceMapping {
    pub fn keys_for(&self, field: CanonicalField) -> &'static [&'static str] {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }
}

static WEBSITE: SourceMapping = SourceMapping {
    fields: &[
        (
            CanonicalField::CustomerName,
            &["customerName", "customer_name", "name", "full_name", "fullName"],
        ),
        (
            CanonicalField::Mobile,
            &["mobile", "phone", "phone_number", "phoneNumber", "contact"],
        ),
        (CanonicalField::Email, &["email", "email_address", "emailAddress"]),
        (CanonicalField::Project, &["project", "property", "projectName", "interested_in"]),
        (CanonicalField::Budget, &["budget", "budget_range"]),
        (CanonicalField::Location, &["location", "city", "preferred_location"]),
        (CanonicalField::Temperature, &["temperature", "priority"]),
        (
            CanonicalField::Assignee,
            &["assignedSalespersonId", "assignedTo", "assigned_to", "salesperson"],
        ),
        (CanonicalField::SourceLabel, &["source", "utm_source", "leadSource"]),
        (CanonicalField::Message, &["remarks", "message", "comments", "notes"]),
    ],
    remark_context: &[
        ("Page", &["page_url", "pageUrl", "landing_page"]),
        ("Campaign", &["utm_campaign", "campaign"]),
    ],
};

const LEAD_AD_FIELDS: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::CustomerName, &["full_name", "name", "first_name"]),
    (CanonicalField::Mobile, &["phone_number", "phone", "mobile"]),
    (CanonicalField::Email, &["email", "work_email"]),
    (CanonicalField::Project, &["project", "property", "interested_project"]),
    (CanonicalField::Budget, &["budget", "what_is_your_budget"]),
    (CanonicalField::Location, &["city", "location", "preferred_location"]),
    (CanonicalField::Message, &["message", "comments", "remarks"]),
];

const LEAD_AD_CONTEXT: &[(&str, &[&str])] = &[
    ("Form", &["form_name", "form_id"]),
    ("Campaign", &["campaign_name", "campaign_id"]),
    ("Ad", &["ad_name", "ad_id"]),
];

static FACEBOOK: SourceMapping = SourceMapping {
    fields: LEAD_AD_FIELDS,
    remark_context: LEAD_AD_CONTEXT,
};

static INSTAGRAM: SourceMapping = SourceMapping {
    fields: LEAD_AD_FIELDS,
    remark_context: LEAD_AD_CONTEXT,
};

static IVR: SourceMapping = SourceMapping {
    fields: &[
        (CanonicalField::CustomerName, &["caller_name", "callerName", "name"]),
        (
            CanonicalField::Mobile,
            &["caller_number", "callerNumber", "caller_id", "from", "mobile"],
        ),
        (CanonicalField::Project, &["project", "ivr_name"]),
        (CanonicalField::Location, &["caller_circle", "circle", "city"]),
        (CanonicalField::Assignee, &["agent_name", "agent"]),
        (CanonicalField::Message, &["remarks", "notes"]),
    ],
    remark_context: &[
        ("Called", &["called_number", "did", "to"]),
        ("Call time", &["call_time", "start_time"]),
        ("Duration", &["duration", "call_duration"]),
        ("Call status", &["call_status", "status"]),
        ("Recording", &["recording_url", "recording"]),
    ],
};
