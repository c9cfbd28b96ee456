// src/intake/normalizer.rs

use crate::domain::lead::month_bucket;
use crate::domain::user::{find_user, intake_owner, User};
use crate::domain::{Lead, LeadStatus, Temperature};
use crate::errors::ServerError;
use crate::intake::mapping::{CanonicalField, InboundSource, SourceMapping};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const MIN_MOBILE_DIGITS: usize = 10;

/// Flat view of an inbound payload: key to trimmed, non-empty text.
#[derive(Debug, Default)]
pub struct FlatPayload {
    values: HashMap<String, String>,
}

impl FlatPayload {
    /// Flatten a JSON object. Lead-ad `field_data` arrays of
    /// `{name, values: [..]}` become ordinary keys; nested objects are
    /// ignored, scalars are stringified.
    pub fn from_json(payload: &Value) -> Result<Self, ServerError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| ServerError::Validation("payload must be a JSON object".into()))?;

        let mut flat = FlatPayload::default();
        flat.absorb(obj);
        if let Some(Value::Array(items)) = obj.get("field_data") {
            for item in items {
                let Some(name) = item.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let joined = match item.get("values") {
                    Some(Value::Array(vals)) => vals
                        .iter()
                        .filter_map(scalar_text)
                        .collect::<Vec<_>>()
                        .join(", "),
                    Some(other) => scalar_text(other).unwrap_or_default(),
                    None => String::new(),
                };
                flat.insert(name, joined);
            }
        }
        Ok(flat)
    }

    fn absorb(&mut self, obj: &Map<String, Value>) {
        for (k, v) in obj {
            if let Some(text) = scalar_text(v) {
                self.insert(k, text);
            }
        }
    }

    fn insert(&mut self, key: &str, value: String) {
        let value = value.trim();
        if !value.is_empty() {
            self.values.insert(key.to_string(), value.to_string());
        }
    }

    /// First populated key in priority order.
    pub fn first(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|k| self.values.get(*k))
            .map(String::as_str)
    }

    pub fn field(&self, mapping: &SourceMapping, field: CanonicalField) -> Option<&str> {
        self.first(mapping.keys_for(field))
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Digits of a phone number, keeping a leading `+` when present.
pub fn normalize_mobile(raw: &str) -> String {
    let raw = raw.trim();
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if raw.starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    }
}

pub fn mobile_digit_count(raw: &str) -> usize {
    raw.chars().filter(char::is_ascii_digit).count()
}

/// Map an inbound payload from `source` onto a new canonical lead.
///
/// Fails with `Validation` when the customer name is missing or the mobile
/// number has fewer than ten digits; nothing is stored in that case.
pub fn normalize(
    source: InboundSource,
    payload: &Value,
    users: &[User],
    id: String,
    now: NaiveDateTime,
) -> Result<Lead, ServerError> {
    let mapping = source.mapping();
    let flat = FlatPayload::from_json(payload)?;

    let customer_name = flat
        .field(mapping, CanonicalField::CustomerName)
        .ok_or_else(|| ServerError::Validation("customer name is required".into()))?
        .to_string();

    let mobile = flat
        .field(mapping, CanonicalField::Mobile)
        .filter(|m| mobile_digit_count(m) >= MIN_MOBILE_DIGITS)
        .map(normalize_mobile)
        .ok_or_else(|| {
            ServerError::Validation(format!(
                "a mobile number with at least {MIN_MOBILE_DIGITS} digits is required"
            ))
        })?;

    let owner = flat
        .field(mapping, CanonicalField::Assignee)
        .and_then(|a| find_user(users, a))
        .or_else(|| intake_owner(users))
        .ok_or_else(|| ServerError::Validation("no user available to own the lead".into()))?;

    let text = |field| flat.field(mapping, field).map(str::to_string);

    Ok(Lead {
        id,
        customer_name,
        mobile,
        email: text(CanonicalField::Email),
        source: text(CanonicalField::SourceLabel).unwrap_or_else(|| source.label().to_string()),
        project: text(CanonicalField::Project),
        budget: text(CanonicalField::Budget),
        location: text(CanonicalField::Location),
        status: LeadStatus::New,
        assigned_salesperson_id: owner.id.clone(),
        temperature: flat
            .field(mapping, CanonicalField::Temperature)
            .and_then(Temperature::parse),
        lead_date: now,
        month: month_bucket(now),
        next_follow_up_date: None,
        visit_date: None,
        missed_visits_count: 0,
        is_read: false,
        last_remark: compose_remark(source, mapping, &flat),
        last_activity_date: None,
    })
}

/// Context fields first, then the free-text message, joined with `" | "`.
fn compose_remark(source: InboundSource, mapping: &SourceMapping, flat: &FlatPayload) -> Option<String> {
    let mut parts: Vec<String> = mapping
        .remark_context
        .iter()
        .filter_map(|(label, keys)| flat.first(keys).map(|v| format!("{label}: {v}")))
        .collect();

    if let Some(message) = flat.field(mapping, CanonicalField::Message) {
        parts.push(message.to_string());
    }

    if parts.is_empty() {
        return None;
    }
    Some(format!("{} lead | {}", source.label(), parts.join(" | ")))
}
