use crate::domain::{LeadStatus, Temperature, User};
use chrono::NaiveDateTime;
use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn notice(message: Option<&str>) -> Markup {
    html! {
        @if let Some(msg) = message {
            p class="notice" { (msg) }
        }
    }
}

pub fn status_badge(status: LeadStatus) -> Markup {
    html! { span class="badge" { (status.label()) } }
}

pub fn temperature_badge(temperature: Option<Temperature>) -> Markup {
    html! {
        @match temperature {
            Some(Temperature::Hot) => span class="badge hot" { "Hot" },
            Some(Temperature::Warm) => span class="badge warm" { "Warm" },
            Some(Temperature::Cold) => span class="badge cold" { "Cold" },
            None => span { "" },
        }
    }
}

pub fn short_date(at: Option<NaiveDateTime>) -> String {
    at.map(|d| d.format("%d %b %Y").to_string()).unwrap_or_default()
}

/// Value for `<input type="datetime-local">`.
pub fn input_datetime(at: Option<NaiveDateTime>) -> String {
    at.map(|d| d.format("%Y-%m-%dT%H:%M").to_string()).unwrap_or_default()
}

pub fn status_select(name: &str, selected: Option<LeadStatus>, blank: Option<&str>) -> Markup {
    html! {
        select name=(name) {
            @if let Some(label) = blank {
                option value="" selected[selected.is_none()] { (label) }
            }
            @for s in LeadStatus::ALL {
                option value=(s.key()) selected[selected == Some(s)] { (s.label()) }
            }
        }
    }
}

pub fn temperature_select(name: &str, selected: Option<Temperature>, blank: &str) -> Markup {
    html! {
        select name=(name) {
            option value="" selected[selected.is_none()] { (blank) }
            @for t in Temperature::ALL {
                option value=(t.label()) selected[selected == Some(t)] { (t.label()) }
            }
        }
    }
}

pub fn user_select(name: &str, users: &[User], selected: Option<&str>, blank: Option<&str>) -> Markup {
    html! {
        select name=(name) {
            @if let Some(label) = blank {
                option value="" selected[selected.is_none()] { (label) }
            }
            @for u in users {
                option value=(u.id) selected[selected == Some(u.id.as_str())] {
                    (u.name) " (" (u.role.label()) ")"
                }
            }
        }
    }
}
