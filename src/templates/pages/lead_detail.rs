use crate::crm::lifecycle::display_name;
use crate::domain::{Activity, ActivityType, Lead, User};
use crate::templates::components::{
    card, input_datetime, notice, short_date, status_badge, status_select, temperature_badge,
    temperature_select, user_select,
};
use crate::templates::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};

pub struct LeadDetailVm<'a> {
    pub viewer: &'a User,
    pub users: &'a [User],
    pub lead: &'a Lead,
    pub activities: &'a [Activity],
    pub now: NaiveDateTime,
    pub notice: Option<String>,
    /// Who a cancelled lead is handed to.
    pub cancel_owner: String,
}

pub fn lead_detail_page(vm: &LeadDetailVm) -> Markup {
    let l = vm.lead;
    let action = |suffix: &str| format!("/leads/{}/{}", l.id, suffix);

    desktop_layout(
        &l.customer_name,
        Some(vm.viewer),
        html! {
            main class="container" {
                p { a href="/leads" { "← All leads" } }
                h1 { (l.customer_name) " " (status_badge(l.status)) " " (temperature_badge(l.temperature)) }
                (notice(vm.notice.as_deref()))
                @if l.visit_overdue(vm.now) {
                    p class="warning" { "The scheduled visit is overdue. Record the outcome or reschedule." }
                }

                (card("Details", html! {
                    table {
                        tbody {
                            tr { th { "Mobile" } td { (l.mobile) } }
                            tr { th { "Email" } td { (l.email.as_deref().unwrap_or("")) } }
                            tr { th { "Owner" } td { (display_name(vm.users, &l.assigned_salesperson_id)) } }
                            tr { th { "Source" } td { (l.source) } }
                            tr { th { "Project" } td { (l.project.as_deref().unwrap_or("")) } }
                            tr { th { "Budget" } td { (l.budget.as_deref().unwrap_or("")) } }
                            tr { th { "Location" } td { (l.location.as_deref().unwrap_or("")) } }
                            tr { th { "Lead date" } td { (short_date(Some(l.lead_date))) " (" (l.month) ")" } }
                            tr { th { "Next follow up" } td { (short_date(l.next_follow_up_date)) } }
                            tr { th { "Visit" } td { (short_date(l.visit_date)) } }
                            tr { th { "Missed visits" } td { (l.missed_visits_count) } }
                            tr { th { "Last remark" } td { (l.last_remark.as_deref().unwrap_or("")) } }
                        }
                    }
                }))

                (card("Update", html! {
                    form method="post" action=(action("update")) class="inline" {
                        div { label { "Status" } (status_select("status", Some(l.status), None)) }
                        div { label { "Temperature" } (temperature_select("temperature", l.temperature, "None")) }
                        div { label { "Owner" } (user_select("assignee", vm.users, Some(&l.assigned_salesperson_id), None)) }
                        div { label { "Next follow up" } input type="datetime-local" name="next_follow_up_date" value=(input_datetime(l.next_follow_up_date)); }
                        div { label { "Visit date" } input type="datetime-local" name="visit_date" value=(input_datetime(l.visit_date)); }
                        div { label { "Email" } input type="email" name="email" value=[l.email.as_deref()]; }
                        div { label { "Project" } input type="text" name="project" value=[l.project.as_deref()]; }
                        div { label { "Budget" } input type="text" name="budget" value=[l.budget.as_deref()]; }
                        div { label { "Location" } input type="text" name="location" value=[l.location.as_deref()]; }
                        button type="submit" { "Save" }
                    }
                    p class="muted" { "Cancelling hands the lead to " (vm.cancel_owner) "." }
                }))

                (card("Log activity", html! {
                    form method="post" action=(action("activity")) class="inline" {
                        div {
                            label { "Type" }
                            select name="activity_type" {
                                @for t in ActivityType::ALL {
                                    option value=(t.label()) { (t.label()) }
                                }
                            }
                        }
                        div style="flex: 1;" { label { "Remarks" } input type="text" name="remarks" required style="width: 100%;"; }
                        button type="submit" { "Add" }
                    }
                }))

                div class="grid" {
                    (card("Reassign", html! {
                        form method="post" action=(action("assign")) class="inline" {
                            (user_select("assignee", vm.users, Some(&l.assigned_salesperson_id), None))
                            button type="submit" { "Assign" }
                        }
                    }))
                    (card("Reschedule visit", html! {
                        form method="post" action=(action("reschedule")) class="inline" {
                            input type="datetime-local" name="visit_date" required value=(input_datetime(l.scheduled_visit_date()));
                            button type="submit" { "Reschedule" }
                        }
                    }))
                }

                (card("Activity log", html! {
                    @if vm.activities.is_empty() {
                        p { "No activity yet." }
                    }
                    ul {
                        @for a in vm.activities {
                            li {
                                (a.timestamp.format("%d %b %Y %H:%M").to_string()) " · "
                                strong { (a.activity_type.label()) } " by "
                                (display_name(vm.users, &a.salesperson_id)) ": " (a.remarks)
                            }
                        }
                    }
                }))
            }
        },
    )
}
