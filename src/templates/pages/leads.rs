use crate::crm::lifecycle::display_name;
use crate::crm::{LeadFilter, LeadView};
use crate::domain::{Lead, User};
use crate::templates::components::{
    notice, short_date, status_badge, status_select, temperature_badge, temperature_select, user_select,
};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct LeadListVm<'a> {
    pub viewer: &'a User,
    pub users: &'a [User],
    pub leads: &'a [Lead],
    pub filter: &'a LeadFilter,
    pub sources: Vec<String>,
    pub notice: Option<String>,
}

pub fn leads_page(vm: &LeadListVm) -> Markup {
    let f = vm.filter;
    desktop_layout(
        "Leads",
        Some(vm.viewer),
        html! {
            main class="container" {
                h1 { "Leads (" (vm.leads.len()) ")" }
                (notice(vm.notice.as_deref()))

                nav style="margin-bottom: 0.75rem;" {
                    @for view in LeadView::ALL {
                        @if view == f.view {
                            strong { (view.label()) }
                        } @else {
                            a href=(format!("/leads?view={}", view.key())) { (view.label()) }
                        }
                        " "
                    }
                }

                form method="get" action="/leads" class="card inline" {
                    div { label { "Search" } input type="search" name="q" value=[f.search.as_deref()] placeholder="Name, mobile or email"; }
                    div { label { "Status" } (status_select("status", f.status, Some("Any"))) }
                    div { label { "Salesperson" } (user_select("salesperson", vm.users, f.salesperson_id.as_deref(), Some("Anyone"))) }
                    div { label { "Temperature" } (temperature_select("temperature", f.temperature, "Any")) }
                    div {
                        label { "Source" }
                        select name="source" {
                            option value="" { "Any" }
                            @for s in &vm.sources {
                                option value=(s) selected[f.source.as_deref() == Some(s.as_str())] { (s) }
                            }
                        }
                    }
                    input type="hidden" name="view" value=(f.view.key());
                    button type="submit" { "Filter" }
                    a href="/leads" { "Reset" }
                    a href="/export.csv" { "Export CSV" }
                    a href="/export.xlsx" { "Export XLSX" }
                }

                form method="post" action="/leads/bulk" {
                    div class="card inline" {
                        strong { "Bulk update selected:" }
                        div { label { "Status" } (status_select("status", None, Some("Keep status"))) }
                        div { label { "Assign to" } (user_select("assignee", vm.users, None, Some("Keep owner"))) }
                        button type="submit" { "Apply" }
                    }

                    table {
                        thead {
                            tr {
                                th { "" }
                                th { "Customer" }
                                th { "Mobile" }
                                th { "Status" }
                                th { "Temp" }
                                th { "Owner" }
                                th { "Source" }
                                th { "Lead date" }
                                th { "Follow up" }
                                th { "Missed" }
                            }
                        }
                        tbody {
                            @for l in vm.leads {
                                tr class=[(!l.is_read).then_some("unread")] {
                                    td { input type="checkbox" name="lead_id" value=(l.id); }
                                    td { a href=(format!("/leads/{}", l.id)) { (l.customer_name) } }
                                    td { (l.mobile) }
                                    td { (status_badge(l.status)) }
                                    td { (temperature_badge(l.temperature)) }
                                    td { (display_name(vm.users, &l.assigned_salesperson_id)) }
                                    td { (l.source) }
                                    td { (short_date(Some(l.lead_date))) }
                                    td { (short_date(l.next_follow_up_date)) }
                                    td { @if l.missed_visits_count > 0 { span class="warning" { (l.missed_visits_count) } } }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
