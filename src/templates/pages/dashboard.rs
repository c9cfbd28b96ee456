use crate::crm::dashboard::DashboardStats;
use crate::domain::{Activity, Lead, Task, User};
use crate::crm::lifecycle::display_name;
use crate::templates::components::{card, short_date, status_badge, temperature_badge};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct DashboardVm<'a> {
    pub viewer: &'a User,
    pub users: &'a [User],
    pub stats: DashboardStats,
    pub due_today: Vec<Lead>,
    pub recent: Vec<Activity>,
    pub tasks: Vec<Task>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    let s = &vm.stats;
    desktop_layout(
        "Dashboard",
        Some(vm.viewer),
        html! {
            main class="container" {
                h1 { "Dashboard" }
                p { "Signed in as " strong { (vm.viewer.name) } }

                div class="grid" {
                    (stat("Total leads", s.total.to_string(), "/leads"))
                    (stat("Hot", s.hot.to_string(), "/leads?temperature=Hot"))
                    (stat("Unread", s.unread.to_string(), "/leads?view=unread"))
                    (stat("Due today", s.due_today.to_string(), "/leads?view=today"))
                    (stat("Overdue", s.overdue.to_string(), "/leads?view=overdue"))
                    (stat("Missed visits", s.missed_visits.to_string(), "/leads?view=missed"))
                    (stat("Conversion", format!("{}%", s.conversion_percent), "/leads?status=booked"))
                    (stat("Open tasks", format!("{} ({} overdue)", s.open_tasks, s.overdue_tasks), "/tasks"))
                }

                (card("Pipeline", html! {
                    table {
                        tbody {
                            @for (status, n) in &s.by_status {
                                tr {
                                    td { a href=(format!("/leads?status={}", status.key())) { (status.label()) } }
                                    td { (n) }
                                }
                            }
                        }
                    }
                }))

                @if !s.targets.is_empty() {
                    (card("Sales targets", html! {
                        table {
                            thead { tr { th { "Salesperson" } th { "Booked" } th { "Target" } th { "%" } } }
                            tbody {
                                @for t in &s.targets {
                                    tr {
                                        td { (t.salesperson_name) }
                                        td { (t.achieved) }
                                        td { (t.target) }
                                        td { (t.percent()) "%" }
                                    }
                                }
                            }
                        }
                    }))
                }

                (card("Follow-ups due today", html! {
                    @if vm.due_today.is_empty() {
                        p { "Nothing due today." }
                    } @else {
                        ul {
                            @for l in &vm.due_today {
                                li {
                                    a href=(format!("/leads/{}", l.id)) { (l.customer_name) }
                                    " " (status_badge(l.status)) " " (temperature_badge(l.temperature))
                                }
                            }
                        }
                    }
                }))

                (card("Recent activity", html! {
                    ul {
                        @for a in &vm.recent {
                            li {
                                (short_date(Some(a.timestamp))) " · "
                                strong { (a.activity_type.label()) } " by "
                                (display_name(vm.users, &a.salesperson_id)) ": "
                                a href=(format!("/leads/{}", a.lead_id)) { (a.remarks) }
                            }
                        }
                    }
                }))

                (card("My tasks", html! {
                    ul {
                        @for t in vm.tasks.iter().filter(|t| !t.completed).take(5) {
                            li { (t.title) " · due " (t.due_date.format("%d %b").to_string()) }
                        }
                    }
                    a href="/tasks" { "All tasks" }
                }))
            }
        },
    )
}

fn stat(label: &str, value: String, href: &str) -> Markup {
    html! {
        a class="card" href=(href) style="text-decoration: none; color: inherit;" {
            div { (label) }
            div class="stat" { (value) }
        }
    }
}
