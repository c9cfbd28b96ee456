use crate::crm::lifecycle::display_name;
use crate::domain::{Role, User};
use crate::templates::components::notice;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn users_page(viewer: &User, users: &[User], message: Option<&str>) -> Markup {
    desktop_layout(
        "Team",
        Some(viewer),
        html! {
            main class="container" {
                h1 { "Team" }
                (notice(message))

                table class="card" {
                    thead { tr { th { "Name" } th { "Role" } th { "Reports to" } } }
                    tbody {
                        @for u in users {
                            tr {
                                td { (u.name) }
                                td { (u.role.label()) }
                                td {
                                    @if let Some(manager) = &u.reports_to {
                                        (display_name(users, manager))
                                    }
                                }
                            }
                        }
                    }
                }

                form method="post" action="/users" class="card inline" {
                    div { label { "Name" } input type="text" name="name" required; }
                    div {
                        label { "Role" }
                        select name="role" {
                            @for role in [Role::Salesperson, Role::SalesManager, Role::Admin] {
                                option value=(role.label()) { (role.label()) }
                            }
                        }
                    }
                    div {
                        label { "Reports to" }
                        select name="reports_to" {
                            option value="" { "Nobody" }
                            @for m in users.iter().filter(|u| u.role != Role::Salesperson) {
                                option value=(m.id) { (m.name) }
                            }
                        }
                    }
                    button type="submit" { "Add member" }
                }
            }
        },
    )
}
