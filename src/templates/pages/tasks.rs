use crate::crm::lifecycle::display_name;
use crate::domain::{Task, User};
use crate::templates::components::{notice, user_select};
use crate::templates::desktop_layout;
use chrono::NaiveDate;
use maud::{html, Markup};

pub fn tasks_page(viewer: &User, users: &[User], tasks: &[Task], today: NaiveDate, message: Option<&str>) -> Markup {
    desktop_layout(
        "Tasks",
        Some(viewer),
        html! {
            main class="container" {
                h1 { "Tasks" }
                (notice(message))

                form method="post" action="/tasks" class="card inline" {
                    div { label { "Title" } input type="text" name="title" required; }
                    div {
                        label { "Assignee" }
                        @if viewer.is_admin() {
                            (user_select("assignee", users, Some(&viewer.id), None))
                        } @else {
                            input type="hidden" name="assignee" value=(viewer.id);
                            span { (viewer.name) }
                        }
                    }
                    div { label { "Due" } input type="date" name="due_date" required value=(today.format("%Y-%m-%d").to_string()); }
                    button type="submit" { "Add task" }
                }

                table {
                    thead { tr { th { "Done" } th { "Task" } th { "Assignee" } th { "Due" } } }
                    tbody {
                        @for t in tasks {
                            tr {
                                td {
                                    form method="post" action=(format!("/tasks/{}/toggle", t.id)) {
                                        button type="submit" { @if t.completed { "✓" } @else { "○" } }
                                    }
                                }
                                td {
                                    @if t.completed { s { (t.title) } } @else { (t.title) }
                                }
                                td { (display_name(users, &t.assignee_id)) }
                                td class=[t.is_overdue(today).then_some("warning")] { (t.due_date.format("%d %b %Y").to_string()) }
                            }
                        }
                    }
                }
            }
        },
    )
}
