use crate::domain::User;
use crate::templates::components::{temperature_select, user_select};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn new_lead_page(viewer: &User, users: &[User], error: Option<&str>) -> Markup {
    desktop_layout(
        "New lead",
        Some(viewer),
        html! {
            main class="container narrow" {
                h1 { "New lead" }
                @if let Some(msg) = error {
                    p class="warning" { (msg) }
                }
                form method="post" action="/leads/new" class="card" {
                    label { "Customer name" } input type="text" name="customerName" required;
                    label { "Mobile" } input type="tel" name="mobile" required;
                    label { "Email" } input type="email" name="email";
                    label { "Project" } input type="text" name="project";
                    label { "Budget" } input type="text" name="budget";
                    label { "Location" } input type="text" name="location";
                    label { "Source" } input type="text" name="source" value="Walk-in";
                    label { "Temperature" } (temperature_select("temperature", None, "Not set"))
                    label { "Assign to" } (user_select("assignedTo", users, Some(&viewer.id), None))
                    label { "Remarks" } input type="text" name="message";
                    p { button type="submit" { "Create lead" } }
                }
            }
        },
    )
}
