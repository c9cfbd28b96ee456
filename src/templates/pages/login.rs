use crate::domain::User;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(users: &[User], error: Option<&str>) -> Markup {
    desktop_layout(
        "Sign in",
        None,
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                @if let Some(msg) = error {
                    p class="warning" { (msg) }
                }
                form method="post" action="/login" class="card" {
                    label for="user_id" { "Team member" }
                    select id="user_id" name="user_id" required {
                        @for u in users {
                            option value=(u.id) { (u.name) " (" (u.role.label()) ")" }
                        }
                    }
                    label for="password" { "Team password" }
                    input type="password" id="password" name="password" required;
                    p { button type="submit" { "Sign in" } }
                }
            }
        },
    )
}
