use crate::domain::User;
use maud::{html, Markup, DOCTYPE, PreEscaped};

const BASE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; background: #f9fafb; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; background: #fff; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
header nav ul { display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }
header a { color: #374151; text-decoration: none; }
.container { max-width: 1200px; margin: 1.5rem auto; padding: 0 1rem; }
.narrow { max-width: 420px; }
.card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1rem; box-shadow: 0 1px 2px rgba(0,0,0,0.06); }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 1rem; }
.stat { font-size: 1.75rem; font-weight: 600; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 6px 8px; border-bottom: 1px solid #f3f4f6; text-align: left; vertical-align: top; }
th { border-bottom: 2px solid #e5e7eb; }
.badge { display: inline-block; padding: 2px 8px; border-radius: 999px; font-size: 0.8em; background: #e5e7eb; }
.hot { background: #fee2e2; color: #b91c1c; }
.warm { background: #fef3c7; color: #92400e; }
.cold { background: #dbeafe; color: #1e40af; }
.unread td:first-child { border-left: 3px solid #524ed2; }
.notice { background: #ecfdf5; border: 1px solid #a7f3d0; padding: 0.5rem 0.75rem; border-radius: 6px; }
.warning { color: #b91c1c; }
.muted { color: #6b7280; font-size: 0.85em; }
form.inline { display: flex; flex-wrap: wrap; gap: 0.5rem; align-items: end; }
label { display: block; font-size: 0.85em; color: #4b5563; }
"#;

pub fn desktop_layout(title: &str, viewer: Option<&User>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Lead Desk" }
                style { (PreEscaped(BASE_CSS)) }
            }
            body {
              header {
                  strong { "Lead Desk" }
                  @if let Some(user) = viewer {
                      nav {
                          ul {
                              li { a href="/dashboard" { "Dashboard" } }
                              li { a href="/leads" { "Leads" } }
                              li { a href="/leads/new" { "New lead" } }
                              li { a href="/tasks" { "Tasks" } }
                              li { a href="/import" { "Import" } }
                              @if user.is_admin() {
                                  li { a href="/users" { "Team" } }
                              }
                          }
                      }
                      form method="post" action="/logout" {
                          span { (user.name) " (" (user.role.label()) ") " }
                          button type="submit" { "Log out" }
                      }
                  } @else {
                      a href="/login" { "Login" }
                  }
              }
                (content)
            }
        }
    }
}
