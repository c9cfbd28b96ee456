use crate::domain::User;
use crate::spreadsheets::columns::IMPORT_HEADERS;
use crate::templates::components::notice;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn import_page(viewer: &User, message: Option<&str>) -> Markup {
    desktop_layout(
        "Import leads",
        Some(viewer),
        html! {
            main class="container" {
                h1 { "Import leads from CSV" }
                (notice(message))
                p {
                    "Expected columns: " code { (IMPORT_HEADERS.join(", ")) }
                    ". Customer Name and Mobile are required, dates are DD/MM/YYYY."
                }
                form method="post" action="/import" class="card" {
                    label for="csv" { "Paste CSV" }
                    textarea id="csv" name="csv" rows="14" style="width: 100%; font-family: monospace;" required {}
                    p { button type="submit" { "Import" } }
                }
            }
        },
    )
}
