// src/tests/router_tests/import_export_tests.rs
use crate::spreadsheets::columns::EXPORT_HEADERS;
use crate::spreadsheets::csv::parse_csv;
use crate::tests::utils::{body_text, get, location, login_as, post_form, request, send, test_ctx};
use http::Method;

const CSV: &str = "Customer Name,Mobile,Sales Person,Lead Date,Status,Remarks\n\
                   Gaurav Malhotra,9900112233,Rahul Verma,12/10/2026,Contacted,Met at expo\n\
                   ,9900112244,,,,\n\
                   Nisha Pillai,9900112255,Someone Else,,,\n";

#[test]
fn pasted_csv_is_imported() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");
    let before = ctx.store.leads().unwrap().len();

    let form = format!(
        "csv={}",
        url::form_urlencoded::byte_serialize(CSV.as_bytes()).collect::<String>()
    );
    let resp = send(&ctx, post_form("/import", &priya, &form)).unwrap();
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).contains("Imported+2+leads%2C+skipped+1+rows."));

    let leads = ctx.store.leads().unwrap();
    assert_eq!(leads.len(), before + 2);
    let gaurav = leads.iter().find(|l| l.customer_name == "Gaurav Malhotra").unwrap();
    assert_eq!(gaurav.assigned_salesperson_id, "U-4");
    assert_eq!(gaurav.source, "CSV Import");
    let nisha = leads.iter().find(|l| l.customer_name == "Nisha Pillai").unwrap();
    assert_eq!(nisha.assigned_salesperson_id, "U-3");
    assert_ne!(gaurav.id, nisha.id);
}

#[test]
fn raw_csv_body_is_accepted() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");

    let mut req = request(Method::POST, "/import", CSV);
    req.headers_mut().insert("Content-Type", "text/csv".parse().unwrap());
    req.headers_mut().insert("Cookie", admin.parse().unwrap());
    let resp = send(&ctx, req).unwrap();
    assert!(location(&resp).starts_with("/leads"));
}

#[test]
fn csv_without_required_headers_reports_back() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");
    let before = ctx.store.leads().unwrap().len();

    let resp = send(&ctx, post_form("/import", &admin, "csv=Name%2CPhone%0AA%2C1")).unwrap();
    assert!(location(&resp).starts_with("/import?msg="));
    assert_eq!(ctx.store.leads().unwrap().len(), before);
}

#[test]
fn csv_export_respects_visibility_and_filters() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");

    let resp = send(&ctx, get("/export.csv?status=booked", &priya)).unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let rows = parse_csv(&body_text(resp));
    assert_eq!(rows[0], EXPORT_HEADERS.to_vec());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "Sanjay Patil");
    assert_eq!(rows[1][4], "Priya Shah");
}

#[test]
fn xlsx_export_downloads() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");
    let resp = send(&ctx, get("/export.xlsx", &admin)).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|d| d.contains("leads_20261016.xlsx")));
}
