// src/tests/router_tests/webhook_tests.rs
use crate::domain::LeadStatus;
use crate::tests::utils::{body_text, request, send, test_ctx, TEST_SECRET};
use http::Method;
use serde_json::Value;

fn webhook(source: &str, body: &str, secret: Option<&str>) -> astra::Request {
    let mut req = request(Method::POST, &format!("/api/webhook/{source}"), body);
    req.headers_mut()
        .insert("Content-Type", "application/json".parse().unwrap());
    if let Some(secret) = secret {
        req.headers_mut()
            .insert("x-webhook-secret", secret.parse().unwrap());
    }
    req
}

fn json_body(resp: astra::Response) -> Value {
    serde_json::from_str(&body_text(resp)).expect("json body")
}

#[test]
fn website_lead_is_accepted_and_stored() {
    let ctx = test_ctx(None);
    let before = ctx.store.leads().unwrap().len();

    let body = r#"{"name":"Kiran Rao","phone":"+91 98450 11122","project":"Palm Grove","message":"Evening calls only"}"#;
    let resp = send(&ctx, webhook("website", body, None)).unwrap();
    assert_eq!(resp.status(), 200);

    let json = json_body(resp);
    assert_eq!(json["success"], true);
    let lead_id = json["leadId"].as_str().unwrap().to_string();
    assert!(lead_id.starts_with("L-"));
    assert_eq!(json["lead"]["mobile"], "+919845011122");
    assert_eq!(json["lead"]["isRead"], false);

    let stored = ctx.store.lead(&lead_id).unwrap();
    assert_eq!(stored.status, LeadStatus::New);
    assert_eq!(stored.month, "October 2026");
    assert_eq!(stored.last_remark.as_deref(), Some("Website lead | Evening calls only"));
    assert_eq!(ctx.store.leads().unwrap().len(), before + 1);
}

#[test]
fn facebook_field_data_is_flattened() {
    let ctx = test_ctx(None);
    let body = r#"{
        "form_name": "Diwali Offer",
        "campaign_name": "Palm Grove Launch",
        "field_data": [
            {"name": "full_name", "values": ["Asha Menon"]},
            {"name": "phone_number", "values": ["9876501234"]},
            {"name": "city", "values": ["Kochi"]}
        ]
    }"#;
    let resp = send(&ctx, webhook("facebook", body, None)).unwrap();
    assert_eq!(resp.status(), 200);

    let json = json_body(resp);
    assert_eq!(json["lead"]["customerName"], "Asha Menon");
    assert_eq!(json["lead"]["location"], "Kochi");
    assert_eq!(json["lead"]["source"], "Facebook");
    assert_eq!(
        json["lead"]["lastRemark"],
        "Facebook lead | Form: Diwali Offer | Campaign: Palm Grove Launch"
    );
}

#[test]
fn short_mobile_is_rejected_without_storing() {
    let ctx = test_ctx(None);
    let before = ctx.store.leads().unwrap().len();

    let resp = send(&ctx, webhook("ivr", r#"{"caller_name":"X","caller_number":"12345"}"#, None)).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(json_body(resp)["error"].as_str().unwrap().contains("mobile"));
    assert_eq!(ctx.store.leads().unwrap().len(), before);
}

#[test]
fn malformed_json_is_a_bad_request() {
    let ctx = test_ctx(None);
    let resp = send(&ctx, webhook("website", "{not json", None)).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(json_body(resp)["error"].is_string());
}

#[test]
fn unknown_source_is_not_found() {
    let ctx = test_ctx(None);
    let resp = send(&ctx, webhook("twitter", r#"{"name":"A","phone":"9876543210"}"#, None)).unwrap();
    assert_eq!(resp.status(), 404);
}

#[test]
fn secret_is_enforced_when_configured() {
    let ctx = test_ctx(Some(TEST_SECRET));
    let body = r#"{"name":"Kiran Rao","phone":"9845011122"}"#;

    let resp = send(&ctx, webhook("website", body, None)).unwrap();
    assert_eq!(resp.status(), 401);

    let resp = send(&ctx, webhook("website", body, Some("wrong"))).unwrap();
    assert_eq!(resp.status(), 401);

    let resp = send(&ctx, webhook("website", body, Some(TEST_SECRET))).unwrap();
    assert_eq!(resp.status(), 200);

    let mut bearer = request(Method::POST, "/api/webhook/website", body);
    bearer.headers_mut().insert(
        "Authorization",
        format!("Bearer {TEST_SECRET}").parse().unwrap(),
    );
    assert_eq!(send(&ctx, bearer).unwrap().status(), 200);
}

#[test]
fn explicit_assignee_is_honoured() {
    let ctx = test_ctx(None);
    let body = r#"{"name":"Kiran Rao","phone":"9845011122","assignedTo":"rahul verma"}"#;
    let json = json_body(send(&ctx, webhook("website", body, None)).unwrap());
    assert_eq!(json["lead"]["assignedSalespersonId"], "U-4");

    let body = r#"{"name":"Kiran Rao","phone":"9845011122","assignedTo":"nobody"}"#;
    let json = json_body(send(&ctx, webhook("website", body, None)).unwrap());
    assert_eq!(json["lead"]["assignedSalespersonId"], "U-1");
}
