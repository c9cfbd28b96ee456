// src/tests/router_tests/lead_tests.rs
use crate::domain::{ActivityType, LeadStatus};
use crate::tests::utils::{body_text, get, location, login_as, post_form, send, test_ctx};

#[test]
fn salesperson_sees_only_own_leads() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");

    let html = body_text(send(&ctx, get("/leads", &priya)).unwrap());
    assert!(html.contains("Anil Kapoor"));
    assert!(!html.contains("Vikram Singh"));

    let err = send(&ctx, get("/leads/L-1003", &priya)).unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn manager_sees_direct_reports() {
    let ctx = test_ctx(None);
    let meera = login_as(&ctx, "U-2");

    let html = body_text(send(&ctx, get("/leads", &meera)).unwrap());
    assert!(html.contains("Anil Kapoor"));
    assert!(html.contains("Vikram Singh"));
    assert!(!html.contains("Rohan Mehta"));
}

#[test]
fn list_filters_by_query() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");

    let html = body_text(send(&ctx, get("/leads?status=booked", &admin)).unwrap());
    assert!(html.contains("Deepak Joshi"));
    assert!(!html.contains("Anil Kapoor"));

    let html = body_text(send(&ctx, get("/leads?q=98111", &admin)).unwrap());
    assert!(html.contains("Anil Kapoor"));
    assert!(!html.contains("Sunita Rao"));
}

#[test]
fn opening_a_lead_marks_it_read() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");
    assert!(!ctx.store.lead("L-1001").unwrap().is_read);

    let resp = send(&ctx, get("/leads/L-1001", &priya)).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(ctx.store.lead("L-1001").unwrap().is_read);
}

#[test]
fn cancelling_reassigns_to_admin_and_counts_missed_visit() {
    let ctx = test_ctx(None);
    let rahul = login_as(&ctx, "U-4");
    let notes_before = ctx.store.activities_for_lead("L-1003").unwrap().len();

    let resp = send(&ctx, post_form("/leads/L-1003/update", &rahul, "status=cancelled")).unwrap();
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).starts_with("/leads/L-1003"));

    let lead = ctx.store.lead("L-1003").unwrap();
    assert_eq!(lead.status, LeadStatus::Cancelled);
    assert_eq!(lead.assigned_salesperson_id, "U-1");
    assert_eq!(lead.missed_visits_count, 1);

    let activities = ctx.store.activities_for_lead("L-1003").unwrap();
    assert_eq!(activities.len(), notes_before + 1);
    assert_eq!(activities[0].activity_type, ActivityType::Note);
    assert!(activities[0].remarks.contains("reassigned from Rahul Verma to Admin"));
}

#[test]
fn invalid_status_is_rejected() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");
    let err = send(&ctx, post_form("/leads/L-1001/update", &admin, "status=won")).unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(ctx.store.lead("L-1001").unwrap().status, LeadStatus::New);
}

#[test]
fn logging_an_activity_stamps_the_lead() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");

    let resp = send(
        &ctx,
        post_form("/leads/L-1001/activity", &priya, "activity_type=Call&remarks=Discussed+pricing"),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let lead = ctx.store.lead("L-1001").unwrap();
    assert_eq!(lead.last_remark.as_deref(), Some("Discussed pricing"));
    assert!(lead.is_read);
    let latest = &ctx.store.activities_for_lead("L-1001").unwrap()[0];
    assert_eq!(latest.activity_type, ActivityType::Call);
    assert_eq!(latest.salesperson_id, "U-3");
}

#[test]
fn rescheduling_an_overdue_visit_counts_it_once() {
    let ctx = test_ctx(None);
    let rahul = login_as(&ctx, "U-4");

    send(&ctx, post_form("/leads/L-1003/reschedule", &rahul, "visit_date=2026-10-20T10%3A30")).unwrap();
    let lead = ctx.store.lead("L-1003").unwrap();
    assert_eq!(lead.missed_visits_count, 1);
    assert_eq!(lead.status, LeadStatus::VisitScheduled);
    assert_eq!(
        ctx.store.activities_for_lead("L-1003").unwrap()[0].remarks,
        "Visit rescheduled to 20/10/2026 10:30. Previous visit was missed."
    );

    // The new date is in the future, so doing it again is not another miss.
    send(&ctx, post_form("/leads/L-1003/reschedule", &rahul, "visit_date=2026-10-22T10%3A30")).unwrap();
    assert_eq!(ctx.store.lead("L-1003").unwrap().missed_visits_count, 1);
}

#[test]
fn bulk_update_writes_one_note_per_changed_lead() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");

    let resp = send(
        &ctx,
        post_form(
            "/leads/bulk",
            &admin,
            "lead_id=L-1001&lead_id=L-1009&lead_id=L-1002&status=contacted&assignee=",
        ),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).contains("Updated+2+leads+%281+unchanged%29"));

    assert_eq!(ctx.store.lead("L-1001").unwrap().status, LeadStatus::Contacted);
    assert_eq!(ctx.store.lead("L-1009").unwrap().status, LeadStatus::Contacted);

    let notes = ctx.store.activities_for_lead("L-1001").unwrap();
    assert_eq!(notes[0].remarks, "Bulk update: status changed from New to Contacted.");
    let untouched = ctx.store.activities_for_lead("L-1002").unwrap();
    assert!(untouched.iter().all(|a| !a.remarks.starts_with("Bulk update")));
}

#[test]
fn bulk_cancel_overrides_requested_owner() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");

    send(
        &ctx,
        post_form("/leads/bulk", &admin, "lead_id=L-1005&status=cancelled&assignee=U-3"),
    )
    .unwrap();
    let lead = ctx.store.lead("L-1005").unwrap();
    assert_eq!(lead.status, LeadStatus::Cancelled);
    assert_eq!(lead.assigned_salesperson_id, "U-1");
}

#[test]
fn bulk_ignores_leads_the_viewer_cannot_see() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");

    send(
        &ctx,
        post_form("/leads/bulk", &priya, "lead_id=L-1001&lead_id=L-1005&status=contacted"),
    )
    .unwrap();
    assert_eq!(ctx.store.lead("L-1001").unwrap().status, LeadStatus::Contacted);
    assert_eq!(ctx.store.lead("L-1005").unwrap().status, LeadStatus::VisitDone);
}

#[test]
fn new_lead_form_goes_through_the_normalizer() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");

    let resp = send(
        &ctx,
        post_form(
            "/leads/new",
            &priya,
            "customerName=Isha+Kapoor&mobile=98765-43210&source=Walk-in&temperature=Warm&assignedTo=U-3",
        ),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let lead_id = location(&resp)
        .trim_start_matches("/leads/")
        .split('?')
        .next()
        .unwrap()
        .to_string();
    let lead = ctx.store.lead(&lead_id).unwrap();
    assert_eq!(lead.customer_name, "Isha Kapoor");
    assert_eq!(lead.mobile, "9876543210");
    assert_eq!(lead.source, "Walk-in");
    assert_eq!(lead.assigned_salesperson_id, "U-3");

    let resp = send(&ctx, post_form("/leads/new", &priya, "customerName=No+Phone&mobile=123")).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_text(resp).contains("at least 10 digits"));
}

#[test]
fn tasks_can_be_added_and_toggled() {
    let ctx = test_ctx(None);
    let priya = login_as(&ctx, "U-3");

    send(
        &ctx,
        post_form("/tasks", &priya, "title=Call+the+bank&assignee=U-1&due_date=2026-10-18"),
    )
    .unwrap();

    let viewer = ctx.store.user("U-3").unwrap();
    let task = ctx
        .store
        .tasks_for(&viewer)
        .unwrap()
        .into_iter()
        .find(|t| t.title == "Call the bank")
        .expect("task assigned to the creator");
    assert!(!task.completed);

    send(&ctx, post_form(&format!("/tasks/{}/toggle", task.id), &priya, "")).unwrap();
    let toggled = ctx
        .store
        .tasks_for(&viewer)
        .unwrap()
        .into_iter()
        .find(|t| t.id == task.id)
        .unwrap();
    assert!(toggled.completed);

    let rahul = login_as(&ctx, "U-4");
    let err = send(&ctx, post_form(&format!("/tasks/{}/toggle", task.id), &rahul, "")).unwrap_err();
    assert_eq!(err.status(), 401);
}
