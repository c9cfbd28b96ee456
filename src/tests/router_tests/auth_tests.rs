// src/tests/router_tests/auth_tests.rs
use crate::tests::utils::{body_text, get, location, login_as, post_form, send, test_ctx};

#[test]
fn pages_redirect_to_login_without_session() {
    let ctx = test_ctx(None);
    let resp = send(&ctx, get("/dashboard", "")).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/login");

    let resp = send(&ctx, get("/leads", "session=made-up")).unwrap();
    assert_eq!(location(&resp), "/login");
}

#[test]
fn wrong_password_shows_login_again() {
    let ctx = test_ctx(None);
    let resp = send(&ctx, post_form("/login", "", "user_id=U-1&password=nope")).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("Set-Cookie").is_none());
    assert!(body_text(resp).contains("Wrong team member or password."));
}

#[test]
fn login_grants_dashboard_and_logout_revokes() {
    let ctx = test_ctx(None);
    let cookie = login_as(&ctx, "U-1");

    let resp = send(&ctx, get("/dashboard", &cookie)).unwrap();
    assert_eq!(resp.status(), 200);
    let html = body_text(resp);
    assert!(html.contains("Dashboard"));
    assert!(html.contains("Sales targets"));

    let resp = send(&ctx, post_form("/logout", &cookie, "")).unwrap();
    assert_eq!(location(&resp), "/login");

    let resp = send(&ctx, get("/dashboard", &cookie)).unwrap();
    assert_eq!(location(&resp), "/login");
}

#[test]
fn team_page_is_admin_only() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");
    assert_eq!(send(&ctx, get("/users", &admin)).unwrap().status(), 200);

    let sales = login_as(&ctx, "U-3");
    let err = send(&ctx, get("/users", &sales)).unwrap_err();
    assert_eq!(err.status(), 401);
}

#[test]
fn admin_adds_a_salesperson_under_a_manager() {
    let ctx = test_ctx(None);
    let admin = login_as(&ctx, "U-1");

    let resp = send(
        &ctx,
        post_form("/users", &admin, "name=Tara+Kulkarni&role=Salesperson&reports_to=U-2"),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let users = ctx.store.users().unwrap();
    let tara = users.iter().find(|u| u.name == "Tara Kulkarni").unwrap();
    assert_eq!(tara.reports_to.as_deref(), Some("U-2"));
}

#[test]
fn unknown_page_is_not_found_once_signed_in() {
    let ctx = test_ctx(None);
    let cookie = login_as(&ctx, "U-1");
    let err = send(&ctx, get("/nowhere", &cookie)).unwrap_err();
    assert_eq!(err.status(), 404);
}
