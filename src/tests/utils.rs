use crate::app::AppContext;
use crate::config::Settings;
use crate::domain::fixtures::day;
use crate::errors::ServerError;
use crate::router::handle_at;
use crate::seed::mock_state;
use astra::{Body, Request, Response};
use chrono::NaiveDateTime;
use http::Method;
use std::io::Read;

pub const TEST_PASSWORD: &str = "letmein";
pub const TEST_SECRET: &str = "hook-secret";

/// Fixed clock every router test runs at.
pub fn test_now() -> NaiveDateTime {
    day(2026, 10, 16)
}

/// Context seeded with the demo team and leads, no sheet.
pub fn test_ctx(webhook_secret: Option<&str>) -> AppContext {
    let settings = Settings {
        shared_password: TEST_PASSWORD.to_string(),
        webhook_secret: webhook_secret.map(str::to_string),
        ..Settings::default()
    };
    AppContext::new(settings, mock_state(test_now(), 5), None)
}

pub fn request(method: Method, uri: &str, body: impl Into<String>) -> Request {
    let mut req = Request::new(Body::from(body.into()));
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

pub fn get(uri: &str, cookie: &str) -> Request {
    let mut req = request(Method::GET, uri, "");
    req.headers_mut().insert("Cookie", cookie.parse().unwrap());
    req
}

pub fn post_form(uri: &str, cookie: &str, form: &str) -> Request {
    let mut req = request(Method::POST, uri, form);
    req.headers_mut().insert(
        "Content-Type",
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    req.headers_mut().insert("Cookie", cookie.parse().unwrap());
    req
}

pub fn send(ctx: &AppContext, req: Request) -> Result<Response, ServerError> {
    handle_at(req, ctx, test_now())
}

/// Sign in through the router and return the `session=...` cookie pair.
pub fn login_as(ctx: &AppContext, user_id: &str) -> String {
    let req = post_form("/login", "", &format!("user_id={user_id}&password={TEST_PASSWORD}"));
    let resp = send(ctx, req).expect("login request");
    assert_eq!(resp.status(), 303, "login should redirect");

    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .expect("session cookie");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn body_text(resp: Response) -> String {
    let mut body = resp.into_body();
    let mut s = String::new();
    body.reader().read_to_string(&mut s).unwrap();
    s
}
