// src/intake/webhook.rs

use crate::app::AppContext;
use crate::auth::secrets_match;
use crate::domain::Lead;
use crate::errors::{ResultResp, ServerError};
use crate::intake::mapping::InboundSource;
use crate::intake::normalizer::normalize;
use crate::responses::json_response;
use astra::Request;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use tracing::info;

pub const WEBHOOK_PREFIX: &str = "/api/webhook/";
const MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAccepted {
    pub success: bool,
    pub lead_id: String,
    pub lead: Lead,
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Secret from `x-webhook-secret` or `authorization`, raw or as `Bearer <secret>`.
fn presented_secret(req: &Request) -> Option<&str> {
    header(req, "x-webhook-secret")
        .or_else(|| header(req, "authorization"))
        .map(|v| {
            let v = v.trim();
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
                .unwrap_or(v)
                .trim()
        })
}

pub fn authorize(req: &Request, expected: Option<&str>) -> Result<(), ServerError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match presented_secret(req) {
        Some(given) if secrets_match(given, expected) => Ok(()),
        _ => Err(ServerError::Unauthorized("invalid webhook secret".into())),
    }
}

fn read_json(req: &mut Request) -> Result<Value, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("could not read body: {e}")))?;
    serde_json::from_slice(&buf).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))
}

/// Validate, normalize and store one inbound lead.
pub fn receive(ctx: &AppContext, mut req: Request, now: NaiveDateTime) -> Result<WebhookAccepted, ServerError> {
    authorize(&req, ctx.settings.webhook_secret.as_deref())?;

    let slug = req
        .uri()
        .path()
        .strip_prefix(WEBHOOK_PREFIX)
        .unwrap_or_default()
        .trim_end_matches('/');
    let source = InboundSource::from_slug(slug).ok_or(ServerError::NotFound)?;

    let payload = read_json(&mut req)?;
    let users = ctx.store.users()?;
    let lead = normalize(source, &payload, &users, ctx.store.next_id("L"), now)?;
    let lead = ctx.store.add_lead(lead)?;

    info!(lead_id = %lead.id, source = %source, owner = %lead.assigned_salesperson_id, "inbound lead accepted");
    ctx.sync_lead(&lead);

    Ok(WebhookAccepted {
        success: true,
        lead_id: lead.id.clone(),
        lead,
    })
}

pub fn handle_webhook(ctx: &AppContext, req: Request, now: NaiveDateTime) -> ResultResp {
    let path = req.uri().path().to_string();
    match receive(ctx, req, now) {
        Ok(accepted) => json_response(200, &accepted),
        Err(e) => {
            tracing::warn!(path = %path, status = e.status(), error = %e, "webhook rejected");
            Err(e)
        }
    }
}
