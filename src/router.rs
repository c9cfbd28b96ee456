use crate::app::{self, AppContext};
use crate::auth::{secrets_match, session_cookie, sessions::SESSION_TTL_SECS};
use crate::crm::dashboard::compute_stats;
use crate::crm::filters::apply as apply_filter;
use crate::crm::{BulkChange, LeadFilter};
use crate::domain::user::find_user;
use crate::domain::{ActivityType, Lead, LeadStatus, Role, Temperature, User};
use crate::errors::{ResultResp, ServerError};
use crate::intake::{handle_webhook, normalize, InboundSource, WEBHOOK_PREFIX};
use crate::responses::{html_response, json_error_response, redirect, redirect_with_cookie};
use crate::spreadsheets::columns::parse_sheet_date;
use crate::spreadsheets::{export_leads_csv, export_leads_xlsx, import_csv};
use crate::templates::pages;
use astra::Request;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};
use url::form_urlencoded;

const MAX_FORM_BYTES: u64 = 2 * 1024 * 1024;

pub fn handle(req: Request, ctx: &AppContext) -> ResultResp {
    handle_at(req, ctx, app::now())
}

/// Route with an explicit clock.
pub fn handle_at(req: Request, ctx: &AppContext, now: NaiveDateTime) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "request");

    if path.starts_with(WEBHOOK_PREFIX) {
        if method != "POST" {
            return Ok(json_error_response(ServerError::NotFound));
        }
        return handle_webhook(ctx, req, now).or_else(|e| Ok(json_error_response(e)));
    }

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => redirect("/dashboard"),
        ("GET", "/login") => html_response(pages::login_page(&ctx.store.users()?, None)),
        ("POST", "/login") => login(req, ctx),
        ("POST", "/logout") => logout(&req, ctx),
        _ => {
            let Some(viewer) = current_user(&req, ctx)? else {
                return redirect("/login");
            };
            let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
            route_signed_in(req, ctx, &viewer, &method, &segments, now)
        }
    }
}

fn route_signed_in(
    req: Request,
    ctx: &AppContext,
    viewer: &User,
    method: &str,
    segments: &[&str],
    now: NaiveDateTime,
) -> ResultResp {
    match (method, segments) {
        ("GET", ["dashboard"]) => dashboard(ctx, viewer, now),

        ("GET", ["leads"]) => lead_list(&req, ctx, viewer, now),
        ("POST", ["leads", "bulk"]) => bulk_update(req, ctx, viewer, now),
        ("GET", ["leads", "new"]) => html_response(pages::new_lead_page(viewer, &ctx.store.users()?, None)),
        ("POST", ["leads", "new"]) => create_lead(req, ctx, viewer, now),
        ("GET", ["leads", id]) => lead_detail(&req, ctx, viewer, id, now),
        ("POST", ["leads", id, "update"]) => update_lead(req, ctx, viewer, id, now),
        ("POST", ["leads", id, "activity"]) => add_activity(req, ctx, viewer, id, now),
        ("POST", ["leads", id, "assign"]) => assign_lead(req, ctx, viewer, id, now),
        ("POST", ["leads", id, "reschedule"]) => reschedule(req, ctx, viewer, id, now),

        ("GET", ["tasks"]) => tasks(&req, ctx, viewer, now),
        ("POST", ["tasks"]) => add_task(req, ctx, viewer),
        ("POST", ["tasks", id, "toggle"]) => {
            ctx.store.toggle_task(id, viewer)?;
            redirect("/tasks")
        }

        ("GET", ["users"]) => {
            require_admin(viewer)?;
            let msg = parse_query(&req).remove("msg");
            html_response(pages::users_page(viewer, &ctx.store.users()?, msg.as_deref()))
        }
        ("POST", ["users"]) => add_user(req, ctx, viewer),

        ("GET", ["import"]) => {
            let msg = parse_query(&req).remove("msg");
            html_response(pages::import_page(viewer, msg.as_deref()))
        }
        ("POST", ["import"]) => import(req, ctx, viewer, now),

        ("GET", ["export.csv"]) => {
            let (leads, users) = filtered_leads(&req, ctx, viewer, now)?;
            export_leads_csv(&leads, &users, &now.format("%Y%m%d").to_string())
        }
        ("GET", ["export.xlsx"]) => {
            let (leads, users) = filtered_leads(&req, ctx, viewer, now)?;
            export_leads_xlsx(&leads, &users, &now.format("%Y%m%d").to_string())
        }

        _ => Err(ServerError::NotFound),
    }
}

// === Request helpers ===

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn read_body(req: &mut Request) -> Result<String, ServerError> {
    let mut body = String::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("could not read body: {e}")))?;
    Ok(body)
}

/// Form fields in submission order. Repeated names appear once per value.
fn form_pairs(req: &mut Request) -> Result<Vec<(String, String)>, ServerError> {
    let body = read_body(req)?;
    Ok(form_urlencoded::parse(body.as_bytes()).into_owned().collect())
}

fn form_map(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    Ok(form_pairs(req)?.into_iter().collect())
}

/// Trimmed, non-empty value of a form field.
fn field(form: &HashMap<String, String>, key: &str) -> Option<String> {
    form.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn date_field(form: &HashMap<String, String>, key: &str) -> Result<Option<NaiveDateTime>, ServerError> {
    match field(form, key) {
        None => Ok(None),
        Some(raw) => parse_sheet_date(&raw)
            .map(Some)
            .ok_or_else(|| ServerError::Validation(format!("'{raw}' is not a valid date"))),
    }
}

fn with_notice(path: &str, msg: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(msg.as_bytes()).collect();
    format!("{path}?msg={encoded}")
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

// === Sessions ===

fn current_user(req: &Request, ctx: &AppContext) -> Result<Option<User>, ServerError> {
    let Some(token) = req
        .headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(session_cookie)
    else {
        return Ok(None);
    };
    let Some(user_id) = ctx.sessions.load_user(token, unix_now())? else {
        return Ok(None);
    };
    Ok(ctx.store.user(&user_id).ok())
}

fn login(mut req: Request, ctx: &AppContext) -> ResultResp {
    let form = form_map(&mut req)?;
    let users = ctx.store.users()?;
    let password = form.get("password").map(String::as_str).unwrap_or("");
    let user = field(&form, "user_id").and_then(|id| find_user(&users, &id).cloned());

    match user {
        Some(user) if secrets_match(password, &ctx.settings.shared_password) => {
            let token = ctx.sessions.create_session(&user.id, unix_now())?;
            info!(user_id = %user.id, "signed in");
            let cookie = format!(
                "session={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}"
            );
            redirect_with_cookie("/dashboard", &cookie)
        }
        _ => html_response(pages::login_page(&users, Some("Wrong team member or password."))),
    }
}

fn logout(req: &Request, ctx: &AppContext) -> ResultResp {
    if let Some(token) = req
        .headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(session_cookie)
    {
        ctx.sessions.revoke(token)?;
    }
    redirect_with_cookie("/login", "session=; Path=/; HttpOnly; Max-Age=0")
}

fn require_admin(viewer: &User) -> Result<(), ServerError> {
    if viewer.is_admin() {
        Ok(())
    } else {
        Err(ServerError::Unauthorized("admins only".into()))
    }
}

/// A lead the viewer may see. Others are reported as missing.
fn visible_lead(ctx: &AppContext, viewer: &User, id: &str) -> Result<Lead, ServerError> {
    let lead = ctx.store.lead(id)?;
    let users = ctx.store.users()?;
    if viewer.can_view_owner(&lead.assigned_salesperson_id, &users) {
        Ok(lead)
    } else {
        Err(ServerError::NotFound)
    }
}

// === Pages ===

fn dashboard(ctx: &AppContext, viewer: &User, now: NaiveDateTime) -> ResultResp {
    let users = ctx.store.users()?;
    let leads = ctx.store.visible_leads(viewer)?;
    let tasks = ctx.store.tasks_for(viewer)?;
    let targets = ctx
        .store
        .sales_targets()?
        .into_iter()
        .filter(|t| viewer.can_view_owner(&t.salesperson_id, &users))
        .collect();

    let due_today = leads
        .iter()
        .filter(|l| l.follow_up_due_on(now.date()))
        .cloned()
        .collect();

    let vm = pages::DashboardVm {
        viewer,
        users: &users,
        stats: compute_stats(&leads, &tasks, targets, now),
        due_today,
        recent: ctx.store.recent_activities(viewer, 10)?,
        tasks,
    };
    html_response(pages::dashboard_page(&vm))
}

fn filtered_leads(
    req: &Request,
    ctx: &AppContext,
    viewer: &User,
    now: NaiveDateTime,
) -> Result<(Vec<Lead>, Vec<User>), ServerError> {
    let filter = LeadFilter::from_params(&parse_query(req));
    let leads = apply_filter(ctx.store.visible_leads(viewer)?, &filter, now);
    Ok((leads, ctx.store.users()?))
}

fn lead_list(req: &Request, ctx: &AppContext, viewer: &User, now: NaiveDateTime) -> ResultResp {
    let params = parse_query(req);
    let filter = LeadFilter::from_params(&params);
    let users = ctx.store.users()?;
    let visible = ctx.store.visible_leads(viewer)?;

    let mut sources: Vec<String> = visible.iter().map(|l| l.source.clone()).collect();
    sources.sort();
    sources.dedup();

    let leads = apply_filter(visible, &filter, now);
    let vm = pages::LeadListVm {
        viewer,
        users: &users,
        leads: &leads,
        filter: &filter,
        sources,
        notice: params.get("msg").cloned(),
    };
    html_response(pages::leads_page(&vm))
}

fn lead_detail(req: &Request, ctx: &AppContext, viewer: &User, id: &str, now: NaiveDateTime) -> ResultResp {
    let mut lead = visible_lead(ctx, viewer, id)?;
    if !lead.is_read {
        lead = ctx.store.mark_read(id)?;
        ctx.sync_lead(&lead);
    }

    let users = ctx.store.users()?;
    let activities = ctx.store.activities_for_lead(id)?;
    let vm = pages::LeadDetailVm {
        viewer,
        users: &users,
        lead: &lead,
        activities: &activities,
        now,
        notice: parse_query(req).remove("msg"),
        cancel_owner: ctx.store.admin_user()?.name,
    };
    html_response(pages::lead_detail_page(&vm))
}

// === Lead mutations ===

fn update_lead(mut req: Request, ctx: &AppContext, viewer: &User, id: &str, now: NaiveDateTime) -> ResultResp {
    let existing = visible_lead(ctx, viewer, id)?;
    let form = form_map(&mut req)?;
    let users = ctx.store.users()?;

    let mut proposed = existing.clone();
    if let Some(raw) = field(&form, "status") {
        proposed.status = LeadStatus::parse(&raw)
            .ok_or_else(|| ServerError::Validation(format!("unknown status '{raw}'")))?;
    }
    if form.contains_key("temperature") {
        proposed.temperature = field(&form, "temperature").and_then(|t| Temperature::parse(&t));
    }
    if let Some(raw) = field(&form, "assignee") {
        proposed.assigned_salesperson_id = find_user(&users, &raw)
            .ok_or_else(|| ServerError::Validation(format!("unknown assignee '{raw}'")))?
            .id
            .clone();
    }
    if form.contains_key("next_follow_up_date") {
        proposed.next_follow_up_date = date_field(&form, "next_follow_up_date")?;
    }
    if form.contains_key("visit_date") {
        proposed.visit_date = date_field(&form, "visit_date")?;
    }
    for (key, slot) in [
        ("email", &mut proposed.email),
        ("project", &mut proposed.project),
        ("budget", &mut proposed.budget),
        ("location", &mut proposed.location),
    ] {
        if form.contains_key(key) {
            *slot = field(&form, key);
        }
    }

    let lead = ctx.store.update_lead(proposed, &viewer.id, now)?;
    ctx.sync_lead(&lead);
    redirect(&with_notice(&format!("/leads/{}", lead.id), "Lead updated."))
}

fn add_activity(mut req: Request, ctx: &AppContext, viewer: &User, id: &str, now: NaiveDateTime) -> ResultResp {
    visible_lead(ctx, viewer, id)?;
    let form = form_map(&mut req)?;
    let activity_type = field(&form, "activity_type")
        .and_then(|t| ActivityType::parse(&t))
        .unwrap_or(ActivityType::Note);
    let remarks = form.get("remarks").map(String::as_str).unwrap_or("");

    ctx.store.add_activity(id, &viewer.id, activity_type, remarks, now)?;
    ctx.sync_lead(&ctx.store.lead(id)?);
    redirect(&with_notice(&format!("/leads/{id}"), "Activity logged."))
}

fn assign_lead(mut req: Request, ctx: &AppContext, viewer: &User, id: &str, now: NaiveDateTime) -> ResultResp {
    visible_lead(ctx, viewer, id)?;
    let form = form_map(&mut req)?;
    let assignee = field(&form, "assignee")
        .ok_or_else(|| ServerError::Validation("choose someone to assign to".into()))?;

    let lead = ctx.store.assign_lead(id, &assignee, &viewer.id, now)?;
    ctx.sync_lead(&lead);
    redirect(&with_notice("/leads", &format!("{} reassigned.", lead.customer_name)))
}

fn reschedule(mut req: Request, ctx: &AppContext, viewer: &User, id: &str, now: NaiveDateTime) -> ResultResp {
    visible_lead(ctx, viewer, id)?;
    let form = form_map(&mut req)?;
    let new_date = date_field(&form, "visit_date")?
        .ok_or_else(|| ServerError::Validation("a new visit date is required".into()))?;

    let lead = ctx.store.reschedule_visit(id, new_date, &viewer.id, now)?;
    ctx.sync_lead(&lead);
    redirect(&with_notice(&format!("/leads/{id}"), "Visit rescheduled."))
}

fn bulk_update(mut req: Request, ctx: &AppContext, viewer: &User, now: NaiveDateTime) -> ResultResp {
    let pairs = form_pairs(&mut req)?;
    let visible: Vec<String> = ctx
        .store
        .visible_leads(viewer)?
        .into_iter()
        .map(|l| l.id)
        .collect();

    let mut change = BulkChange::default();
    let mut hidden = 0;
    for (key, value) in pairs {
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "lead_id" if visible.contains(&value) => change.lead_ids.push(value),
            "lead_id" => hidden += 1,
            "status" => {
                change.status = Some(
                    LeadStatus::parse(&value)
                        .ok_or_else(|| ServerError::Validation(format!("unknown status '{value}'")))?,
                )
            }
            "assignee" => change.assignee_id = Some(value),
            _ => {}
        }
    }

    if change.lead_ids.is_empty() {
        return redirect(&with_notice("/leads", "Select at least one lead."));
    }
    if change.status.is_none() && change.assignee_id.is_none() {
        return redirect(&with_notice("/leads", "Choose a status or an owner to apply."));
    }

    let (report, updated) = ctx.store.bulk_update(&change, &viewer.id, now)?;
    ctx.sync_leads(&updated);
    info!(
        user_id = %viewer.id,
        changed = report.changed,
        unchanged = report.unchanged,
        unknown = report.unknown_ids.len() + hidden,
        "bulk update"
    );

    redirect(&with_notice(
        "/leads",
        &format!("Updated {} leads ({} unchanged).", report.changed, report.unchanged),
    ))
}

/// New lead from the UI. The form speaks the website field names, so it
/// goes through the same normalizer as web enquiries.
fn create_lead(mut req: Request, ctx: &AppContext, viewer: &User, now: NaiveDateTime) -> ResultResp {
    let pairs = form_pairs(&mut req)?;
    let users = ctx.store.users()?;
    let payload: Map<String, Value> = pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    let lead = match normalize(
        InboundSource::Website,
        &Value::Object(payload),
        &users,
        ctx.store.next_id("L"),
        now,
    ) {
        Ok(lead) => lead,
        Err(ServerError::Validation(msg)) => {
            return html_response(pages::new_lead_page(viewer, &users, Some(&msg)))
        }
        Err(e) => return Err(e),
    };

    let lead = ctx.store.add_lead(lead)?;
    info!(lead_id = %lead.id, user_id = %viewer.id, "lead created");
    ctx.sync_lead(&lead);
    redirect(&with_notice(&format!("/leads/{}", lead.id), "Lead created."))
}

fn import(mut req: Request, ctx: &AppContext, viewer: &User, now: NaiveDateTime) -> ResultResp {
    let is_raw_csv = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/csv"));

    let text = if is_raw_csv {
        read_body(&mut req)?
    } else {
        form_map(&mut req)?.remove("csv").unwrap_or_default()
    };

    let users = ctx.store.users()?;
    let outcome = match import_csv(&text, &users, &viewer.id, || ctx.store.next_id("L"), now) {
        Ok(outcome) => outcome,
        Err(ServerError::Validation(msg)) => return redirect(&with_notice("/import", &msg)),
        Err(e) => return Err(e),
    };

    let skipped = outcome.skipped;
    let imported = ctx.store.import_leads(outcome.leads.clone())?;
    ctx.sync_leads(&outcome.leads);
    info!(user_id = %viewer.id, imported, skipped, "csv import");

    redirect(&with_notice(
        "/leads",
        &format!("Imported {imported} leads, skipped {skipped} rows."),
    ))
}

// === Tasks and team ===

fn tasks(req: &Request, ctx: &AppContext, viewer: &User, now: NaiveDateTime) -> ResultResp {
    let msg = parse_query(req).remove("msg");
    html_response(pages::tasks_page(
        viewer,
        &ctx.store.users()?,
        &ctx.store.tasks_for(viewer)?,
        now.date(),
        msg.as_deref(),
    ))
}

fn add_task(mut req: Request, ctx: &AppContext, viewer: &User) -> ResultResp {
    let form = form_map(&mut req)?;
    let title = form.get("title").map(String::as_str).unwrap_or("");
    let assignee = match field(&form, "assignee") {
        Some(id) if viewer.is_admin() => id,
        _ => viewer.id.clone(),
    };
    let due = field(&form, "due_date")
        .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
        .ok_or_else(|| ServerError::Validation("a due date (YYYY-MM-DD) is required".into()))?;

    ctx.store.add_task(title, &assignee, due)?;
    redirect(&with_notice("/tasks", "Task added."))
}

fn add_user(mut req: Request, ctx: &AppContext, viewer: &User) -> ResultResp {
    require_admin(viewer)?;
    let form = form_map(&mut req)?;
    let name = form.get("name").map(String::as_str).unwrap_or("");
    let role = field(&form, "role")
        .and_then(|r| Role::parse(&r))
        .ok_or_else(|| ServerError::Validation("choose a role".into()))?;
    let reports_to = field(&form, "reports_to");

    let user = ctx.store.add_user(name, role, reports_to.as_deref())?;
    info!(user_id = %user.id, role = ?user.role, "team member added");
    redirect(&with_notice("/users", &format!("{} added.", user.name)))
}
