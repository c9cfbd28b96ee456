// src/crm/store.rs

use crate::crm::bulk::{plan_bulk_update, BulkChange, BulkReport};
use crate::crm::lifecycle::{self, LeadUpdate};
use crate::domain::activity::newest_first;
use crate::domain::ids::IdGenerator;
use crate::domain::target::derive_sales_targets;
use crate::domain::user::{default_owner, find_user, Role};
use crate::domain::{Activity, ActivityDraft, ActivityType, Lead, LeadStatus, SalesTarget, Task, User};
use crate::errors::ServerError;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Everything the CRM holds for a session.
#[derive(Debug, Default, Clone)]
pub struct CrmState {
    pub users: Vec<User>,
    pub leads: Vec<Lead>,
    pub activities: Vec<Activity>,
    pub tasks: Vec<Task>,
    /// Monthly booking target given to every salesperson at load time.
    pub monthly_target: u32,
}

impl CrmState {
    fn lead_index(&self, id: &str) -> Result<usize, ServerError> {
        self.leads
            .iter()
            .position(|l| l.id == id)
            .ok_or(ServerError::NotFound)
    }
}

/// In-memory CRM store shared by all request handlers.
///
/// Reads hand back snapshots. Writes replace whole records under the write
/// lock, so a handler never sees a half-applied change.
pub struct CrmStore {
    state: RwLock<CrmState>,
    ids: IdGenerator,
}

impl CrmStore {
    pub fn new(state: CrmState) -> Self {
        Self {
            state: RwLock::new(state),
            ids: IdGenerator::new(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CrmState>, ServerError> {
        self.state.read().map_err(|_| ServerError::InternalError)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CrmState>, ServerError> {
        self.state.write().map_err(|_| ServerError::InternalError)
    }

    pub fn next_id(&self, prefix: &str) -> String {
        self.ids.next(prefix)
    }

    fn append_activity(&self, state: &mut CrmState, draft: ActivityDraft, now: NaiveDateTime) -> Activity {
        let activity = Activity {
            id: self.ids.next("A"),
            lead_id: draft.lead_id,
            salesperson_id: draft.salesperson_id,
            activity_type: draft.activity_type,
            timestamp: now,
            remarks: draft.remarks,
        };
        state.activities.push(activity.clone());
        activity
    }

    // === Reads ===

    pub fn users(&self) -> Result<Vec<User>, ServerError> {
        Ok(self.read()?.users.clone())
    }

    pub fn user(&self, id: &str) -> Result<User, ServerError> {
        self.read()?
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ServerError::NotFound)
    }

    /// Owner of cancelled leads: the first Admin, else the first user.
    pub fn admin_user(&self) -> Result<User, ServerError> {
        default_owner(&self.read()?.users)
            .cloned()
            .ok_or(ServerError::InternalError)
    }

    pub fn leads(&self) -> Result<Vec<Lead>, ServerError> {
        Ok(self.read()?.leads.clone())
    }

    /// Leads `viewer` is allowed to see given their role.
    pub fn visible_leads(&self, viewer: &User) -> Result<Vec<Lead>, ServerError> {
        let state = self.read()?;
        Ok(state
            .leads
            .iter()
            .filter(|l| viewer.can_view_owner(&l.assigned_salesperson_id, &state.users))
            .cloned()
            .collect())
    }

    pub fn lead(&self, id: &str) -> Result<Lead, ServerError> {
        let state = self.read()?;
        let idx = state.lead_index(id)?;
        Ok(state.leads[idx].clone())
    }

    pub fn activities_for_lead(&self, lead_id: &str) -> Result<Vec<Activity>, ServerError> {
        let state = self.read()?;
        let own: Vec<Activity> = state
            .activities
            .iter()
            .filter(|a| a.lead_id == lead_id)
            .cloned()
            .collect();
        Ok(newest_first(&own))
    }

    pub fn recent_activities(&self, viewer: &User, limit: usize) -> Result<Vec<Activity>, ServerError> {
        let state = self.read()?;
        let visible: Vec<Activity> = state
            .activities
            .iter()
            .filter(|a| {
                state.leads.iter().any(|l| {
                    l.id == a.lead_id
                        && viewer.can_view_owner(&l.assigned_salesperson_id, &state.users)
                })
            })
            .cloned()
            .collect();
        Ok(newest_first(&visible).into_iter().take(limit).collect())
    }

    /// Admins see every task, everyone else their own.
    pub fn tasks_for(&self, viewer: &User) -> Result<Vec<Task>, ServerError> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| viewer.is_admin() || t.assignee_id == viewer.id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.completed.cmp(&b.completed).then(a.due_date.cmp(&b.due_date)));
        Ok(tasks)
    }

    pub fn sales_targets(&self) -> Result<Vec<SalesTarget>, ServerError> {
        let state = self.read()?;
        Ok(derive_sales_targets(
            &state.users,
            &state.leads,
            state.monthly_target,
        ))
    }

    // === Lead mutations ===

    /// Store an edited lead, applying the lifecycle rules.
    pub fn update_lead(&self, proposed: Lead, actor_id: &str, now: NaiveDateTime) -> Result<Lead, ServerError> {
        let mut state = self.write()?;
        let idx = state.lead_index(&proposed.id)?;
        let LeadUpdate { lead, activity } =
            lifecycle::apply_lead_update(&state.leads[idx], proposed, &state.users, actor_id, now);

        state.leads[idx] = lead.clone();
        if let Some(draft) = activity {
            self.append_activity(&mut state, draft, now);
        }
        debug!(lead_id = %lead.id, status = ?lead.status, "lead updated");
        Ok(lead)
    }

    pub fn reschedule_visit(
        &self,
        lead_id: &str,
        new_date: NaiveDateTime,
        actor_id: &str,
        now: NaiveDateTime,
    ) -> Result<Lead, ServerError> {
        let mut state = self.write()?;
        let idx = state.lead_index(lead_id)?;
        let LeadUpdate { lead, activity } =
            lifecycle::reschedule_visit(&state.leads[idx], new_date, actor_id, now);

        state.leads[idx] = lead.clone();
        if let Some(draft) = activity {
            self.append_activity(&mut state, draft, now);
        }
        Ok(lead)
    }

    pub fn bulk_update(
        &self,
        change: &BulkChange,
        actor_id: &str,
        now: NaiveDateTime,
    ) -> Result<(BulkReport, Vec<Lead>), ServerError> {
        let mut state = self.write()?;
        let plan = plan_bulk_update(&state.leads, &state.users, change, actor_id, now)?;
        let report = BulkReport::from(&plan);

        for lead in &plan.updated {
            let idx = state.lead_index(&lead.id)?;
            state.leads[idx] = lead.clone();
        }
        for draft in plan.activities {
            self.append_activity(&mut state, draft, now);
        }
        debug!(changed = report.changed, unchanged = report.unchanged, "bulk update applied");
        Ok((report, plan.updated))
    }

    /// Log an interaction and stamp the lead with it.
    pub fn add_activity(
        &self,
        lead_id: &str,
        actor_id: &str,
        activity_type: ActivityType,
        remarks: &str,
        now: NaiveDateTime,
    ) -> Result<Activity, ServerError> {
        let remarks = remarks.trim();
        if remarks.is_empty() {
            return Err(ServerError::Validation("remarks are required".into()));
        }

        let mut state = self.write()?;
        let idx = state.lead_index(lead_id)?;
        {
            let lead = &mut state.leads[idx];
            lead.last_remark = Some(remarks.to_string());
            lead.last_activity_date = Some(now);
            lead.is_read = true;
        }

        let draft = ActivityDraft {
            lead_id: lead_id.to_string(),
            salesperson_id: actor_id.to_string(),
            activity_type,
            remarks: remarks.to_string(),
        };
        Ok(self.append_activity(&mut state, draft, now))
    }

    /// Hand a lead to another user. Reassigning to the current owner is a no-op.
    /// Cancelled leads stay with the default owner.
    pub fn assign_lead(
        &self,
        lead_id: &str,
        assignee: &str,
        actor_id: &str,
        now: NaiveDateTime,
    ) -> Result<Lead, ServerError> {
        let mut state = self.write()?;
        let new_owner = find_user(&state.users, assignee)
            .ok_or_else(|| ServerError::Validation(format!("unknown assignee '{assignee}'")))?
            .clone();
        let idx = state.lead_index(lead_id)?;
        if state.leads[idx].status == LeadStatus::Cancelled {
            return Err(ServerError::Validation(
                "cancelled leads stay with the default owner".into(),
            ));
        }

        let previous = state.leads[idx].assigned_salesperson_id.clone();
        if previous == new_owner.id {
            return Ok(state.leads[idx].clone());
        }

        let previous_name = lifecycle::display_name(&state.users, &previous);
        let lead = {
            let lead = &mut state.leads[idx];
            lead.assigned_salesperson_id = new_owner.id.clone();
            lead.last_activity_date = Some(now);
            lead.clone()
        };

        let draft = ActivityDraft::note(
            lead_id,
            actor_id,
            format!("Lead reassigned from {previous_name} to {}.", new_owner.name),
        );
        self.append_activity(&mut state, draft, now);
        Ok(lead)
    }

    pub fn mark_read(&self, lead_id: &str) -> Result<Lead, ServerError> {
        let mut state = self.write()?;
        let idx = state.lead_index(lead_id)?;
        state.leads[idx].is_read = true;
        Ok(state.leads[idx].clone())
    }

    /// Insert a lead built by the intake normalizer or the new-lead form.
    pub fn add_lead(&self, lead: Lead) -> Result<Lead, ServerError> {
        let mut state = self.write()?;
        if state.leads.iter().any(|l| l.id == lead.id) {
            return Err(ServerError::Validation(format!("duplicate lead id {}", lead.id)));
        }
        state.leads.push(lead.clone());
        Ok(lead)
    }

    /// Append imported leads in one write.
    pub fn import_leads(&self, leads: Vec<Lead>) -> Result<usize, ServerError> {
        let mut state = self.write()?;
        let count = leads.len();
        state.leads.extend(leads);
        Ok(count)
    }

    // === Tasks ===

    pub fn add_task(&self, title: &str, assignee_id: &str, due_date: NaiveDate) -> Result<Task, ServerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServerError::Validation("task title is required".into()));
        }

        let mut state = self.write()?;
        if !state.users.iter().any(|u| u.id == assignee_id) {
            return Err(ServerError::Validation(format!("unknown assignee '{assignee_id}'")));
        }
        let task = Task {
            id: self.ids.next("T"),
            title: title.to_string(),
            assignee_id: assignee_id.to_string(),
            due_date,
            completed: false,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    /// Flip a task's completion flag. Only the assignee or an admin may do so.
    pub fn toggle_task(&self, task_id: &str, viewer: &User) -> Result<Task, ServerError> {
        let mut state = self.write()?;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(ServerError::NotFound)?;
        if !viewer.is_admin() && task.assignee_id != viewer.id {
            return Err(ServerError::Unauthorized("not your task".into()));
        }
        task.completed = !task.completed;
        Ok(task.clone())
    }

    // === Users ===

    /// Add a team member. Reports go to a manager or admin, one level deep.
    pub fn add_user(&self, name: &str, role: Role, reports_to: Option<&str>) -> Result<User, ServerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServerError::Validation("name is required".into()));
        }

        let mut state = self.write()?;
        if state.users.iter().any(|u| u.name.eq_ignore_ascii_case(name)) {
            return Err(ServerError::Validation(format!("a user named '{name}' already exists")));
        }

        let reports_to = match reports_to.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(_) if role != Role::Salesperson => {
                return Err(ServerError::Validation(
                    "only salespeople report to a manager".into(),
                ))
            }
            Some(manager_id) => {
                let manager = state
                    .users
                    .iter()
                    .find(|u| u.id == manager_id)
                    .ok_or_else(|| ServerError::Validation(format!("unknown manager '{manager_id}'")))?;
                if manager.role == Role::Salesperson {
                    return Err(ServerError::Validation(
                        "a salesperson cannot manage others".into(),
                    ));
                }
                Some(manager.id.clone())
            }
        };

        let user = User {
            id: self.ids.next("U"),
            name: name.to_string(),
            role,
            reports_to,
        };
        state.users.push(user.clone());
        Ok(user)
    }
}
