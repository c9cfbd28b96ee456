// src/domain/task.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A to-do owned by a single user. Tasks are not linked to leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub assignee_id: String,
    pub due_date: NaiveDate,
    pub completed: bool,
}

impl Task {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }
}
