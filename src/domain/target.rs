// src/domain/target.rs

use crate::domain::lead::{Lead, LeadStatus};
use crate::domain::user::{Role, User};
use serde::Serialize;

/// Booking target for one salesperson and how far they are against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTarget {
    pub salesperson_id: String,
    pub salesperson_name: String,
    pub target: u32,
    pub achieved: u32,
}

impl SalesTarget {
    pub fn percent(&self) -> u32 {
        if self.target == 0 {
            return 0;
        }
        (self.achieved * 100) / self.target
    }
}

/// Build one target per salesperson. `achieved` counts booked leads they own.
pub fn derive_sales_targets(users: &[User], leads: &[Lead], target: u32) -> Vec<SalesTarget> {
    users
        .iter()
        .filter(|u| u.role == Role::Salesperson)
        .map(|u| SalesTarget {
            salesperson_id: u.id.clone(),
            salesperson_name: u.name.clone(),
            target,
            achieved: count_bookings(leads, &u.id),
        })
        .collect()
}

pub fn count_bookings(leads: &[Lead], salesperson_id: &str) -> u32 {
    leads
        .iter()
        .filter(|l| l.assigned_salesperson_id == salesperson_id && l.status == LeadStatus::Booked)
        .count() as u32
}
