// src/domain/user.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    SalesManager,
    Salesperson,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::SalesManager => "Sales Manager",
            Role::Salesperson => "Salesperson",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "admin" => Some(Role::Admin),
            "salesmanager" | "manager" => Some(Role::SalesManager),
            "salesperson" | "sales" => Some(Role::Salesperson),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Direct manager. The hierarchy is a single level deep.
    pub reports_to: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this user may see leads owned by `owner_id`.
    pub fn can_view_owner(&self, owner_id: &str, users: &[User]) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Salesperson => self.id == owner_id,
            Role::SalesManager => {
                self.id == owner_id
                    || users
                        .iter()
                        .any(|u| u.id == owner_id && u.reports_to.as_deref() == Some(&self.id))
            }
        }
    }
}

/// Case-insensitive lookup by id or display name.
pub fn find_user<'a>(users: &'a [User], needle: &str) -> Option<&'a User> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    users
        .iter()
        .find(|u| u.id == needle)
        .or_else(|| users.iter().find(|u| u.name.eq_ignore_ascii_case(needle)))
}

/// The owner cancelled leads are handed back to: the first Admin, or the
/// first user at all when no Admin exists.
pub fn default_owner(users: &[User]) -> Option<&User> {
    users.iter().find(|u| u.is_admin()).or_else(|| users.first())
}

/// Fallback owner for new inbound leads: Admin, else first Salesperson,
/// else first user.
pub fn intake_owner(users: &[User]) -> Option<&User> {
    users
        .iter()
        .find(|u| u.is_admin())
        .or_else(|| users.iter().find(|u| u.role == Role::Salesperson))
        .or_else(|| users.first())
}
