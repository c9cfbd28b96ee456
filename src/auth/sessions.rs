// src/auth/sessions.rs
use crate::auth::token::{hash_token, new_session_token, TokenHash};
use crate::errors::ServerError;
use std::collections::HashMap;
use std::sync::Mutex;

/// 7 days
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    expires_at: i64,
}

/// Login sessions keyed by the SHA-256 of the cookie token.
/// Like everything else in the CRM they live for the process lifetime.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<TokenHash, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self, user_id: &str, now: i64) -> Result<String, ServerError> {
        let raw_token = new_session_token();
        let mut sessions = self.sessions.lock().map_err(|_| ServerError::InternalError)?;

        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            hash_token(&raw_token),
            Session {
                user_id: user_id.to_string(),
                expires_at: now + SESSION_TTL_SECS,
            },
        );
        Ok(raw_token)
    }

    /// User id behind a live session token, if any.
    pub fn load_user(&self, raw_token: &str, now: i64) -> Result<Option<String>, ServerError> {
        let sessions = self.sessions.lock().map_err(|_| ServerError::InternalError)?;
        Ok(sessions
            .get(&hash_token(raw_token))
            .filter(|s| s.expires_at > now)
            .map(|s| s.user_id.clone()))
    }

    pub fn revoke(&self, raw_token: &str) -> Result<(), ServerError> {
        let mut sessions = self.sessions.lock().map_err(|_| ServerError::InternalError)?;
        sessions.remove(&hash_token(raw_token));
        Ok(())
    }
}

/// Pull `session=<token>` out of a Cookie header.
pub fn session_cookie(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == "session")
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}
