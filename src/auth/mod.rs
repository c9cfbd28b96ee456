pub mod sessions;
pub mod token;

pub use sessions::{session_cookie, SessionStore};
pub use token::secrets_match;
