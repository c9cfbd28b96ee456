use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, validation, missing resources) or downstream layers (DB, sheets).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Sheet backend error: {0}")]
    SheetError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::Validation(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::DbError(_)
            | ServerError::XlsxError(_)
            | ServerError::SheetError(_)
            | ServerError::InternalError => 500,
        }
    }

    /// Message safe to show to a caller.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::BadRequest(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
