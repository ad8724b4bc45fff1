use sea_orm::DbErr;
use thiserror::Error;

pub const BLANK: &str = "can't be blank";
pub const INVALID: &str = "is invalid";
pub const TAKEN: &str = "is already taken.";

#[derive(Debug, Error)]
pub enum AppError {
    // field-level failures, surfaced verbatim to API clients
    #[error("{field} {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },
    #[error("not found")]
    NotFound,

    // auth failures; never carry secret material
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,

    // infra things
    #[error(transparent)]
    Db(DbErr),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbErr> for AppError {
    fn from(e: DbErr) -> Self {
        AppError::from_db(e)
    }
}

impl AppError {
    pub fn blank(field: &'static str) -> Self {
        AppError::Validation {
            field,
            message: BLANK,
        }
    }

    pub fn invalid(field: &'static str) -> Self {
        AppError::Validation {
            field,
            message: INVALID,
        }
    }

    pub fn taken(field: &'static str) -> Self {
        AppError::Validation {
            field,
            message: TAKEN,
        }
    }

    fn from_db(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(_) => AppError::NotFound,
            _ => AppError::Db(err),
        }
    }
}
