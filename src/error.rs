use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{field} '{value}' is already taken")]
    Uniqueness { field: &'static str, value: String },

    #[error("{field} refers to missing row {id}")]
    Reference { field: &'static str, id: i32 },

    #[error("ORM error")]
    OrmError(#[from] DbErr),

    #[error("Internal Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing(field: &'static str) -> Self {
        AppError::Validation {
            field,
            reason: "field is required".into(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        AppError::NotFound { entity, id }
    }
}

/// Maps a unique-key violation reported by the store onto `Uniqueness`.
pub fn map_unique(err: DbErr, field: &'static str, value: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Uniqueness {
            field,
            value: value.to_string(),
        },
        _ => AppError::OrmError(err),
    }
}

/// Maps a foreign-key violation reported by the store onto `Reference`.
pub fn map_reference(err: DbErr, field: &'static str, id: i32) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::Reference { field, id },
        _ => AppError::OrmError(err),
    }
}

pub type AppResult<T> = Result<T, AppError>;
