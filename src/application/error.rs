use thiserror::Error;

use crate::domain::ClientId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("client id and amount are required")]
    MissingField,

    #[error("client name is required")]
    MissingName,

    #[error("client id must be a positive integer, got '{0}'")]
    InvalidClientId(String),

    #[error("amount must be a positive number, got '{0}'")]
    InvalidAmount(String),

    #[error("cap must be a non-negative amount, got '{0}'")]
    InvalidCap(String),

    #[error("payment date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),

    #[error("month selector must be YYYY-MM, got '{0}'")]
    InvalidMonth(String),

    #[error("client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, for callers that must distinguish
    /// rejections without parsing messages.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingField => "missing_field",
            AppError::MissingName => "missing_name",
            AppError::InvalidClientId(_) => "invalid_client_id",
            AppError::InvalidAmount(_) => "invalid_amount",
            AppError::InvalidCap(_) => "invalid_cap",
            AppError::InvalidDate(_) => "invalid_date",
            AppError::InvalidMonth(_) => "invalid_month",
            AppError::ClientNotFound(_) => "client_not_found",
            AppError::Store(_) => "store_error",
        }
    }

    /// Expected, recoverable rejections as opposed to store failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AppError::Store(_))
    }
}
