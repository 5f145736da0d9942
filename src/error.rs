use sea_orm::DbErr;

/// Failures surfaced by the identity and track services.
///
/// `Internal` carries the underlying cause for server-side logging only; the
/// HTTP layer never echoes it to clients.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("username already taken")]
    DuplicateUsername,
    #[error("wallet address already registered")]
    DuplicateWallet,
    #[error("user not found")]
    UserNotFound,
    #[error("track not found")]
    TrackNotFound,
    #[error("gem already given to this track")]
    GemAlreadyGiven,
    #[error("gem allowance of {allowance} exhausted")]
    GemAllowanceExhausted { allowance: u32 },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
