use microblog_domain::validation::ValidationErrors;

/// Microblog domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum MicroblogError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("user not found")]
    UserNotFound,
    #[error("micropost not found")]
    MicropostNotFound,
    #[error("relationship not found")]
    RelationshipNotFound,
    #[error("already following")]
    AlreadyFollowing,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MicroblogError {
    /// Wrap an unexpected failure as [`MicroblogError::Internal`]. Every
    /// internal error is built here, so this is where it gets logged.
    pub fn internal<E>(err: E, what: &'static str) -> Self
    where
        E: Into<anyhow::Error>,
    {
        let err = err.into().context(what);
        tracing::error!(error = ?err, kind = "INTERNAL", "internal error");
        Self::Internal(err)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MicropostNotFound => "MICROPOST_NOT_FOUND",
            Self::RelationshipNotFound => "RELATIONSHIP_NOT_FOUND",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Constraint(_) => "CONSTRAINT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// The collected field errors, when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

}
