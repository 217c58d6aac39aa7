//! Core use-case services.
//!
//! # Responsibility
//! - Sequence one Store read and at most one Store write per operation.
//! - Translate repository failures into the caller-facing [`ServiceError`]
//!   taxonomy so Store-specific error shapes never leak upward.
//!
//! # Invariants
//! - Services never retry; [`ServiceError::is_retryable`] tells the caller
//!   when a bounded retry is safe.
//! - Services stay storage-agnostic: they depend on repository traits only.

use crate::model::ValidationError;
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod conversation_service;
pub mod event_service;
pub mod habit_service;
pub mod journal_service;
pub mod note_service;
pub mod plan_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing failure categories.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed a precondition, or the Store rejected it. Not retryable.
    Validation(ValidationError),
    /// Entity is missing or belongs to another owner. Not retryable.
    NotFound(Uuid),
    /// Infrastructure failure, or a Store response the core does not
    /// recognize. Retryable.
    TransientStore(RepoError),
}

impl ServiceError {
    /// True only for [`ServiceError::TransientStore`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::NotFound(id) => write!(f, "not found: {id}"),
            Self::TransientStore(err) => write!(f, "store unavailable: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::TransientStore(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Constraint(message) => Self::Validation(ValidationError::Rejected(message)),
            RepoError::DuplicateCompletion { habit, day } => Self::Validation(
                ValidationError::Rejected(format!("habit {habit} already completed on {day}")),
            ),
            other => Self::TransientStore(other),
        }
    }
}

/// Stable error code for logs.
fn error_code(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Validation(_) => "validation",
        ServiceError::NotFound(_) => "not_found",
        ServiceError::TransientStore(_) => "transient_store",
    }
}

/// Converts a failure into [`ServiceError`] and logs it as `status=error`.
pub(crate) fn logged<E: Into<ServiceError>>(
    module: &'static str,
    event: &'static str,
) -> impl Fn(E) -> ServiceError {
    move |err| {
        let err = err.into();
        warn!(
            "event={event} module={module} status=error error_code={} retryable={}",
            error_code(&err),
            err.is_retryable()
        );
        err
    }
}
