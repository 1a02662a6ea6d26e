// Domain Error Types

use crate::domain::principal::Role;
use crate::domain::service::ServiceId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure.
///
/// Validation collects one of these per invalid field so the caller can
/// display every violation at once instead of stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Service not found: {0}")]
    ServiceNotFound(ServiceId),

    #[error("Unknown service: {0}")]
    UnknownService(ServiceId),

    #[error("Queue for service {0} is empty")]
    EmptyQueue(ServiceId),

    #[error("Index {index} out of range for queue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Requires {required} role")]
    Forbidden { required: Role },
}

pub type Result<T> = std::result::Result<T, DomainError>;
