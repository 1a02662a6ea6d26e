// Domain Layer - Pure business logic and entities

pub mod error;
pub mod principal;
pub mod queue;
pub mod service;
pub mod validate;

// Re-exports
pub use error::{DomainError, FieldError};
pub use principal::{Principal, Role, UserAccount};
pub use queue::{QueueEntry, QueueMap, QueueStats};
pub use service::{Priority, Service, ServiceDraft, ServiceId, ServiceStatus};
