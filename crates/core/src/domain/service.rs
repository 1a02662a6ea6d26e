// Service Domain Model

use crate::domain::error::{DomainError, FieldError};
use serde::{Deserialize, Serialize};

/// Service ID (monotonic integer, assigned by the catalog)
pub type ServiceId = i64;

/// Per-service priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Open services accept new queue entries; closed services are hidden from
/// the join selector but keep their existing waitlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Open,
    Closed,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Open => write!(f, "open"),
            ServiceStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Service Entity
///
/// `duration` is the per-person service-time estimate in minutes and feeds
/// the queue wait estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub duration: i64,
    pub priority: Priority,
    pub status: ServiceStatus,
}

impl Service {
    /// Create a new open service from validated fields.
    ///
    /// `id` is injected by the catalog (max existing + 1), never generated
    /// here.
    pub fn new(id: ServiceId, fields: ServiceFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            duration: fields.duration,
            priority: fields.priority,
            status: ServiceStatus::Open,
        }
    }

    /// Overwrite all mutable fields. Status is untouched; only
    /// `ServiceCatalog::toggle_status` changes it.
    pub fn apply(&mut self, fields: ServiceFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.duration = fields.duration;
        self.priority = fields.priority;
    }
}

/// Draft input for create/update, as it arrives from a form.
///
/// `None` models a field the user left unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    pub duration: Option<i64>,
    pub priority: Option<Priority>,
}

/// The validated, trimmed output of [`ServiceDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceFields {
    pub name: String,
    pub description: String,
    pub duration: i64,
    pub priority: Priority,
}

pub const MAX_NAME_LEN: usize = 100;
pub const MIN_DURATION_MINUTES: i64 = 1;
pub const MAX_DURATION_MINUTES: i64 = 480;

impl ServiceDraft {
    /// Validate every field, collecting one [`FieldError`] per violation so
    /// the caller can surface all of them at once.
    pub fn validate(&self) -> Result<ServiceFields, DomainError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Service name is required."));
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                "Name must be 100 characters or fewer.",
            ));
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push(FieldError::new("description", "Description is required."));
        }

        match self.duration {
            None => {
                errors.push(FieldError::new("duration", "Duration is required."));
            }
            Some(d) if d < MIN_DURATION_MINUTES => {
                errors.push(FieldError::new(
                    "duration",
                    "Duration must be at least 1 minute.",
                ));
            }
            Some(d) if d > MAX_DURATION_MINUTES => {
                errors.push(FieldError::new(
                    "duration",
                    "Duration cannot exceed 480 minutes (8 hours).",
                ));
            }
            Some(_) => {}
        }

        if self.priority.is_none() {
            errors.push(FieldError::new(
                "priority",
                "Please select a priority level.",
            ));
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        // both are Some once the error list is empty
        match (self.duration, self.priority) {
            (Some(duration), Some(priority)) => Ok(ServiceFields {
                name: name.to_string(),
                description: description.to_string(),
                duration,
                priority,
            }),
            _ => Err(DomainError::Validation(vec![])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, description: &str, duration: Option<i64>) -> ServiceDraft {
        ServiceDraft {
            name: name.to_string(),
            description: description.to_string(),
            duration,
            priority: Some(Priority::High),
        }
    }

    #[test]
    fn test_valid_draft_is_trimmed() {
        let fields = draft("  Passport Renewal  ", " Renew a passport. ", Some(20))
            .validate()
            .expect("valid");
        assert_eq!(fields.name, "Passport Renewal");
        assert_eq!(fields.description, "Renew a passport.");
        assert_eq!(fields.duration, 20);
    }

    #[test]
    fn test_blank_name_cites_only_the_name_field() {
        let err = draft("", "x", Some(20)).validate().unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "name");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let empty = ServiceDraft::default();
        let err = empty.validate().unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "description", "duration", "priority"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_name_length_cap() {
        assert!(draft(&"a".repeat(100), "x", Some(20)).validate().is_ok());
        assert!(draft(&"a".repeat(101), "x", Some(20)).validate().is_err());
    }

    #[test]
    fn test_duration_bounds() {
        assert!(draft("a", "x", Some(1)).validate().is_ok());
        assert!(draft("a", "x", Some(480)).validate().is_ok());
        assert!(draft("a", "x", Some(0)).validate().is_err());
        assert!(draft("a", "x", Some(481)).validate().is_err());
    }

    #[test]
    fn test_update_leaves_status_alone() {
        let mut service = Service::new(
            1,
            draft("Old", "old", Some(10)).validate().expect("valid"),
        );
        service.status = ServiceStatus::Closed;

        service.apply(draft("New", "new", Some(30)).validate().expect("valid"));
        assert_eq!(service.name, "New");
        assert_eq!(service.duration, 30);
        assert_eq!(service.status, ServiceStatus::Closed);
    }
}
