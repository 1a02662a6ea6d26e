// Service Catalog - CRUD over service definitions

use crate::application::records::Records;
use crate::domain::{DomainError, Service, ServiceDraft, ServiceId, ServiceStatus};
use crate::error::Result;
use crate::port::{Notice, NotificationSink};
use std::sync::Arc;
use tracing::{debug, info};

/// Aggregate numbers for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_services: usize,
    pub open_services: usize,
    pub total_waiting: usize,
}

/// Owns the service catalog record and identifier assignment.
///
/// Creating a service initializes its (empty) queue in the same call so the
/// two records never diverge; deleting removes both.
pub struct ServiceCatalog {
    records: Records,
    sink: Arc<dyn NotificationSink>,
}

impl ServiceCatalog {
    pub fn new(records: Records, sink: Arc<dyn NotificationSink>) -> Self {
        Self { records, sink }
    }

    /// All services, stable order = storage order.
    pub fn list(&self) -> Vec<Service> {
        self.records.services()
    }

    pub fn get(&self, id: ServiceId) -> Result<Service> {
        self.records
            .services()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::ServiceNotFound(id).into())
    }

    /// Validate the draft, assign the next id and persist the new service
    /// together with its empty queue.
    ///
    /// Ids are max-existing + 1 (1 for an empty catalog), never
    /// count-derived, so they stay unique across deletions.
    pub fn create(&self, draft: ServiceDraft) -> Result<Service> {
        let fields = draft.validate()?;

        let mut services = self.records.services();
        let id = services.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let service = Service::new(id, fields);
        services.push(service.clone());

        let mut queues = self.records.queues();
        queues.insert(id, Vec::new());
        self.records.save_queues(&queues)?;
        self.records.save_services(&services)?;

        info!(service_id = %id, name = %service.name, "service created");
        self.sink
            .notify("Service created successfully.", Notice::Success);
        Ok(service)
    }

    /// Overwrite all mutable fields of an existing service. Status is left
    /// untouched; only [`toggle_status`](Self::toggle_status) changes it.
    pub fn update(&self, id: ServiceId, draft: ServiceDraft) -> Result<Service> {
        let fields = draft.validate()?;

        let mut services = self.records.services();
        let service = services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DomainError::ServiceNotFound(id))?;
        service.apply(fields);
        let updated = service.clone();
        self.records.save_services(&services)?;

        info!(service_id = %id, "service updated");
        self.sink
            .notify("Service updated successfully.", Notice::Success);
        Ok(updated)
    }

    /// Flip a service between open and closed.
    ///
    /// Closing hides the service from the join selector; its existing
    /// waitlist is preserved.
    pub fn toggle_status(&self, id: ServiceId) -> Result<Service> {
        let mut services = self.records.services();
        let service = services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DomainError::ServiceNotFound(id))?;

        service.status = match service.status {
            ServiceStatus::Open => ServiceStatus::Closed,
            ServiceStatus::Closed => ServiceStatus::Open,
        };
        let toggled = service.clone();
        self.records.save_services(&services)?;

        info!(service_id = %id, status = %toggled.status, "service status toggled");
        match toggled.status {
            ServiceStatus::Open => self
                .sink
                .notify(&format!("{} queue opened.", toggled.name), Notice::Success),
            ServiceStatus::Closed => self
                .sink
                .notify(&format!("{} queue closed.", toggled.name), Notice::Info),
        }
        Ok(toggled)
    }

    /// Remove a service and its queue record together. Deleting an unknown
    /// id is a silent no-op; deletion is idempotent.
    pub fn delete(&self, id: ServiceId) -> Result<()> {
        let mut services = self.records.services();
        let before = services.len();
        services.retain(|s| s.id != id);
        if services.len() == before {
            debug!(service_id = %id, "delete of unknown service ignored");
        }
        self.records.save_services(&services)?;

        let mut queues = self.records.queues();
        queues.remove(&id);
        self.records.save_queues(&queues)?;

        info!(service_id = %id, "service deleted");
        self.sink.notify("Service deleted.", Notice::Info);
        Ok(())
    }

    /// Totals shown on the admin dashboard.
    pub fn dashboard(&self) -> DashboardStats {
        let services = self.records.services();
        let queues = self.records.queues();

        DashboardStats {
            total_services: services.len(),
            open_services: services
                .iter()
                .filter(|s| s.status == ServiceStatus::Open)
                .count(),
            total_waiting: queues.values().map(|q| q.len()).sum(),
        }
    }
}
