// Demo Seed Data - first-run fixture, mirrors a fresh deployment

use crate::application::records::{Records, QUEUES_KEY, SERVICES_KEY};
use crate::domain::{Priority, QueueEntry, QueueMap, Service, ServiceStatus};
use crate::error::{AppError, Result};
use tracing::info;

/// Seed the demo catalog and queues on first run.
///
/// Each record is seeded only while its key is entirely absent from the
/// store; existing data, including data that no longer parses, is never
/// overwritten.
pub fn init_demo_data(records: &Records) -> Result<()> {
    if !records.contains(SERVICES_KEY) {
        records.save_services(&default_services())?;
        info!("seeded demo services");
    }
    if !records.contains(QUEUES_KEY) {
        records.save_queues(&default_queues()?)?;
        info!("seeded demo queues");
    }
    Ok(())
}

fn service(
    id: i64,
    name: &str,
    description: &str,
    duration: i64,
    priority: Priority,
    status: ServiceStatus,
) -> Service {
    Service {
        id,
        name: name.to_string(),
        description: description.to_string(),
        duration,
        priority,
        status,
    }
}

fn default_services() -> Vec<Service> {
    vec![
        service(
            1,
            "Driver's License Renewal",
            "Renew an expired or expiring driver's license at the DMV counter.",
            20,
            Priority::High,
            ServiceStatus::Open,
        ),
        service(
            2,
            "Vehicle Registration",
            "Register a new vehicle or transfer existing registration to a new owner.",
            15,
            Priority::Medium,
            ServiceStatus::Open,
        ),
        service(
            3,
            "ID Card Replacement",
            "Apply for a replacement state-issued identification card.",
            10,
            Priority::Low,
            ServiceStatus::Closed,
        ),
        service(
            4,
            "Title Transfer",
            "Transfer a vehicle title between owners with proper documentation.",
            25,
            Priority::Medium,
            ServiceStatus::Open,
        ),
    ]
}

fn entry(name: &str, email: &str, joined_at: &str) -> Result<QueueEntry> {
    let joined_at = chrono::NaiveDateTime::parse_from_str(joined_at, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| AppError::Internal(format!("bad seed timestamp {joined_at}: {e}")))?
        .and_utc()
        .timestamp_millis();
    Ok(QueueEntry::new(name, email, joined_at))
}

fn default_queues() -> Result<QueueMap> {
    let mut queues = QueueMap::new();
    queues.insert(
        1,
        vec![
            entry("Alice Johnson", "alice@example.com", "2026-02-20T09:15:00")?,
            entry("Bob Smith", "bob@example.com", "2026-02-20T09:22:00")?,
            entry("Carol Davis", "carol@example.com", "2026-02-20T09:30:00")?,
            entry("David Wilson", "david@example.com", "2026-02-20T09:45:00")?,
            entry("Eva Martinez", "eva@example.com", "2026-02-20T09:52:00")?,
        ],
    );
    queues.insert(
        2,
        vec![
            entry("Frank Brown", "frank@example.com", "2026-02-20T10:00:00")?,
            entry("Grace Lee", "grace@example.com", "2026-02-20T10:10:00")?,
            entry("Henry Nguyen", "henry@example.com", "2026-02-20T10:25:00")?,
        ],
    );
    queues.insert(3, Vec::new());
    queues.insert(
        4,
        vec![
            entry("Iris Cooper", "iris@example.com", "2026-02-20T10:30:00")?,
            entry("Jack Taylor", "jack@example.com", "2026-02-20T10:45:00")?,
        ],
    );
    Ok(queues)
}
