// Table rendering for services and queues

use queuesmart_core::domain::{QueueEntry, Service};
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct ServiceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
pub struct DashboardRow {
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Queue Length")]
    queue_length: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
pub struct QueueRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Wait Time")]
    wait: String,
}

pub fn service_row(service: &Service) -> ServiceRow {
    ServiceRow {
        id: service.id,
        name: service.name.clone(),
        description: service.description.clone(),
        duration: format!("{} min", service.duration),
        priority: service.priority.to_string(),
        status: service.status.to_string(),
    }
}

pub fn dashboard_row(service: &Service, queue_length: usize) -> DashboardRow {
    let people = if queue_length == 1 { "person" } else { "people" };
    DashboardRow {
        name: service.name.clone(),
        queue_length: format!("{queue_length} {people}"),
        status: service.status.to_string(),
    }
}

pub fn queue_row(position: usize, entry: &QueueEntry, waited_minutes: i64) -> QueueRow {
    QueueRow {
        position,
        name: entry.name.clone(),
        email: entry.email.clone(),
        wait: wait_label(waited_minutes),
    }
}

/// "< 1 min" under a minute, "N min" otherwise
pub fn wait_label(minutes: i64) -> String {
    if minutes > 0 {
        format!("{minutes} min")
    } else {
        "< 1 min".to_string()
    }
}

pub fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).to_string()
}
