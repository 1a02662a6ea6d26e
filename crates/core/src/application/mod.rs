// Application Layer - Use Cases and Business Logic

pub mod auth;
pub mod catalog;
pub mod queue_engine;
pub mod records;
pub mod seed;
pub mod session;

// Re-exports
pub use auth::{AuthService, RegisterRequest};
pub use catalog::{DashboardStats, ServiceCatalog};
pub use queue_engine::QueueEngine;
pub use records::Records;
pub use session::SessionGuard;
