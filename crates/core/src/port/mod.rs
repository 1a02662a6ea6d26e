// Port Layer - Interfaces for external dependencies

pub mod notification_sink;
pub mod state_store;
pub mod time_provider;

// Re-exports
pub use notification_sink::{LogSink, Notice, NotificationSink, NullSink};
pub use state_store::StateStore;
pub use time_provider::{SystemTimeProvider, TimeProvider};
