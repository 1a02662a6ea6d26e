// Queue Engine - ordered waitlists, one per service

use crate::application::records::Records;
use crate::domain::validate::is_valid_email;
use crate::domain::{self, DomainError, FieldError, QueueEntry, QueueStats, Service, ServiceId};
use crate::error::Result;
use crate::port::{Notice, NotificationSink, TimeProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Owns the per-service waitlists.
///
/// Every operation resolves the service id against the catalog record
/// first; an id with no catalog entry fails with `UnknownService`. A known
/// service with no queue record reads as an empty queue. Entries are
/// identified purely by position - there is no stable entry id.
pub struct QueueEngine {
    records: Records,
    time_provider: Arc<dyn TimeProvider>,
    sink: Arc<dyn NotificationSink>,
}

impl QueueEngine {
    pub fn new(
        records: Records,
        time_provider: Arc<dyn TimeProvider>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            records,
            time_provider,
            sink,
        }
    }

    fn require_service(&self, service_id: ServiceId) -> Result<Service> {
        self.records
            .services()
            .into_iter()
            .find(|s| s.id == service_id)
            .ok_or_else(|| DomainError::UnknownService(service_id).into())
    }

    /// Snapshot of the waitlist, front first, for rendering.
    pub fn entries(&self, service_id: ServiceId) -> Result<Vec<QueueEntry>> {
        self.require_service(service_id)?;
        Ok(self
            .records
            .queues()
            .remove(&service_id)
            .unwrap_or_default())
    }

    /// Append a person to the tail of the waitlist.
    pub fn enqueue(&self, service_id: ServiceId, name: &str, email: &str) -> Result<QueueEntry> {
        let mut errors = Vec::new();
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required."));
        }
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required."));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(
                "email",
                "Please enter a valid email address.",
            ));
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors).into());
        }

        self.require_service(service_id)?;
        let entry = QueueEntry::new(name, email, self.time_provider.now_millis());

        let mut queues = self.records.queues();
        let len = {
            let queue = queues.entry(service_id).or_default();
            queue.push(entry.clone());
            queue.len()
        };
        self.records.save_queues(&queues)?;

        info!(service_id = %service_id, queue_len = %len, "entry enqueued");
        self.sink
            .notify(&format!("{} joined the queue.", entry.name), Notice::Success);
        Ok(entry)
    }

    /// Remove and return the head of the waitlist.
    pub fn serve_next(&self, service_id: ServiceId) -> Result<QueueEntry> {
        self.require_service(service_id)?;

        let mut queues = self.records.queues();
        let served = {
            let queue = queues.entry(service_id).or_default();
            if queue.is_empty() {
                return Err(DomainError::EmptyQueue(service_id).into());
            }
            queue.remove(0)
        };
        self.records.save_queues(&queues)?;

        info!(service_id = %service_id, name = %served.name, "entry served");
        self.sink
            .notify(&format!("Now serving: {}", served.name), Notice::Success);
        Ok(served)
    }

    /// Swap the entry at `index` with the one in front of it. Already at
    /// the front (or out of range) is a defended no-op, not an error.
    pub fn move_up(&self, service_id: ServiceId, index: usize) -> Result<()> {
        if index == 0 {
            self.require_service(service_id)?;
            return Ok(());
        }
        self.reorder(service_id, index, index - 1)
    }

    /// Swap the entry at `index` with the one behind it. Already at the
    /// back (or out of range) is a defended no-op, not an error.
    pub fn move_down(&self, service_id: ServiceId, index: usize) -> Result<()> {
        self.reorder(service_id, index, index + 1)
    }

    /// Remove the entry at `from` and reinsert it at `to` in the same
    /// sequence. `to` is bounds-checked against the pre-removal length;
    /// out-of-range (either index) is silently ignored rather than raised.
    pub fn reorder(&self, service_id: ServiceId, from: usize, to: usize) -> Result<()> {
        self.require_service(service_id)?;

        let mut queues = self.records.queues();
        let changed = {
            let queue = queues.entry(service_id).or_default();
            if from >= queue.len() || to >= queue.len() || from == to {
                debug!(
                    service_id = %service_id,
                    from = %from,
                    to = %to,
                    len = %queue.len(),
                    "reorder ignored"
                );
                false
            } else {
                let entry = queue.remove(from);
                queue.insert(to, entry);
                true
            }
        };
        if changed {
            self.records.save_queues(&queues)?;
        }
        Ok(())
    }

    /// Delete and return the entry at `index`.
    pub fn remove_at(&self, service_id: ServiceId, index: usize) -> Result<QueueEntry> {
        self.require_service(service_id)?;

        let mut queues = self.records.queues();
        let removed = {
            let queue = queues.entry(service_id).or_default();
            if index >= queue.len() {
                return Err(DomainError::IndexOutOfRange {
                    index,
                    len: queue.len(),
                }
                .into());
            }
            queue.remove(index)
        };
        self.records.save_queues(&queues)?;

        info!(service_id = %service_id, name = %removed.name, "entry removed");
        self.sink.notify(
            &format!("{} removed from queue.", removed.name),
            Notice::Info,
        );
        Ok(removed)
    }

    /// Queue length and estimated total wait (`count * duration`); no
    /// estimate when nobody is waiting.
    pub fn stats(&self, service_id: ServiceId) -> Result<QueueStats> {
        let service = self.require_service(service_id)?;
        let count = self
            .records
            .queues()
            .get(&service_id)
            .map(|q| q.len())
            .unwrap_or(0);

        Ok(QueueStats {
            count,
            estimated_wait_minutes: (count > 0).then(|| count as i64 * service.duration),
        })
    }

    /// Whole minutes `entry` has waited so far, against the injected clock.
    pub fn waited_minutes(&self, entry: &QueueEntry) -> i64 {
        domain::queue::waited_minutes(entry, self.time_provider.now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, ServiceDraft};
    use crate::port::NullSink;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemStore {
        cells: Mutex<HashMap<String, String>>,
    }

    impl crate::port::StateStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Option<String>> {
            Ok(self.cells.lock().expect("lock").get(key).cloned())
        }

        fn save_raw(&self, key: &str, value: &str) -> Result<()> {
            self.cells
                .lock()
                .expect("lock")
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.cells.lock().expect("lock").remove(key);
            Ok(())
        }
    }

    struct FixedTimeProvider {
        current_time: i64,
    }

    impl TimeProvider for FixedTimeProvider {
        fn now_millis(&self) -> i64 {
            self.current_time
        }
    }

    fn engine_with_service(duration: i64) -> (QueueEngine, ServiceId) {
        let records = Records::new(Arc::new(MemStore {
            cells: Mutex::new(HashMap::new()),
        }));
        let catalog =
            crate::application::ServiceCatalog::new(records.clone(), Arc::new(NullSink));
        let service = catalog
            .create(ServiceDraft {
                name: "Title Transfer".to_string(),
                description: "Transfer a vehicle title.".to_string(),
                duration: Some(duration),
                priority: Some(Priority::Medium),
            })
            .expect("create");

        let engine = QueueEngine::new(
            records,
            Arc::new(FixedTimeProvider {
                current_time: 1_000_000,
            }),
            Arc::new(NullSink),
        );
        (engine, service.id)
    }

    fn names(engine: &QueueEngine, id: ServiceId) -> Vec<String> {
        engine
            .entries(id)
            .expect("entries")
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    #[test]
    fn test_enqueue_is_fifo() {
        let (engine, id) = engine_with_service(20);
        for name in ["Alice", "Bob", "Carol"] {
            engine
                .enqueue(id, name, &format!("{}@example.com", name.to_lowercase()))
                .expect("enqueue");
        }

        assert_eq!(names(&engine, id), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(engine.serve_next(id).expect("serve").name, "Alice");
        assert_eq!(engine.serve_next(id).expect("serve").name, "Bob");
    }

    #[test]
    fn test_serve_next_on_empty_queue() {
        let (engine, id) = engine_with_service(20);
        match engine.serve_next(id) {
            Err(crate::error::AppError::Domain(DomainError::EmptyQueue(sid))) => {
                assert_eq!(sid, id)
            }
            other => panic!("expected EmptyQueue, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_service_is_rejected() {
        let (engine, id) = engine_with_service(20);
        match engine.enqueue(id + 99, "Dave", "dave@example.com") {
            Err(crate::error::AppError::Domain(DomainError::UnknownService(_))) => {}
            other => panic!("expected UnknownService, got {other:?}"),
        }
    }

    #[test]
    fn test_enqueue_requires_name_and_email() {
        let (engine, id) = engine_with_service(20);
        match engine.enqueue(id, "  ", "not-an-email") {
            Err(crate::error::AppError::Domain(DomainError::Validation(errors))) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "email"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_move_up_then_down_restores_order() {
        let (engine, id) = engine_with_service(20);
        for name in ["Alice", "Bob", "Carol"] {
            engine.enqueue(id, name, "person@example.com").expect("enqueue");
        }

        engine.move_up(id, 1).expect("move up");
        assert_eq!(names(&engine, id), vec!["Bob", "Alice", "Carol"]);
        engine.move_down(id, 0).expect("move down");
        assert_eq!(names(&engine, id), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_moves_at_the_boundaries_are_noops() {
        let (engine, id) = engine_with_service(20);
        for name in ["Alice", "Bob"] {
            engine.enqueue(id, name, "person@example.com").expect("enqueue");
        }

        engine.move_up(id, 0).expect("move up");
        engine.move_down(id, 1).expect("move down");
        engine.move_down(id, 5).expect("move down oob");
        assert_eq!(names(&engine, id), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_reorder_moves_within_the_same_sequence() {
        let (engine, id) = engine_with_service(20);
        for name in ["Alice", "Bob", "Carol", "Dave"] {
            engine.enqueue(id, name, "person@example.com").expect("enqueue");
        }

        engine.reorder(id, 3, 0).expect("reorder");
        assert_eq!(names(&engine, id), vec!["Dave", "Alice", "Bob", "Carol"]);

        // out-of-range target: silently ignored
        engine.reorder(id, 0, 4).expect("reorder oob");
        assert_eq!(names(&engine, id), vec!["Dave", "Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_remove_at_targets_exactly_one_entry() {
        let (engine, id) = engine_with_service(20);
        for name in ["Alice", "Bob", "Carol"] {
            engine.enqueue(id, name, "person@example.com").expect("enqueue");
        }

        let removed = engine.remove_at(id, 1).expect("remove");
        assert_eq!(removed.name, "Bob");
        assert_eq!(names(&engine, id), vec!["Alice", "Carol"]);

        match engine.remove_at(id, 2) {
            Err(crate::error::AppError::Domain(DomainError::IndexOutOfRange {
                index: 2,
                len: 2,
            })) => {}
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_stats_estimate() {
        let (engine, id) = engine_with_service(20);
        assert_eq!(
            engine.stats(id).expect("stats"),
            QueueStats {
                count: 0,
                estimated_wait_minutes: None
            }
        );

        for name in ["Alice", "Bob", "Carol"] {
            engine.enqueue(id, name, "person@example.com").expect("enqueue");
        }
        assert_eq!(
            engine.stats(id).expect("stats"),
            QueueStats {
                count: 3,
                estimated_wait_minutes: Some(60)
            }
        );
    }
}
