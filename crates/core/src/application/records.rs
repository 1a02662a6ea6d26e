// Persistent Records - typed load/save over the raw key-value store

use crate::domain::{Principal, QueueMap, Service, UserAccount};
use crate::error::Result;
use crate::port::StateStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

// Storage keys, shared with any other client of the same store
pub const SERVICES_KEY: &str = "qs_services";
pub const QUEUES_KEY: &str = "qs_queues";
pub const SESSION_KEY: &str = "qs_currentUser";
pub const USERS_KEY: &str = "qs_users";

/// Typed access to the persisted records.
///
/// Loads degrade to the empty default when a key is absent or its value
/// fails to parse; corruption is logged but never surfaced to the caller.
/// Saves serialize and overwrite unconditionally. The records are
/// independent keys with no cross-key transaction; invariants spanning two
/// records are enforced by the services issuing both writes together.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn StateStore>,
}

impl Records {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Whether `key` holds any value at all, even an unparsable one.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.store.load_raw(key), Ok(Some(_)))
    }

    fn load_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.store.load_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!(key = %key, error = %err, "store read failed, substituting empty default");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "corrupt record, substituting empty default");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.save_raw(key, &raw)
    }

    pub fn services(&self) -> Vec<Service> {
        self.load_or_default(SERVICES_KEY)
    }

    pub fn save_services(&self, services: &[Service]) -> Result<()> {
        self.save(SERVICES_KEY, &services)
    }

    pub fn queues(&self) -> QueueMap {
        self.load_or_default(QUEUES_KEY)
    }

    pub fn save_queues(&self, queues: &QueueMap) -> Result<()> {
        self.save(QUEUES_KEY, queues)
    }

    pub fn session(&self) -> Option<Principal> {
        self.load_or_default(SESSION_KEY)
    }

    pub fn save_session(&self, principal: &Principal) -> Result<()> {
        self.save(SESSION_KEY, principal)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.store.remove(SESSION_KEY)
    }

    pub fn users(&self) -> Vec<UserAccount> {
        self.load_or_default(USERS_KEY)
    }

    pub fn save_users(&self, users: &[UserAccount]) -> Result<()> {
        self.save(USERS_KEY, &users)
    }
}
