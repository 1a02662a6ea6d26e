// State Store Port (Interface)

use crate::error::Result;

/// Key-value store interface for persisted records.
///
/// The store is synchronous and best-effort: it may be absent, cleared
/// externally, or hold corrupted values. Callers own the degrade-to-default
/// policy; the store only moves raw strings. There is no transactional
/// guarantee across keys.
pub trait StateStore: Send + Sync {
    /// Read the raw value under `key`, if present.
    fn load_raw(&self, key: &str) -> Result<Option<String>>;

    /// Persist `value` under `key`, overwriting prior content.
    fn save_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` entirely. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}
