use crate::error::Result;
use std::rc::Rc;

/// A change to a storage key made by someone other than the observing handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// The new raw value, or `None` when the key was removed.
    pub new_value: Option<String>,
}

pub type ChangeListener = Rc<dyn Fn(&StorageEvent)>;

/// Abstract interface for keyed string storage.
///
/// This trait handles the "how" of persistence (filesystem vs memory),
/// while BookStore handles the "what" (records, validation of stored data,
/// reconciliation with external writers).
pub trait StorageBackend {
    /// Read the raw value stored under `key`.
    /// Returns Ok(None) if nothing is stored there.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic: readers see either the old or the new value, never a mix.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Register a listener for changes made by other writers.
    ///
    /// Writes made through this handle never notify its own listeners.
    fn on_external_change(&self, listener: ChangeListener);
}
