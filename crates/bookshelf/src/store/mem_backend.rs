use super::backend::{ChangeListener, StorageBackend, StorageEvent};
use crate::error::{CatalogError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct SharedState {
    entries: HashMap<String, String>,
    listeners: Vec<(usize, ChangeListener)>,
    next_handle: usize,
}

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the catalog is single-threaded.
/// Several handles can share one storage area through [`MemBackend::connect`]; a
/// write through one handle notifies the listeners of every *other* handle, the
/// way a browser tab sees storage events from its siblings but not from itself.
pub struct MemBackend {
    handle: usize,
    shared: Rc<RefCell<SharedState>>,
    simulate_write_error: RefCell<bool>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self {
            handle: 0,
            shared: Rc::new(RefCell::new(SharedState {
                next_handle: 1,
                ..SharedState::default()
            })),
            simulate_write_error: RefCell::new(false),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second handle on the same storage.
    pub fn connect(&self) -> Self {
        let handle = {
            let mut shared = self.shared.borrow_mut();
            let handle = shared.next_handle;
            shared.next_handle += 1;
            handle
        };
        Self {
            handle,
            shared: Rc::clone(&self.shared),
            simulate_write_error: RefCell::new(false),
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Delete `key`, notifying the other handles.
    pub fn remove(&self, key: &str) {
        let removed = self.shared.borrow_mut().entries.remove(key).is_some();
        if removed {
            self.notify_others(&StorageEvent {
                key: key.to_string(),
                new_value: None,
            });
        }
    }

    fn notify_others(&self, event: &StorageEvent) {
        // Clone the listeners out so a listener may touch the storage again.
        let listeners: Vec<ChangeListener> = self
            .shared
            .borrow()
            .listeners
            .iter()
            .filter(|(handle, _)| *handle != self.handle)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.shared.borrow().entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(CatalogError::Store("Simulated write error".to_string()));
        }

        self.shared
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());

        self.notify_others(&StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
        });
        Ok(())
    }

    fn on_external_change(&self, listener: ChangeListener) {
        self.shared
            .borrow_mut()
            .listeners
            .push((self.handle, listener));
    }
}
