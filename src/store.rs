//! Request-scoped key-value scratch store.
//!
//! Lets an early handler hand data to a later one (a loaded user, a parsed
//! token) without either knowing about the other. Values are type-erased;
//! readers name the type they expect.

use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// String-keyed storage for arbitrary values, living as long as one request.
///
/// [`set`](Store::set) never overwrites; [`force_set`](Store::force_set)
/// always does.
#[derive(Default)]
pub struct Store {
    entries: HashMap<String, Box<dyn Any + Send>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` unless the key is already present.
    ///
    /// Returns `false` and leaves the existing value untouched when it is.
    pub fn set<V: Any + Send>(&mut self, key: impl Into<String>, value: V) -> bool {
        match self.entries.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Box::new(value));
                true
            }
        }
    }

    /// Stores `value` under `key`, replacing whatever was there.
    pub fn force_set<V: Any + Send>(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Returns the value under `key` if present and of type `V`.
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.entries.get(key)?.downcast_ref()
    }

    pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)?.downcast_mut()
    }

    /// Whether `key` holds a value of any type.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`. Absent keys are ignored.
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
