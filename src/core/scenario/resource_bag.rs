//=========================================================================
// Resource Bag
//=========================================================================
//
// One-shot, type-erased bag of initial resources handed to a scenario.
//
// Pattern:
//   setter ──insert<T>(key)──► ResourceBag ──initialize()──► scenario
//                                                 │ take<T>(key)
//                                                 ▼
//                                     dropped afterwards, used or not
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

//=== ResourceBag =========================================================

/// Keyed resources of arbitrary `Send` types, consumed by
/// [`Scenario::initialize`](super::Scenario::initialize).
///
/// # Examples
///
/// ```
/// use spritestep::core::scenario::ResourceBag;
///
/// let mut bag = ResourceBag::new().with("level", 3u32);
/// assert_eq!(bag.take::<u32>("level"), Some(3));
/// assert!(bag.is_empty());
/// ```
#[derive(Default)]
pub struct ResourceBag {
    items: HashMap<String, Box<dyn Any + Send>>,
}

impl ResourceBag {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Filling ----------------------------------------------------------

    /// Builder form of [`insert`](Self::insert).
    pub fn with<T: Send + 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert<T: Send + 'static>(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        if self.items.insert(key.clone(), Box::new(value)).is_some() {
            warn!(target: "scenario", "Resource {:?} was already present and has been replaced", key);
        }
    }

    //--- Consumption ------------------------------------------------------

    /// Removes and returns the resource under `key` if it has type `T`.
    ///
    /// A type mismatch leaves the entry in place and returns `None`.
    pub fn take<T: Send + 'static>(&mut self, key: &str) -> Option<T> {
        let boxed = self.items.remove(key)?;
        match boxed.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(original) => {
                warn!(
                    target: "scenario",
                    "Resource {:?} is not a {}",
                    key,
                    std::any::type_name::<T>()
                );
                self.items.insert(key.to_owned(), original);
                None
            }
        }
    }

    /// Borrows the resource under `key` if it has type `T`.
    pub fn get<T: Send + 'static>(&self, key: &str) -> Option<&T> {
        self.items.get(key).and_then(|item| item.downcast_ref::<T>())
    }

    //--- Query API --------------------------------------------------------

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

impl fmt::Debug for ResourceBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.keys()).finish()
    }
}

impl Drop for ResourceBag {
    fn drop(&mut self) {
        if !self.items.is_empty() {
            debug!(target: "scenario", "Discarding {} unused resources", self.items.len());
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
