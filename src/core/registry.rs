//! Thread-safe set of registered destinations

use super::destination::Destination;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identity of a destination: the address of its allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DestinationId(usize);

impl DestinationId {
    fn of<D: Destination + ?Sized>(destination: &Arc<D>) -> Self {
        DestinationId(Arc::as_ptr(destination) as *const () as usize)
    }
}

/// Set of destinations keyed by identity
///
/// Readers take a [`snapshot`](DestinationRegistry::snapshot) and iterate
/// it without holding the lock, so registering or removing destinations
/// while a dispatch pass is running never disturbs that pass.
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let registry = DestinationRegistry::new();
/// let memory = Arc::new(MemoryDestination::new().unwrap());
///
/// assert!(registry.add(memory.clone()));
/// assert!(!registry.add(memory.clone()));
/// assert_eq!(registry.count(), 1);
/// assert!(registry.remove(&memory));
/// assert!(!registry.remove(&memory));
/// ```
#[derive(Default)]
pub struct DestinationRegistry {
    destinations: RwLock<HashMap<DestinationId, Arc<dyn Destination>>>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination; `false` if it is already present
    pub fn add(&self, destination: Arc<dyn Destination>) -> bool {
        let id = DestinationId::of(&destination);
        let mut destinations = self.destinations.write();
        if destinations.contains_key(&id) {
            return false;
        }
        destinations.insert(id, destination);
        true
    }

    /// Unregister a destination; `false` if it was not present
    ///
    /// Accepts the concrete handle as well as `Arc<dyn Destination>`.
    pub fn remove<D: Destination + ?Sized>(&self, destination: &Arc<D>) -> bool {
        self.destinations
            .write()
            .remove(&DestinationId::of(destination))
            .is_some()
    }

    pub fn contains<D: Destination + ?Sized>(&self, destination: &Arc<D>) -> bool {
        self.destinations
            .read()
            .contains_key(&DestinationId::of(destination))
    }

    pub fn remove_all(&self) {
        self.destinations.write().clear();
    }

    pub fn count(&self) -> usize {
        self.destinations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.read().is_empty()
    }

    /// Consistent copy of the current membership
    ///
    /// Cloning the handles keeps every destination alive for as long as
    /// the snapshot is in use, even if it is removed meanwhile.
    pub fn snapshot(&self) -> Vec<Arc<dyn Destination>> {
        self.destinations.read().values().cloned().collect()
    }
}

impl fmt::Debug for DestinationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let destinations = self.destinations.read();
        f.debug_struct("DestinationRegistry")
            .field(
                "destinations",
                &destinations.values().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::MemoryDestination;

    #[test]
    fn test_add_is_idempotent() {
        let registry = DestinationRegistry::new();
        let memory = Arc::new(MemoryDestination::new().unwrap());

        assert!(registry.add(memory.clone()));
        assert!(!registry.add(memory.clone()));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_remove_missing_reports_false() {
        let registry = DestinationRegistry::new();
        let memory = Arc::new(MemoryDestination::new().unwrap());
        assert!(!registry.remove(&memory));
    }

    #[test]
    fn test_remove_through_trait_object() {
        let registry = DestinationRegistry::new();
        let handle: Arc<dyn Destination> = Arc::new(MemoryDestination::new().unwrap());

        registry.add(Arc::clone(&handle));
        assert!(registry.contains(&handle));
        assert!(registry.remove(&handle));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_distinct_instances_are_distinct_members() {
        let registry = DestinationRegistry::new();
        registry.add(Arc::new(MemoryDestination::new().unwrap()));
        registry.add(Arc::new(MemoryDestination::new().unwrap()));
        assert_eq!(registry.count(), 2);

        registry.remove_all();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_snapshot_survives_removal() {
        let registry = DestinationRegistry::new();
        let memory = Arc::new(MemoryDestination::new().unwrap());
        registry.add(memory.clone());

        let snapshot = registry.snapshot();
        registry.remove_all();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name(), "memory");
    }
}
