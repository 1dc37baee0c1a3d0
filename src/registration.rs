//! Registration table of the default locator.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ResolveResult;
use crate::internal::{singleton_cycle, SingletonSlot};
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::traits::{AnyService, Factory, ServiceResolver};

/// One registered factory with its lifetime and singleton slot
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    factory: Factory,
    /// Cached value for lazy singletons; unused for transients
    instance: SingletonSlot,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, factory: Factory) -> Self {
        Self {
            lifetime,
            factory,
            instance: SingletonSlot::new(),
        }
    }

    /// Runs the factory, or returns the cached singleton.
    ///
    /// A failed singleton initialization leaves the slot empty. Re-entering a
    /// singleton under construction fails as a cycle, whether from this thread
    /// or from threads waiting on each other.
    pub(crate) fn produce(&self, resolver: &dyn ServiceResolver) -> ResolveResult<AnyService> {
        match self.lifetime {
            Lifetime::Transient => (self.factory)(resolver),
            Lifetime::LazySingleton => self
                .instance
                .get_or_try_init(|| (self.factory)(resolver), singleton_cycle),
        }
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn is_initialized(&self) -> bool {
        self.instance.is_initialized()
    }
}

/// Registrations per key, oldest first. The last entry is the current one.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<ServiceKey, Vec<Arc<Registration>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: ServiceKey, registration: Registration) {
        self.entries
            .entry(key)
            .or_default()
            .push(Arc::new(registration));
    }

    /// Current registration for `key`
    #[inline]
    pub(crate) fn current(&self, key: &ServiceKey) -> Option<Arc<Registration>> {
        self.entries.get(key).and_then(|regs| regs.last()).cloned()
    }

    /// All registrations for `key`, oldest first
    pub(crate) fn all(&self, key: &ServiceKey) -> Vec<Arc<Registration>> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    pub(crate) fn contains_key(&self, key: &ServiceKey) -> bool {
        self.entries.get(key).is_some_and(|regs| !regs.is_empty())
    }

    /// Drops the current registration, exposing the previous one.
    pub(crate) fn remove_current(&mut self, key: &ServiceKey) -> bool {
        let Some(regs) = self.entries.get_mut(key) else {
            return false;
        };
        let removed = regs.pop().is_some();
        if regs.is_empty() {
            self.entries.remove(key);
        }
        removed
    }

    /// Drops every registration for `key`, returning how many there were.
    pub(crate) fn remove_all(&mut self, key: &ServiceKey) -> usize {
        self.entries.remove(key).map_or(0, |regs| regs.len())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&ServiceKey, &[Arc<Registration>])> {
        self.entries.iter().map(|(k, regs)| (k, regs.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::erase;

    fn constant(value: u32) -> Factory {
        Arc::new(move |_: &dyn ServiceResolver| Ok(erase(Arc::new(value))))
    }

    #[test]
    fn last_insert_is_current() {
        let key = ServiceKey::of::<u32>();
        let mut registry = Registry::new();
        registry.insert(key, Registration::new(Lifetime::Transient, constant(1)));
        registry.insert(key, Registration::new(Lifetime::Transient, constant(2)));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.all(&key).len(), 2);
        assert!(registry.current(&key).is_some());

        assert!(registry.remove_current(&key));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove_all(&key), 1);
        assert!(!registry.contains_key(&key));
        assert!(!registry.remove_current(&key));
    }
}
