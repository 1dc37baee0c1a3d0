//! Default in-memory service container.
//!
//! `ServiceLocator` is a live, mutable registration table: services can be
//! registered before or after others are resolved, and each resolution looks
//! at the table as it is at that moment.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::LocatorOptions;
use crate::error::ResolveResult;
use crate::internal::ResolutionGuard;
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::registration::{Registration, Registry};
use crate::traits::{AnyService, Factory, MutableResolver, ServiceResolver};

/// Service container mapping (service type, contract) to factories.
///
/// Multiple registrations of the same key are kept in order; resolution uses
/// the most recent one and [`resolve_all`](ServiceResolver::resolve_all)
/// returns all of them. Lazy singletons are cached per registration.
///
/// The registration table lock is never held while a factory runs, so
/// factories may resolve further services (and register new ones).
///
/// # Thread Safety
///
/// `ServiceLocator` is `Send + Sync` and cheap to clone; clones share the
/// same table.
///
/// A lazy singleton that depends on itself fails with
/// [`ResolveError::Circular`](crate::ResolveError::Circular) even when cycle
/// detection is off. The same holds when threads build singletons that wait
/// on each other: the thread that would close the wait gets the error instead
/// of blocking.
///
/// # Examples
///
/// ```
/// use ferrous_locator::{MutableResolverExt, Resolver, ServiceLocator};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let locator = ServiceLocator::new();
/// locator.register_constant(Arc::new(Database { url: "postgres://localhost".to_string() }), None);
/// locator.register_fn::<UserService, _>(None, |r| {
///     Ok(Arc::new(UserService { db: r.get_required::<Database>()? }))
/// });
///
/// let users = locator.get_required::<UserService>().unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceLocator {
    inner: Arc<LocatorInner>,
}

struct LocatorInner {
    registry: RwLock<Registry>,
    options: LocatorOptions,
}

impl ServiceLocator {
    /// Creates an empty locator with default options.
    pub fn new() -> Self {
        Self::with_options(LocatorOptions::default())
    }

    /// Creates an empty locator with the given options.
    pub fn with_options(options: LocatorOptions) -> Self {
        Self {
            inner: Arc::new(LocatorInner {
                registry: RwLock::new(Registry::new()),
                options,
            }),
        }
    }

    pub fn options(&self) -> &LocatorOptions {
        &self.inner.options
    }

    /// Number of registrations across all keys.
    pub fn len(&self) -> usize {
        self.inner.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes the most recent registration for `key`.
    ///
    /// Returns `false` if there was none. An earlier registration for the same
    /// key, if any, becomes current again.
    pub fn unregister_current(&self, key: &ServiceKey) -> bool {
        let removed = self.inner.registry.write().remove_current(key);
        debug!(service = %key, removed, "unregistered current registration");
        removed
    }

    /// Removes every registration for `key`, returning how many were removed.
    pub fn unregister_all(&self, key: &ServiceKey) -> usize {
        let removed = self.inner.registry.write().remove_all(key);
        debug!(service = %key, removed, "unregistered all registrations");
        removed
    }

    fn insert(&self, key: ServiceKey, lifetime: Lifetime, factory: Factory) {
        self.inner
            .registry
            .write()
            .insert(key, Registration::new(lifetime, factory));
        debug!(service = %key, %lifetime, "registered factory");
    }

    fn produce(&self, key: &ServiceKey, registration: &Registration) -> ResolveResult<AnyService> {
        let _guard = ResolutionGuard::enter(key, &self.inner.options)?;
        registration.produce(self)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let registry = self.inner.registry.read();
        let mut s = String::new();
        s.push_str("=== Service Locator Debug ===\n");
        for (key, regs) in registry.iter() {
            for (i, reg) in regs.iter().enumerate() {
                s.push_str(&format!(
                    "  {} #{}: {} (initialized: {})\n",
                    key,
                    i,
                    reg.lifetime,
                    reg.is_initialized()
                ));
            }
        }
        s
    }
}

impl Default for ServiceLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceResolver for ServiceLocator {
    fn resolve_any(&self, key: &ServiceKey) -> ResolveResult<Option<AnyService>> {
        // Clone the entry out so the read lock is released before the factory runs
        let registration = self.inner.registry.read().current(key);
        let Some(registration) = registration else {
            trace!(service = %key, "no registration");
            return Ok(None);
        };

        trace!(service = %key, lifetime = %registration.lifetime, "resolving");
        self.produce(key, &registration).map(Some)
    }

    fn resolve_all(&self, key: &ServiceKey) -> ResolveResult<Vec<AnyService>> {
        let registrations = self.inner.registry.read().all(key);
        registrations
            .iter()
            .map(|registration| self.produce(key, registration))
            .collect()
    }

    fn has_registration(&self, key: &ServiceKey) -> bool {
        self.inner.registry.read().contains_key(key)
    }
}

impl MutableResolver for ServiceLocator {
    fn register(&self, factory: Factory, key: ServiceKey) {
        self.insert(key, Lifetime::Transient, factory);
    }

    fn register_lazy_singleton(&self, factory: Factory, key: ServiceKey) {
        self.insert(key, Lifetime::LazySingleton, factory);
    }
}
