//! Registration lifetime definitions.

/// How the container caches what a registered factory produces.
///
/// The factory builder never caches instances itself; it hands the same kind
/// of factory to the container either way and lets the container's entry
/// point decide.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{injectable, ConstructorRegistration, Resolver, ServiceLocator};
/// use std::sync::Arc;
///
/// struct Clock;
/// injectable!(Clock {});
///
/// struct Cache;
/// injectable!(Cache {});
///
/// let locator = ServiceLocator::new();
/// locator.register_injectable_self::<Clock>(None);
/// locator.register_lazy_injectable_self::<Cache>(None);
///
/// // Transient: a fresh instance per resolution
/// let a = locator.get_required::<Clock>().unwrap();
/// let b = locator.get_required::<Clock>().unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
///
/// // Lazy singleton: built on first resolution, then reused
/// let c = locator.get_required::<Cache>().unwrap();
/// let d = locator.get_required::<Cache>().unwrap();
/// assert!(Arc::ptr_eq(&c, &d));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// New instance per resolution, never cached
    Transient,
    /// Built on first successful resolution, then shared
    ///
    /// A failed first attempt is not cached; the next resolution runs the
    /// factory again. Concurrent first resolutions wait for one build.
    LazySingleton,
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Transient => f.write_str("transient"),
            Lifetime::LazySingleton => f.write_str("lazy-singleton"),
        }
    }
}
