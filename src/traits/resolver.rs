//! Resolver traits: the container seams and their typed layers.

use std::any::Any;
use std::sync::Arc;

use crate::error::{ResolveError, ResolveResult};
use crate::key::ServiceKey;

/// Type-erased service value as stored by a container.
///
/// The concrete type behind the `dyn Any` is always `Arc<S>` for the service
/// type `S`, which lets `S` be a trait object.
pub type AnyService = Arc<dyn Any + Send + Sync>;

/// Instance-producing factory as handed to a container.
///
/// The resolver to pull dependencies from is passed in at invocation time, so
/// a factory never holds a reference to the container it is registered in.
pub type Factory = Arc<dyn Fn(&dyn ServiceResolver) -> ResolveResult<AnyService> + Send + Sync>;

/// Wraps a typed service for storage.
#[inline]
pub(crate) fn erase<S>(service: Arc<S>) -> AnyService
where
    S: ?Sized + Send + Sync + 'static,
{
    Arc::new(service)
}

/// Recovers a typed service from storage.
#[inline]
pub(crate) fn downcast<S>(value: AnyService) -> ResolveResult<Arc<S>>
where
    S: ?Sized + Send + Sync + 'static,
{
    value
        .downcast::<Arc<S>>()
        .map(|stored| Arc::clone(&*stored))
        .map_err(|_| ResolveError::TypeMismatch(std::any::type_name::<S>()))
}

/// Object-safe read side of a service container.
///
/// This is the seam the factory builder resolves constructor parameters
/// through. `Ok(None)` means "no registration for this key"; `Err` means a
/// registration exists but producing its value failed.
pub trait ServiceResolver: Send + Sync {
    /// Resolves the current registration for `key`.
    fn resolve_any(&self, key: &ServiceKey) -> ResolveResult<Option<AnyService>>;

    /// Resolves every registration for `key`, oldest first.
    ///
    /// Containers without multi-registration support return at most the
    /// current value.
    fn resolve_all(&self, key: &ServiceKey) -> ResolveResult<Vec<AnyService>> {
        Ok(self.resolve_any(key)?.into_iter().collect())
    }

    /// Whether any registration exists for `key`.
    fn has_registration(&self, key: &ServiceKey) -> bool;
}

/// Object-safe write side of a service container.
///
/// The factory builder only ever calls these two entry points; whether a
/// registration replaces or shadows an earlier one is the container's call.
pub trait MutableResolver: ServiceResolver {
    /// Registers a factory invoked on every resolution.
    fn register(&self, factory: Factory, key: ServiceKey);

    /// Registers a factory whose first successful result is cached and reused.
    fn register_lazy_singleton(&self, factory: Factory, key: ServiceKey);
}

/// Typed resolution helpers, available on every [`ServiceResolver`].
///
/// # Examples
///
/// ```
/// use ferrous_locator::{MutableResolverExt, Resolver, ServiceLocator};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
///
/// let locator = ServiceLocator::new();
/// locator.register_constant(Arc::new(English) as Arc<dyn Greeter>, None);
/// locator.register_constant(Arc::new(8080u16), Some("port"));
///
/// let greeter = locator.get_required::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
///
/// assert_eq!(*locator.get_named_required::<u16>("port").unwrap(), 8080);
/// assert!(locator.get::<u16>().unwrap().is_none());
/// ```
pub trait Resolver: ServiceResolver {
    /// Resolves `T` without a contract; `Ok(None)` if unregistered.
    fn get<T>(&self) -> ResolveResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_with_contract::<T>(None)
    }

    /// Resolves `T` under `contract`; `Ok(None)` if unregistered.
    fn get_named<T>(&self, contract: &'static str) -> ResolveResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_with_contract::<T>(Some(contract))
    }

    /// Resolves `T` with an optional contract; `Ok(None)` if unregistered.
    fn get_with_contract<T>(&self, contract: Option<&'static str>) -> ResolveResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = ServiceKey::with_contract::<T>(contract);
        self.resolve_any(&key)?.map(downcast::<T>).transpose()
    }

    /// Resolves `T`, failing with [`ResolveError::Unresolved`] if unregistered.
    fn get_required<T>(&self) -> ResolveResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get::<T>()?
            .ok_or(ResolveError::Unresolved(std::any::type_name::<T>()))
    }

    /// Resolves `T` under `contract`, failing if unregistered.
    fn get_named_required<T>(&self, contract: &'static str) -> ResolveResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_named::<T>(contract)?
            .ok_or(ResolveError::Unresolved(std::any::type_name::<T>()))
    }

    /// Resolves every registration of `T` without a contract, oldest first.
    fn get_all<T>(&self) -> ResolveResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_all(&ServiceKey::of::<T>())?
            .into_iter()
            .map(downcast::<T>)
            .collect()
    }
}

impl<R: ServiceResolver + ?Sized> Resolver for R {}

/// Typed registration of explicit producer closures, available on every
/// [`MutableResolver`].
///
/// These skip constructor resolution entirely: the closure receives the
/// resolver and builds the service itself.
pub trait MutableResolverExt: MutableResolver {
    /// Registers `factory` as a transient producer of `S`.
    fn register_fn<S, F>(&self, contract: Option<&'static str>, factory: F)
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        let erased: Factory =
            Arc::new(move |resolver: &dyn ServiceResolver| factory(resolver).map(erase));
        self.register(erased, ServiceKey::with_contract::<S>(contract));
    }

    /// Registers `factory` as a lazy-singleton producer of `S`.
    fn register_lazy_singleton_fn<S, F>(&self, contract: Option<&'static str>, factory: F)
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceResolver) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        let erased: Factory =
            Arc::new(move |resolver: &dyn ServiceResolver| factory(resolver).map(erase));
        self.register_lazy_singleton(erased, ServiceKey::with_contract::<S>(contract));
    }

    /// Registers an existing value; every resolution returns the same `Arc`.
    fn register_constant<S>(&self, value: Arc<S>, contract: Option<&'static str>)
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let stored = erase(value);
        let factory: Factory = Arc::new(move |_: &dyn ServiceResolver| Ok(Arc::clone(&stored)));
        self.register(factory, ServiceKey::with_contract::<S>(contract));
    }
}

impl<R: MutableResolver + ?Sized> MutableResolverExt for R {}
