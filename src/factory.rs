//! Constructor-resolving factory builder.
//!
//! Turns "register implementation `I` as service `S` under a contract" into a
//! [`Factory`] and hands it to a container's transient or lazy-singleton entry
//! point. Nothing is resolved at registration time; each invocation of the
//! factory resolves the constructor parameters from whatever resolver it is
//! called with, so dependencies may be registered in any order as long as they
//! exist by the time the service is requested.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, trace, warn};

use crate::binding::{Binding, Binds};
use crate::constructor::{ConstructorDescriptor, Injectable};
use crate::error::{ResolveError, ResolveResult};
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::traits::{AnyService, Factory, MutableResolver, ServiceResolver};

/// What to register: implementation/service pair, contract and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationDescriptor {
    binding: Binding,
    contract: Option<&'static str>,
    lifetime: Lifetime,
}

impl RegistrationDescriptor {
    pub fn new(binding: Binding, contract: Option<&'static str>, lifetime: Lifetime) -> Self {
        Self {
            binding,
            contract,
            lifetime,
        }
    }

    pub fn transient(binding: Binding, contract: Option<&'static str>) -> Self {
        Self::new(binding, contract, Lifetime::Transient)
    }

    pub fn lazy_singleton(binding: Binding, contract: Option<&'static str>) -> Self {
        Self::new(binding, contract, Lifetime::LazySingleton)
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn contract(&self) -> Option<&'static str> {
        self.contract
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn service_key(&self) -> ServiceKey {
        self.binding.service_key(self.contract)
    }
}

/// Factory that builds one binding's implementation by resolving its
/// constructor parameters.
///
/// The constructor descriptor is computed on first use and kept for the life
/// of the factory. Parameter values and instances are never cached here.
pub struct ConstructorFactory {
    binding: Binding,
    contract: Option<&'static str>,
    descriptor: OnceCell<ConstructorDescriptor>,
}

impl ConstructorFactory {
    pub fn new(binding: Binding, contract: Option<&'static str>) -> Self {
        Self {
            binding,
            contract,
            descriptor: OnceCell::new(),
        }
    }

    /// Cached constructor descriptor, computed on first call.
    pub fn descriptor(&self) -> &ConstructorDescriptor {
        self.descriptor.get_or_init(|| {
            let descriptor = self.binding.describe();
            trace!(
                implementation = descriptor.implementation(),
                parameters = descriptor.parameters().len(),
                "computed constructor descriptor"
            );
            descriptor
        })
    }

    /// Whether the descriptor has been computed yet.
    pub fn is_described(&self) -> bool {
        self.descriptor.get().is_some()
    }

    /// Resolves every constructor parameter and builds a new instance.
    ///
    /// Parameters are resolved in declaration order under this factory's
    /// contract. The first one with no registration aborts the attempt with
    /// [`ResolveError::MissingParameter`]; later parameters are not touched.
    /// Errors from producing a registered dependency are passed through as is.
    pub fn create(&self, resolver: &dyn ServiceResolver) -> ResolveResult<AnyService> {
        let descriptor = self.descriptor();
        let mut values = Vec::with_capacity(descriptor.parameters().len());

        for parameter in descriptor.parameters() {
            match resolver.resolve_any(&parameter.key(self.contract))? {
                Some(value) => values.push(value),
                None => {
                    warn!(
                        parameter = parameter.name(),
                        parameter_type = parameter.type_token().type_name(),
                        implementation = descriptor.implementation(),
                        contract = self.contract,
                        "unable to resolve constructor parameter"
                    );
                    return Err(ResolveError::MissingParameter {
                        parameter: parameter.name(),
                        implementation: descriptor.implementation(),
                    });
                }
            }
        }

        descriptor.construct(values)
    }

    /// Erases this factory into the form containers accept.
    pub fn into_factory(self) -> Factory {
        let this = Arc::new(self);
        Arc::new(move |resolver: &dyn ServiceResolver| this.create(resolver))
    }
}

/// Constructor-based registration, available on every [`MutableResolver`].
///
/// # Examples
///
/// ```
/// use ferrous_locator::{binds, injectable, ConstructorRegistration, ResolveError, Resolver, ServiceLocator};
/// use std::sync::Arc;
///
/// trait IService: Send + Sync {}
///
/// struct Dependency;
/// injectable!(Dependency {});
///
/// struct ClassWithDependencies {
///     dep: Arc<Dependency>,
/// }
/// injectable!(ClassWithDependencies { dep: Dependency });
/// impl IService for ClassWithDependencies {}
/// binds!(ClassWithDependencies => dyn IService);
///
/// let locator = ServiceLocator::new();
/// locator.register_injectable::<ClassWithDependencies, dyn IService>(None);
///
/// // Registration succeeded; resolution fails until the dependency exists
/// let err = locator.get::<dyn IService>().err().unwrap();
/// assert!(matches!(err, ResolveError::MissingParameter { parameter: "dep", .. }));
///
/// locator.register_injectable_self::<Dependency>(None);
/// assert!(locator.get_required::<dyn IService>().is_ok());
/// ```
pub trait ConstructorRegistration: MutableResolver {
    /// Builds a constructor factory and registers it per `descriptor`.
    fn register_descriptor(&self, descriptor: RegistrationDescriptor) {
        let key = descriptor.service_key();
        let factory = ConstructorFactory::new(descriptor.binding(), descriptor.contract()).into_factory();

        debug!(
            service = %key,
            implementation = descriptor.binding().implementation().type_name(),
            lifetime = %descriptor.lifetime(),
            "registering constructor factory"
        );

        match descriptor.lifetime() {
            Lifetime::Transient => self.register(factory, key),
            Lifetime::LazySingleton => self.register_lazy_singleton(factory, key),
        }
    }

    /// Registers `binding` as a transient service.
    fn register_binding(&self, binding: Binding, contract: Option<&'static str>) {
        self.register_descriptor(RegistrationDescriptor::transient(binding, contract));
    }

    /// Registers `binding` as a lazy singleton.
    fn register_lazy_binding(&self, binding: Binding, contract: Option<&'static str>) {
        self.register_descriptor(RegistrationDescriptor::lazy_singleton(binding, contract));
    }

    /// Registers implementation `I` as transient service `S`.
    fn register_injectable<I, S>(&self, contract: Option<&'static str>)
    where
        I: Injectable + Binds<S>,
        S: ?Sized + Send + Sync + 'static,
    {
        self.register_binding(Binding::of::<I, S>(), contract);
    }

    /// Registers `I` as a transient service of its own type.
    fn register_injectable_self<I: Injectable>(&self, contract: Option<&'static str>) {
        self.register_binding(Binding::of_self::<I>(), contract);
    }

    /// Registers implementation `I` as lazy-singleton service `S`.
    fn register_lazy_injectable<I, S>(&self, contract: Option<&'static str>)
    where
        I: Injectable + Binds<S>,
        S: ?Sized + Send + Sync + 'static,
    {
        self.register_lazy_binding(Binding::of::<I, S>(), contract);
    }

    /// Registers `I` as a lazy singleton of its own type.
    fn register_lazy_injectable_self<I: Injectable>(&self, contract: Option<&'static str>) {
        self.register_lazy_binding(Binding::of_self::<I>(), contract);
    }
}

impl<R: MutableResolver + ?Sized> ConstructorRegistration for R {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructor::{Arguments, Parameter};
    use crate::traits::{downcast, MutableResolverExt};
    use crate::ServiceLocator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DESCRIBED: AtomicUsize = AtomicUsize::new(0);

    struct Counted {
        value: Arc<u32>,
    }

    impl Injectable for Counted {
        fn parameters() -> Vec<Parameter> {
            DESCRIBED.fetch_add(1, Ordering::SeqCst);
            vec![Parameter::of::<u32>("value")]
        }

        fn construct(args: &mut Arguments) -> ResolveResult<Self> {
            Ok(Counted { value: args.next()? })
        }
    }

    #[test]
    fn descriptor_is_computed_once_per_factory() {
        let locator = ServiceLocator::new();
        locator.register_constant(Arc::new(5u32), None);

        let factory = ConstructorFactory::new(Binding::of_self::<Counted>(), None);
        assert!(!factory.is_described());

        let before = DESCRIBED.load(Ordering::SeqCst);
        let first = downcast::<Counted>(factory.create(&locator).unwrap()).unwrap();
        let second = downcast::<Counted>(factory.create(&locator).unwrap()).unwrap();

        assert!(factory.is_described());
        assert_eq!(DESCRIBED.load(Ordering::SeqCst), before + 1);
        assert_eq!(*first.value, 5);
        // Instances are not cached by the factory
        assert!(!Arc::ptr_eq(&first, &second));
    }

    struct Plain {
        value: Arc<u32>,
    }
    crate::injectable!(Plain { value: u32 });

    #[test]
    fn failed_attempt_still_caches_only_the_descriptor() {
        let empty = ServiceLocator::new();
        let factory = ConstructorFactory::new(Binding::of_self::<Plain>(), None);

        let err = factory.create(&empty).err().unwrap();
        assert!(matches!(err, ResolveError::MissingParameter { parameter: "value", .. }));
        assert!(factory.is_described());

        let filled = ServiceLocator::new();
        filled.register_constant(Arc::new(9u32), None);
        let built = downcast::<Plain>(factory.create(&filled).unwrap()).unwrap();
        assert_eq!(*built.value, 9);
    }

    #[test]
    fn descriptor_exposes_lifetime_and_key() {
        let descriptor = RegistrationDescriptor::lazy_singleton(Binding::of_self::<Plain>(), Some("c"));
        assert_eq!(descriptor.lifetime(), Lifetime::LazySingleton);
        assert_eq!(descriptor.contract(), Some("c"));
        assert_eq!(descriptor.service_key(), ServiceKey::named::<Plain>("c"));
    }
}
