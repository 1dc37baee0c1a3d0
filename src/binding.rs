//! Implementation-to-service bindings.

use std::sync::Arc;

use crate::constructor::{ConstructorDescriptor, Injectable};
use crate::key::{ServiceKey, TypeToken};

/// Conversion of a shared implementation into service type `S`.
///
/// Every type binds to itself. Binding to a trait object needs one impl per
/// pair, usually written with [`binds!`](crate::binds):
///
/// ```
/// use ferrous_locator::{binds, Binds};
/// use std::sync::Arc;
///
/// trait IService: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// struct ClassWithoutDependencies;
/// impl IService for ClassWithoutDependencies {
///     fn name(&self) -> &'static str { "without" }
/// }
/// binds!(ClassWithoutDependencies => dyn IService);
///
/// let service: Arc<dyn IService> = Arc::new(ClassWithoutDependencies).bind();
/// assert_eq!(service.name(), "without");
/// ```
pub trait Binds<S: ?Sized>: Send + Sync + 'static {
    fn bind(self: Arc<Self>) -> Arc<S>;
}

impl<T: Send + Sync + 'static> Binds<T> for T {
    #[inline]
    fn bind(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Implements [`Binds`] from an implementation type to one or more trait
/// object service types it implements.
#[macro_export]
macro_rules! binds {
    ($implementation:ty => $($service:ty),+ $(,)?) => {
        $(
            impl $crate::Binds<$service> for $implementation {
                #[inline]
                fn bind(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$service> {
                    self
                }
            }
        )+
    };
}

/// A runtime value pairing an implementation type with a service type.
///
/// This is the type-erased form of "register `I` as `S`": it can be stored,
/// passed around and chosen at runtime (say, from configuration), then handed
/// to [`ConstructorRegistration::register_binding`](crate::ConstructorRegistration::register_binding).
///
/// # Examples
///
/// ```
/// use ferrous_locator::{binds, injectable, Binding, ConstructorRegistration, Resolver, ServiceLocator};
///
/// trait Transport: Send + Sync {
///     fn scheme(&self) -> &'static str;
/// }
///
/// struct Http;
/// impl Transport for Http { fn scheme(&self) -> &'static str { "http" } }
/// injectable!(Http {});
/// binds!(Http => dyn Transport);
///
/// struct Quic;
/// impl Transport for Quic { fn scheme(&self) -> &'static str { "quic" } }
/// injectable!(Quic {});
/// binds!(Quic => dyn Transport);
///
/// let use_quic = true;
/// let binding = if use_quic {
///     Binding::of::<Quic, dyn Transport>()
/// } else {
///     Binding::of::<Http, dyn Transport>()
/// };
///
/// let locator = ServiceLocator::new();
/// locator.register_binding(binding, None);
/// assert_eq!(locator.get_required::<dyn Transport>().unwrap().scheme(), "quic");
/// ```
#[derive(Clone, Copy)]
pub struct Binding {
    implementation: TypeToken,
    service: TypeToken,
    describe: fn() -> ConstructorDescriptor,
}

impl Binding {
    /// Binds implementation `I` to service type `S`.
    pub fn of<I, S>() -> Self
    where
        I: Injectable + Binds<S>,
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            implementation: TypeToken::of::<I>(),
            service: TypeToken::of::<S>(),
            describe: ConstructorDescriptor::bound::<I, S>,
        }
    }

    /// Binds `I` to itself.
    pub fn of_self<I: Injectable>() -> Self {
        Self::of::<I, I>()
    }

    pub fn implementation(&self) -> TypeToken {
        self.implementation
    }

    pub fn service(&self) -> TypeToken {
        self.service
    }

    /// Key this binding registers under for `contract`.
    pub fn service_key(&self, contract: Option<&'static str>) -> ServiceKey {
        ServiceKey::new(self.service, contract)
    }

    /// Computes the constructor descriptor of the implementation.
    pub fn describe(&self) -> ConstructorDescriptor {
        (self.describe)()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("implementation", &self.implementation.type_name())
            .field("service", &self.service.type_name())
            .finish()
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.implementation == other.implementation && self.service == other.service
    }
}

impl Eq for Binding {}
