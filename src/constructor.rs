//! Statically declared constructors.
//!
//! Rust has no runtime constructor reflection, so a type opts in to
//! constructor-based resolution by implementing [`Injectable`]: it lists the
//! parameters of its one constructor and builds itself from the resolved
//! values. The [`injectable!`](crate::injectable) macro writes both halves for
//! the common "struct of `Arc` dependencies" shape.

use std::sync::Arc;

use crate::binding::Binds;
use crate::error::{ResolveError, ResolveResult};
use crate::key::{ServiceKey, TypeToken};
use crate::traits::{downcast, erase, AnyService};

/// One constructor parameter: its name and the service type it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    name: &'static str,
    ty: TypeToken,
}

impl Parameter {
    /// Parameter `name` resolved as service type `T`.
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            ty: TypeToken::of::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_token(&self) -> TypeToken {
        self.ty
    }

    /// Key this parameter is looked up under for a registration's contract.
    pub fn key(&self, contract: Option<&'static str>) -> ServiceKey {
        ServiceKey::new(self.ty, contract)
    }
}

/// Resolved constructor arguments, consumed in declaration order.
pub struct Arguments {
    implementation: &'static str,
    values: std::vec::IntoIter<AnyService>,
}

impl Arguments {
    pub(crate) fn new(implementation: &'static str, values: Vec<AnyService>) -> Self {
        Self {
            implementation,
            values: values.into_iter(),
        }
    }

    /// Takes the next argument as service type `T`.
    ///
    /// Fails with [`ResolveError::TypeMismatch`] if the argument has another
    /// type or the arguments are used up, both of which mean
    /// [`Injectable::construct`] disagrees with [`Injectable::parameters`].
    pub fn next<T>(&mut self) -> ResolveResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let value = self
            .values
            .next()
            .ok_or(ResolveError::TypeMismatch(std::any::type_name::<T>()))?;
        downcast::<T>(value)
    }

    /// Name of the type being constructed.
    pub fn implementation(&self) -> &'static str {
        self.implementation
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// A type with a single constructor whose parameters are resolved services.
///
/// [`parameters`](Injectable::parameters) and
/// [`construct`](Injectable::construct) must agree: `construct` receives one
/// argument per parameter, in the listed order.
///
/// # Examples
///
/// Most types use the macro:
///
/// ```
/// use ferrous_locator::injectable;
/// use std::sync::Arc;
///
/// struct Dependency;
/// injectable!(Dependency {});
///
/// struct ClassWithDependencies {
///     dep: Arc<Dependency>,
/// }
/// injectable!(ClassWithDependencies { dep: Dependency });
/// ```
///
/// A hand-written impl can run arbitrary constructor logic:
///
/// ```
/// use ferrous_locator::{Arguments, Injectable, Parameter, ResolveResult};
/// use std::sync::Arc;
///
/// struct Settings { base_url: String }
///
/// struct ApiClient { endpoint: String }
///
/// impl Injectable for ApiClient {
///     fn parameters() -> Vec<Parameter> {
///         vec![Parameter::of::<Settings>("settings")]
///     }
///
///     fn construct(args: &mut Arguments) -> ResolveResult<Self> {
///         let settings: Arc<Settings> = args.next()?;
///         Ok(ApiClient { endpoint: format!("{}/v1", settings.base_url) })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Constructor parameters in declaration order.
    fn parameters() -> Vec<Parameter>;

    /// Builds the instance from resolved arguments.
    fn construct(args: &mut Arguments) -> ResolveResult<Self>;
}

/// Implements [`Injectable`] for a struct whose fields are all `Arc<Dep>`.
///
/// Each `field: Dep` entry declares a constructor parameter named `field`
/// that resolves service type `Dep` (which may be `dyn Trait`); the struct's
/// field must have type `Arc<Dep>`. Use `Type {}` for a type with no
/// parameters, including unit structs.
///
/// ```
/// use ferrous_locator::{injectable, Injectable};
/// use std::sync::Arc;
///
/// trait Store: Send + Sync {}
///
/// struct Clock;
/// injectable!(Clock {});
///
/// struct Service {
///     clock: Arc<Clock>,
///     store: Arc<dyn Store>,
/// }
/// injectable!(Service { clock: Clock, store: dyn Store });
///
/// let names: Vec<_> = Service::parameters().iter().map(|p| p.name()).collect();
/// assert_eq!(names, ["clock", "store"]);
/// assert!(Clock::parameters().is_empty());
/// ```
#[macro_export]
macro_rules! injectable {
    ($ty:ident { $($field:ident : $dep:ty),* $(,)? }) => {
        impl $crate::Injectable for $ty {
            fn parameters() -> ::std::vec::Vec<$crate::Parameter> {
                ::std::vec![$($crate::Parameter::of::<$dep>(::std::stringify!($field))),*]
            }

            #[allow(unused_variables)]
            fn construct(args: &mut $crate::Arguments) -> $crate::ResolveResult<Self> {
                ::std::result::Result::Ok($ty { $($field: args.next::<$dep>()?),* })
            }
        }
    };
}

/// Everything needed to build an implementation as a given service type.
///
/// Obtained from a [`Binding`](crate::Binding) and cached by the factory that
/// uses it; it holds the parameter list, never parameter values.
pub struct ConstructorDescriptor {
    implementation: TypeToken,
    parameters: Vec<Parameter>,
    construct: fn(&mut Arguments) -> ResolveResult<AnyService>,
}

impl ConstructorDescriptor {
    /// Descriptor building `I` and exposing it as service type `S`.
    pub fn bound<I, S>() -> Self
    where
        I: Injectable + Binds<S>,
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            implementation: TypeToken::of::<I>(),
            parameters: I::parameters(),
            construct: construct_as::<I, S>,
        }
    }

    /// Descriptor building `I` as itself.
    pub fn of<I: Injectable>() -> Self {
        Self::bound::<I, I>()
    }

    /// Name of the implementation type.
    pub fn implementation(&self) -> &'static str {
        self.implementation.type_name()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Invokes the constructor with resolved values, in parameter order.
    pub fn construct(&self, values: Vec<AnyService>) -> ResolveResult<AnyService> {
        let mut args = Arguments::new(self.implementation(), values);
        (self.construct)(&mut args)
    }
}

impl std::fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("implementation", &self.implementation())
            .field("parameters", &self.parameters)
            .finish()
    }
}

fn construct_as<I, S>(args: &mut Arguments) -> ResolveResult<AnyService>
where
    I: Injectable + Binds<S>,
    S: ?Sized + Send + Sync + 'static,
{
    let instance = Arc::new(I::construct(args)?);
    Ok(erase(<I as Binds<S>>::bind(instance)))
}
