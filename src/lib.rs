//! # ferrous-locator
//!
//! Constructor-resolving service locator for Rust.
//!
//! Declare a type's single constructor once, register the type as a transient
//! or lazy-singleton service, and let the locator resolve its dependencies
//! when (and only when) the service is requested.
//!
//! ## Features
//!
//! - **Declared constructors**: [`Injectable`] (or the [`injectable!`] macro)
//!   lists a type's constructor parameters; no runtime reflection
//! - **Deferred resolution**: registering never fails; missing dependencies
//!   surface as a [`ResolveError`] naming the parameter when the service is
//!   requested
//! - **Interface binding**: register an implementation under a trait object
//!   service type via [`Binds`] / [`binds!`]
//! - **Contracts**: isolate several registrations of the same service type
//! - **Explicit containers**: no global locator; every call takes the
//!   container it works against
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_locator::{binds, injectable, ConstructorRegistration, Resolver, ServiceLocator};
//! use std::sync::Arc;
//!
//! trait IService: Send + Sync {
//!     fn describe(&self) -> String;
//! }
//!
//! struct Dependency;
//! injectable!(Dependency {});
//!
//! struct ClassWithDependencies {
//!     dep: Arc<Dependency>,
//! }
//! injectable!(ClassWithDependencies { dep: Dependency });
//!
//! impl IService for ClassWithDependencies {
//!     fn describe(&self) -> String {
//!         format!("holding {}", std::any::type_name::<Dependency>())
//!     }
//! }
//! binds!(ClassWithDependencies => dyn IService);
//!
//! let locator = ServiceLocator::new();
//! locator.register_injectable_self::<Dependency>(None);
//! locator.register_injectable::<ClassWithDependencies, dyn IService>(None);
//!
//! let service = locator.get_required::<dyn IService>().unwrap();
//! assert!(service.describe().ends_with("Dependency"));
//! ```
//!
//! ## Lifetimes
//!
//! - **Transient**: a fresh instance per resolution
//! - **Lazy singleton**: built on first resolution, then shared
//!
//! Instance caching is the container's job; the factories built here only
//! cache each implementation's constructor descriptor.
//!
//! ## Contracts
//!
//! ```rust
//! use ferrous_locator::{injectable, ConstructorRegistration, MutableResolverExt, Resolver, ServiceLocator};
//! use std::sync::Arc;
//!
//! struct Endpoint {
//!     url: Arc<String>,
//! }
//! injectable!(Endpoint { url: String });
//!
//! let locator = ServiceLocator::new();
//! locator.register_constant(Arc::new("https://primary".to_string()), Some("primary"));
//! locator.register_constant(Arc::new("https://backup".to_string()), Some("backup"));
//! locator.register_injectable_self::<Endpoint>(Some("primary"));
//! locator.register_injectable_self::<Endpoint>(Some("backup"));
//!
//! // Parameters resolve under the registration's own contract
//! let backup = locator.get_named_required::<Endpoint>("backup").unwrap();
//! assert_eq!(backup.url.as_str(), "https://backup");
//! ```

// Module declarations
pub mod binding;
pub mod config;
pub mod constructor;
pub mod error;
pub mod factory;
pub mod key;
pub mod lifetime;
pub mod locator;
pub mod routing;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use binding::{Binding, Binds};
pub use config::{LocatorOptions, DEFAULT_ENV_PREFIX};
pub use constructor::{Arguments, ConstructorDescriptor, Injectable, Parameter};
pub use error::{ResolveError, ResolveResult};
pub use factory::{ConstructorFactory, ConstructorRegistration, RegistrationDescriptor};
pub use key::{ServiceKey, TypeToken};
pub use lifetime::Lifetime;
pub use locator::ServiceLocator;
pub use routing::{ExecuteCommand, ResolvingCommandExt, RoutableViewModel};
pub use traits::{AnyService, Factory, MutableResolver, MutableResolverExt, Resolver, ServiceResolver};
