//! Core traits for the locator.

mod resolver;

pub use resolver::{AnyService, Factory, MutableResolver, MutableResolverExt, Resolver, ServiceResolver};
pub(crate) use resolver::{downcast, erase};
