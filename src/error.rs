//! Error types for service resolution.

use thiserror::Error;

/// Resolution errors
///
/// Every failure to produce a service surfaces as one of these variants, always
/// synchronously to the caller of the resolving operation. Nothing is retried
/// and no partially resolved state is kept.
///
/// Type names in messages are full [`std::any::type_name`] paths such as
/// `app::services::Clock`, not bare type names.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::{ResolveError, Resolver, ServiceLocator};
///
/// let locator = ServiceLocator::new();
/// match locator.get_required::<String>() {
///     Err(ResolveError::Unresolved(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_locator::{injectable, ConstructorRegistration, Resolver, ServiceLocator};
/// use std::sync::Arc;
///
/// mod services {
///     pub struct Clock;
/// }
/// struct Scheduler {
///     clock: Arc<services::Clock>,
/// }
/// injectable!(Scheduler { clock: services::Clock });
///
/// let locator = ServiceLocator::new();
/// locator.register_injectable_self::<Scheduler>(None);
///
/// let message = locator.get::<Scheduler>().err().unwrap().to_string();
/// assert_eq!(
///     message,
///     format!("Unable to resolve clock parameter for {}", std::any::type_name::<Scheduler>())
/// );
/// assert!(message.ends_with("::Scheduler"));
/// ```
///
/// ```rust
/// use ferrous_locator::ResolveError;
///
/// let missing = ResolveError::MissingParameter {
///     parameter: "dep",
///     implementation: "app::ClassWithDependencies",
/// };
/// assert_eq!(
///     missing.to_string(),
///     "Unable to resolve dep parameter for app::ClassWithDependencies"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No registration exists for a directly requested service
    #[error("Unable to resolve type {0}")]
    Unresolved(&'static str),
    /// A constructor parameter of a registered implementation has no registration
    #[error("Unable to resolve {parameter} parameter for {implementation}")]
    MissingParameter {
        parameter: &'static str,
        implementation: &'static str,
    },
    /// Stored value does not have the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Dependency cycle (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Locator options could not be read
    #[error("Invalid locator options: {0}")]
    InvalidOptions(String),
}

/// Result type for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;
