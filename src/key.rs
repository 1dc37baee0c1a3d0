//! Service key types for the locator.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable, comparable identifier of a type.
///
/// Carries the `TypeId` for lookup and the type name for diagnostics. Works
/// for unsized types too, so `dyn Trait` services get a token like any struct.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::TypeToken;
///
/// trait Greeter: Send + Sync {}
///
/// let concrete = TypeToken::of::<String>();
/// let interface = TypeToken::of::<dyn Greeter>();
/// assert_ne!(concrete, interface);
/// assert_eq!(concrete.type_name(), "alloc::string::String");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Token for `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

// TypeId-only comparison, the name is for display
impl PartialEq for TypeToken {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Key for service storage and lookup.
///
/// A service key is a (service type, contract) pair. The contract isolates
/// multiple registrations of the same service type from one another: a
/// registration under contract `"primary"` and one without a contract occupy
/// different slots.
///
/// # Examples
///
/// ```rust
/// use ferrous_locator::ServiceKey;
///
/// let plain = ServiceKey::of::<u32>();
/// let named = ServiceKey::named::<u32>("port");
///
/// assert_ne!(plain, named);
/// assert_eq!(named.contract(), Some("port"));
/// assert_eq!(plain.display_name(), "u32");
/// assert_eq!(named.to_string(), "u32 [port]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    service: TypeToken,
    contract: Option<&'static str>,
}

impl ServiceKey {
    /// Builds a key from a type token and an optional contract.
    pub fn new(service: TypeToken, contract: Option<&'static str>) -> Self {
        Self { service, contract }
    }

    /// Key for service type `T` without a contract.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeToken::of::<T>(), None)
    }

    /// Key for service type `T` under `contract`.
    #[inline(always)]
    pub fn named<T: ?Sized + 'static>(contract: &'static str) -> Self {
        Self::new(TypeToken::of::<T>(), Some(contract))
    }

    /// Key for service type `T` with an optional contract.
    #[inline(always)]
    pub fn with_contract<T: ?Sized + 'static>(contract: Option<&'static str>) -> Self {
        Self::new(TypeToken::of::<T>(), contract)
    }

    pub fn service(&self) -> TypeToken {
        self.service
    }

    pub fn contract(&self) -> Option<&'static str> {
        self.contract
    }

    /// The service type name, for errors and logs.
    pub fn display_name(&self) -> &'static str {
        self.service.type_name()
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.contract {
            Some(contract) => write!(f, "{} [{}]", self.display_name(), contract),
            None => f.write_str(self.display_name()),
        }
    }
}
