//! Resolving routed-command targets from a container.
//!
//! A routing command navigates to a view model. These helpers look the view
//! model (or a factory for it) up right before execution, so the caller names
//! a type instead of building the instance by hand. Lookups use the
//! container's plain resolution; constructor resolution happens only if the
//! target was registered that way.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::binding::Binds;
use crate::error::{ResolveError, ResolveResult};
use crate::traits::{Resolver, ServiceResolver};

/// A view model that can be navigated to.
pub trait RoutableViewModel: Send + Sync {
    /// Path segment identifying this view model in the navigation stack.
    fn url_path_segment(&self) -> &str;
}

/// A command that executes with a shared value and returns a result.
///
/// The command machinery itself (streams, scheduling, error channels) lives
/// outside this crate; this is the one entry point the helpers need.
pub trait ExecuteCommand {
    /// Value the command executes with.
    type Param: ?Sized + Send + Sync + 'static;
    /// Whatever the command hands back, typically a result stream.
    type Output;

    fn execute(&self, parameter: Arc<Self::Param>) -> Self::Output;
}

/// Execute-with-resolution helpers, available on every [`ExecuteCommand`].
///
/// # Examples
///
/// ```
/// use ferrous_locator::{binds, injectable, ConstructorRegistration, ExecuteCommand,
///     ResolvingCommandExt, RoutableViewModel, ServiceLocator};
/// use std::sync::Arc;
///
/// struct SettingsViewModel;
/// impl RoutableViewModel for SettingsViewModel {
///     fn url_path_segment(&self) -> &str { "settings" }
/// }
/// injectable!(SettingsViewModel {});
/// binds!(SettingsViewModel => dyn RoutableViewModel);
///
/// struct Navigate;
/// impl ExecuteCommand for Navigate {
///     type Param = dyn RoutableViewModel;
///     type Output = String;
///     fn execute(&self, vm: Arc<dyn RoutableViewModel>) -> String {
///         format!("/{}", vm.url_path_segment())
///     }
/// }
///
/// let locator = ServiceLocator::new();
/// locator.register_injectable_self::<SettingsViewModel>(None);
///
/// let path = Navigate.execute_resolved::<SettingsViewModel>(&locator).unwrap();
/// assert_eq!(path, "/settings");
/// ```
pub trait ResolvingCommandExt: ExecuteCommand {
    /// Resolves `V` and executes the command with it.
    ///
    /// Fails with [`ResolveError::Unresolved`] naming `V` if it is not
    /// registered; the command is not executed in that case.
    fn execute_resolved<V>(&self, resolver: &dyn ServiceResolver) -> ResolveResult<Self::Output>
    where
        V: Binds<Self::Param>,
    {
        self.execute_resolved_named::<V>(resolver, None)
    }

    /// Like [`execute_resolved`](Self::execute_resolved), under a contract.
    fn execute_resolved_named<V>(
        &self,
        resolver: &dyn ServiceResolver,
        contract: Option<&'static str>,
    ) -> ResolveResult<Self::Output>
    where
        V: Binds<Self::Param>,
    {
        let view_model = require::<V>(resolver, contract)?;
        trace!(target_type = std::any::type_name::<V>(), "executing with resolved view model");
        Ok(self.execute(<V as Binds<Self::Param>>::bind(view_model)))
    }

    /// Resolves factory `F`, lets `create` build the parameter from it, and
    /// executes the command with the result.
    ///
    /// Fails with [`ResolveError::Unresolved`] naming `F` if it is not
    /// registered; `create` is not called in that case.
    fn execute_with_factory<F, C>(
        &self,
        resolver: &dyn ServiceResolver,
        create: C,
    ) -> ResolveResult<Self::Output>
    where
        F: ?Sized + Send + Sync + 'static,
        C: FnOnce(&F) -> Arc<Self::Param>,
    {
        self.execute_with_factory_named::<F, C>(resolver, None, create)
    }

    /// Like [`execute_with_factory`](Self::execute_with_factory), under a
    /// contract.
    fn execute_with_factory_named<F, C>(
        &self,
        resolver: &dyn ServiceResolver,
        contract: Option<&'static str>,
        create: C,
    ) -> ResolveResult<Self::Output>
    where
        F: ?Sized + Send + Sync + 'static,
        C: FnOnce(&F) -> Arc<Self::Param>,
    {
        let factory = require::<F>(resolver, contract)?;
        trace!(factory_type = std::any::type_name::<F>(), "executing with factory-built value");
        Ok(self.execute(create(&*factory)))
    }
}

impl<C: ExecuteCommand + ?Sized> ResolvingCommandExt for C {}

fn require<T>(resolver: &dyn ServiceResolver, contract: Option<&'static str>) -> ResolveResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    resolver.get_with_contract::<T>(contract)?.ok_or_else(|| {
        warn!(target_type = std::any::type_name::<T>(), contract, "unable to resolve command target");
        ResolveError::Unresolved(std::any::type_name::<T>())
    })
}
