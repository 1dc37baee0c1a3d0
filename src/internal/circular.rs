//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use tracing::warn;

use crate::config::LocatorOptions;
use crate::error::{ResolveError, ResolveResult};
use crate::key::ServiceKey;

// Keys currently being produced on this thread, outermost first
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<ServiceKey>> = const { RefCell::new(Vec::new()) };
}

/// Marks a key as "being produced" for as long as the guard lives.
///
/// Entering a key that is already on this thread's stack is a cycle: the
/// factory for that key would otherwise recurse until the depth limit.
pub(crate) struct ResolutionGuard {
    key: ServiceKey,
}

impl ResolutionGuard {
    pub(crate) fn enter(key: &ServiceKey, options: &LocatorOptions) -> ResolveResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            // Cycle check before pushing
            if options.detect_cycles && stack.contains(key) {
                let mut path: Vec<String> = stack.iter().map(ToString::to_string).collect();
                path.push(key.to_string());
                warn!(path = %path.join(" -> "), "circular dependency detected");
                return Err(ResolveError::Circular(path));
            }

            if stack.len() >= options.max_resolution_depth {
                return Err(ResolveError::DepthExceeded(stack.len()));
            }

            stack.push(*key);
            Ok(Self { key: *key })
        })
    }
}

/// Cycle error for a lazy singleton that cannot be waited on, carrying the
/// keys this thread is producing.
pub(crate) fn singleton_cycle() -> ResolveError {
    let path: Vec<String> =
        RESOLUTION_STACK.with(|stack| stack.borrow().iter().map(ToString::to_string).collect());
    warn!(path = %path.join(" -> "), "lazy singleton re-entered while under construction");
    ResolveError::Circular(path)
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.key));
        });
    }
}
