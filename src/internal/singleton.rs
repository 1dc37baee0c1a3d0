//! Lazy-singleton slots.
//!
//! A slot is built at most once at a time. Threads that find it being built
//! wait for the builder, unless waiting could never end: the builder is this
//! thread further up its own stack, or a thread that (transitively) waits on
//! this one. Those cases fail with the caller-supplied cycle error.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use once_cell::sync::Lazy;
use parking_lot::{Condvar, Mutex};

use crate::error::{ResolveError, ResolveResult};
use crate::traits::AnyService;

// Waiting thread -> (thread building the slot it waits on, that slot)
static WAITS_FOR: Lazy<Mutex<HashMap<ThreadId, (ThreadId, usize)>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

enum State {
    Empty,
    Building(ThreadId),
    Ready(AnyService),
}

pub(crate) struct SingletonSlot {
    state: Mutex<State>,
    ready: Condvar,
}

impl SingletonSlot {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State::Empty),
            ready: Condvar::new(),
        }
    }

    /// Returns the cached value, or runs `build` to produce it.
    ///
    /// A failed (or panicking) build leaves the slot empty and wakes waiters,
    /// one of which then builds it itself.
    pub(crate) fn get_or_try_init<F, C>(&self, build: F, cycle: C) -> ResolveResult<AnyService>
    where
        F: FnOnce() -> ResolveResult<AnyService>,
        C: FnOnce() -> ResolveError,
    {
        let me = thread::current().id();
        let mut state = self.state.lock();

        loop {
            let builder = match &*state {
                State::Ready(value) => return Ok(Arc::clone(value)),
                State::Empty => break,
                State::Building(builder) => *builder,
            };

            if builder == me || !wait_on(me, builder, self.id()) {
                return Err(cycle());
            }
            self.ready.wait(&mut state);
            WAITS_FOR.lock().remove(&me);
        }

        *state = State::Building(me);
        drop(state);

        let mut build_guard = Building { slot: self, value: None };
        let value = build()?;
        build_guard.value = Some(Arc::clone(&value));
        Ok(value)
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn is_initialized(&self) -> bool {
        matches!(*self.state.lock(), State::Ready(_))
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }
}

/// Records that `waiter` blocks on `slot` built by `builder`.
///
/// Returns `false` without recording if that would close a waits-for cycle.
fn wait_on(waiter: ThreadId, builder: ThreadId, slot: usize) -> bool {
    let mut waits = WAITS_FOR.lock();

    let mut current = builder;
    while current != waiter {
        match waits.get(&current) {
            Some((next, _)) => current = *next,
            None => {
                waits.insert(waiter, (builder, slot));
                return true;
            }
        }
    }
    false
}

/// Publishes the build outcome when dropped, including on unwind.
struct Building<'a> {
    slot: &'a SingletonSlot,
    value: Option<AnyService>,
}

impl Drop for Building<'_> {
    fn drop(&mut self) {
        *self.slot.state.lock() = match self.value.take() {
            Some(value) => State::Ready(value),
            None => State::Empty,
        };

        let id = self.slot.id();
        WAITS_FOR.lock().retain(|_, (_, slot)| *slot != id);
        self.slot.ready.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::erase;

    fn cycle() -> ResolveError {
        ResolveError::Circular(vec!["slot".into()])
    }

    #[test]
    fn value_is_built_once() {
        let slot = SingletonSlot::new();
        let first = slot.get_or_try_init(|| Ok(erase(Arc::new(1u8))), cycle).unwrap();
        let second = slot
            .get_or_try_init(|| panic!("built twice"), cycle)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_build_leaves_slot_empty() {
        let slot = SingletonSlot::new();
        let err = slot.get_or_try_init(|| Err(ResolveError::Unresolved("u8")), cycle);
        assert_eq!(err.err(), Some(ResolveError::Unresolved("u8")));
        assert!(slot.get_or_try_init(|| Ok(erase(Arc::new(2u8))), cycle).is_ok());
    }

    #[test]
    fn reentry_on_same_thread_is_a_cycle() {
        let slot = SingletonSlot::new();
        let result = slot.get_or_try_init(|| slot.get_or_try_init(|| unreachable!(), cycle), cycle);
        assert_eq!(result.err(), Some(cycle()));
        // The failed outer build released the slot
        assert!(slot.get_or_try_init(|| Ok(erase(Arc::new(3u8))), cycle).is_ok());
    }

    #[test]
    fn panicking_build_releases_the_slot() {
        let slot = SingletonSlot::new();
        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = slot.get_or_try_init(|| panic!("boom"), cycle);
        }));
        assert!(panicked.is_err());
        assert!(slot.get_or_try_init(|| Ok(erase(Arc::new(4u8))), cycle).is_ok());
    }
}
