//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod singleton;

pub(crate) use circular::{singleton_cycle, ResolutionGuard};
pub(crate) use singleton::SingletonSlot;
