use std::cell::RefCell;

use smallvec::SmallVec;

use crate::domain::ModuleName;

// The chain is an explicit per-thread stack rather than an inspection of the
// native call stack: a cycle diagnostic needs the exact sequence of module
// names in flight, and the call stack cannot provide that.
thread_local! {
    static CHAIN: RefCell<SmallVec<[ModuleName; 8]>> = RefCell::new(SmallVec::new());
}

/// Whether this thread of control is already resolving `name`. True means a
/// lazy import re-entered its own resolution: a true cycle.
pub(crate) fn contains(name: &ModuleName) -> bool {
    CHAIN.with(|chain| chain.borrow().iter().any(|n| n == name))
}

/// The in-flight module names on this thread, oldest first.
pub(crate) fn snapshot() -> Vec<ModuleName> {
    CHAIN.with(|chain| chain.borrow().to_vec())
}

/// RAII entry on the resolution chain; pops on drop so the chain stays
/// correct whether resolution succeeds, fails, or unwinds.
pub(crate) struct ChainGuard;

impl ChainGuard {
    pub(crate) fn push(name: &ModuleName) -> Self {
        CHAIN.with(|chain| chain.borrow_mut().push(name.clone()));
        Self
    }
}

impl Drop for ChainGuard {
    fn drop(&mut self) {
        CHAIN.with(|chain| {
            chain.borrow_mut().pop();
        });
    }
}
