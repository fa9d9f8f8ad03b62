use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread_local;

use crate::runtime::RuntimeHandle;

pub(crate) type ScopeId = usize;

static NEXT_SCOPE_ID: AtomicUsize = AtomicUsize::new(1);

fn next_scope_id() -> ScopeId {
    NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed)
}

pub(crate) struct RecomposeScopeInner {
    pub(crate) id: ScopeId,
    runtime: RuntimeHandle,
    invalid: Cell<bool>,
    enqueued: Cell<bool>,
}

impl RecomposeScopeInner {
    fn new(runtime: RuntimeHandle) -> Self {
        Self {
            id: next_scope_id(),
            runtime,
            invalid: Cell::new(false),
            enqueued: Cell::new(false),
        }
    }
}

/// A unit of re-evaluation. State reads performed while the scope is current
/// subscribe it; writes to those states invalidate it.
#[derive(Clone)]
pub struct RecomposeScope {
    pub(crate) inner: Rc<RecomposeScopeInner>,
}

impl RecomposeScope {
    pub(crate) fn new(runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(RecomposeScopeInner::new(runtime)),
        }
    }

    pub(crate) fn id(&self) -> ScopeId {
        self.inner.id
    }

    pub fn is_invalid(&self) -> bool {
        self.inner.invalid.get()
    }

    pub(crate) fn invalidate(&self) {
        self.inner.invalid.set(true);
        if !self.inner.enqueued.replace(true) {
            self.inner.runtime.register_invalid_scope(self.inner.id);
        }
    }

    pub(crate) fn mark_recomposed(&self) {
        self.inner.invalid.set(false);
        if self.inner.enqueued.replace(false) {
            self.inner.runtime.mark_scope_recomposed(self.inner.id);
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<RecomposeScopeInner> {
        Rc::downgrade(&self.inner)
    }
}

thread_local! {
    // `None` entries mark untracked regions.
    static CURRENT_SCOPE: RefCell<Vec<Option<RecomposeScope>>> = RefCell::new(Vec::new());
}

pub(crate) fn current_scope() -> Option<RecomposeScope> {
    CURRENT_SCOPE.with(|stack| stack.borrow().last().cloned().flatten())
}

struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        CURRENT_SCOPE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

fn with_entry<R>(entry: Option<RecomposeScope>, f: impl FnOnce() -> R) -> R {
    CURRENT_SCOPE.with(|stack| stack.borrow_mut().push(entry));
    let _guard = ScopeGuard;
    f()
}

pub(crate) fn with_scope<R>(scope: &RecomposeScope, f: impl FnOnce() -> R) -> R {
    with_entry(Some(scope.clone()), f)
}

/// Runs `f` without subscribing the surrounding scope to any state it reads.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    with_entry(None, f)
}
