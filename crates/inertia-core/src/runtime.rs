use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::collections::map::HashSet;
use crate::platform::RuntimeScheduler;
use crate::scope::ScopeId;

type Task = Box<dyn FnOnce() + 'static>;

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    invalid_scopes: RefCell<HashSet<ScopeId>>,
    pending_tasks: RefCell<VecDeque<Task>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            invalid_scopes: RefCell::new(HashSet::new()),
            pending_tasks: RefCell::new(VecDeque::new()),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn register_invalid_scope(&self, id: ScopeId) {
        let inserted = self.invalid_scopes.borrow_mut().insert(id);
        if inserted {
            self.schedule();
        }
    }

    fn mark_scope_recomposed(&self, id: ScopeId) {
        self.invalid_scopes.borrow_mut().remove(&id);
        self.settle();
    }

    fn has_invalid_scopes(&self) -> bool {
        !self.invalid_scopes.borrow().is_empty()
    }

    fn enqueue_task(&self, task: Task) {
        self.pending_tasks.borrow_mut().push_back(task);
        self.schedule();
    }

    // Only tasks queued before this call run now; anything they spawn waits
    // for the following drain.
    fn drain_tasks(&self) -> usize {
        let tasks: Vec<Task> = self.pending_tasks.borrow_mut().drain(..).collect();
        let count = tasks.len();
        for task in tasks {
            task();
        }
        self.settle();
        count
    }

    fn has_tasks(&self) -> bool {
        !self.pending_tasks.borrow().is_empty()
    }

    fn settle(&self) {
        if !self.has_invalid_scopes() && !self.has_tasks() {
            self.needs_frame.set(false);
        }
    }
}

/// Owner of the runtime state. Dropping the last `Runtime` turns every
/// outstanding [`RuntimeHandle`] into a no-op.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

#[derive(Clone)]
pub struct RuntimeHandle(pub(crate) Weak<RuntimeInner>);

impl fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("alive", &(self.0.strong_count() > 0))
            .finish()
    }
}

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.schedule();
        }
    }

    /// Queues `task` for the next tick. The host runs it after committing the
    /// frame that was pending when the task was queued.
    pub fn spawn_task(&self, task: Box<dyn FnOnce() + 'static>) {
        if let Some(inner) = self.0.upgrade() {
            inner.enqueue_task(task);
        } else {
            task();
        }
    }

    /// Runs the tasks queued so far and returns how many ran.
    pub fn drain_tasks(&self) -> usize {
        self.0
            .upgrade()
            .map(|inner| inner.drain_tasks())
            .unwrap_or(0)
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.has_tasks())
            .unwrap_or(false)
    }

    pub fn has_invalid_scopes(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.has_invalid_scopes())
            .unwrap_or(false)
    }

    pub fn needs_frame(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub(crate) fn register_invalid_scope(&self, id: ScopeId) {
        if let Some(inner) = self.0.upgrade() {
            inner.register_invalid_scope(id);
        }
    }

    pub(crate) fn mark_scope_recomposed(&self, id: ScopeId) {
        if let Some(inner) = self.0.upgrade() {
            inner.mark_scope_recomposed(id);
        }
    }
}
