#![doc = r"Reactive runtime pieces shared by the Inertia adapter crates."]

pub mod collections;
pub mod composition;
pub mod mutable_state;
pub mod platform;
pub mod runtime;
mod scope;

pub use composition::Composition;
pub use mutable_state::{MutableState, State};
pub use platform::{Clock, RuntimeScheduler};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};
pub use scope::{untracked, RecomposeScope};

/// Creates a state cell bound to `runtime`.
pub fn mutable_state_of<T: Clone + 'static>(value: T, runtime: &RuntimeHandle) -> MutableState<T> {
    MutableState::with_runtime(value, runtime.clone())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
