//! Testing utilities for the Inertia adapter: fake collaborators and a
//! headless swap harness.

mod fakes;
mod harness;

pub use fakes::{
    FakeFormHelper, FakeHeadManager, FakeHeadManagerFactory, FakeRouter, ManualClock, TestHost,
    VisitError,
};
pub use harness::{SwapHarness, HARNESS_START_MILLIS};

pub mod prelude {
    pub use crate::fakes::*;
    pub use crate::harness::*;
}
