//! Platform abstraction traits for the reactive runtime.
//!
//! These traits let the runtime delegate frame scheduling and wall-clock
//! reads to the host, so the adapter can run under a real event loop or a
//! deterministic test harness without depending directly on `std` APIs.

/// Schedules work for the runtime.
///
/// Implementations are responsible for waking the host so that it drives the
/// next frame. They must be safe to use from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides wall-clock time to the runtime.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary but fixed epoch.
    fn now_millis(&self) -> u64;
}
