//! Host metric acquisition and the periodic sampling scheduler.
//!
//! - [`MetricSource`]: one blocking percentage reading per [`MetricKind`].
//! - [`SysinfoSource`]: the real source, backed by `sysinfo`.
//! - [`Deadline`]: per-metric bound on how long a blocking read may run.
//! - [`FakeSource`]: scripted source for tests and fault injection.
//! - [`Scheduler`]: fixed-cadence tick driver running bodies off the async
//!   threads.

pub mod cpu;
pub mod deadline;
pub mod disk;
pub mod fake;
pub mod memory;
pub mod scheduler;
pub mod source;

pub use deadline::Deadline;
pub use fake::{FakeReading, FakeSource};
pub use scheduler::{Scheduler, TickStats};
pub use source::{MetricSource, SysinfoSource};

use sysgraph_core::MetricKind;

/// `(total - available) / total` as a percentage, `None` when `total` is 0.
pub(crate) fn used_percent(total: u64, available: u64) -> Option<f32> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some((used as f64 / total as f64 * 100.0) as f32)
}

/// Error helper for sensors that report nothing on this platform.
pub(crate) fn unsupported(kind: MetricKind) -> sysgraph_core::MonitorError {
    sysgraph_core::MonitorError::unavailable(kind, "not supported on this platform")
}
