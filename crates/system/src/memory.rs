use crate::used_percent;
use sysgraph_core::{MetricKind, MonitorError, Result};
use sysinfo::System;

/// Share of physical memory in use, counting reclaimable cache as free.
pub fn read(sys: &mut System) -> Result<f32> {
    sys.refresh_memory();
    used_percent(sys.total_memory(), sys.available_memory())
        .ok_or_else(|| MonitorError::unavailable(MetricKind::Memory, "total memory reported as 0"))
}
