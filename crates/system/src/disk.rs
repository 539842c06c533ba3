use crate::used_percent;
use std::path::Path;
use sysgraph_core::{MetricKind, MonitorError, Result};
use sysinfo::Disks;

/// Used space of the filesystem mounted exactly at `mount`.
pub fn read(mount: &Path) -> Result<f32> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|d| d.mount_point() == mount)
        .ok_or_else(|| {
            MonitorError::unavailable(
                MetricKind::Disk,
                format!("no filesystem mounted at '{}'", mount.display()),
            )
        })?;

    used_percent(disk.total_space(), disk.available_space()).ok_or_else(|| {
        MonitorError::unavailable(
            MetricKind::Disk,
            format!("'{}' reports zero capacity", mount.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mount_is_unavailable() {
        let err = read(Path::new("/definitely/not/a/mount/point")).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::SensorUnavailable { kind: MetricKind::Disk, .. }
        ));
    }
}
