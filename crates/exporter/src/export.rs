use serde::Serialize;
use std::future::Future;
use std::path::Path;
use sysgraph_config::ExportConfig;
use sysgraph_core::{MetricKind, MonitorError, Result};
use sysgraph_system::MetricSource;
use tokio::time;
use tracing::{debug, info, warn};

/// The exported document.  Values are percentages rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportSnapshot {
    pub cpu:    f32,
    pub memory: f32,
    pub disk:   f32,
}

/// Sample every metric once.  Blocks for the CPU averaging window.
pub fn collect(source: &mut dyn MetricSource) -> Result<ExportSnapshot> {
    let mut read = |kind| source.sample(kind).map(|r| round1(r.value()));
    Ok(ExportSnapshot {
        cpu:    read(MetricKind::Cpu)?,
        memory: read(MetricKind::Memory)?,
        disk:   read(MetricKind::Disk)?,
    })
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Replace `path` with `snapshot` as JSON.
///
/// Written to a sibling temp file first and renamed into place, so readers
/// never see a half-written document.
pub fn write_snapshot(path: &Path, snapshot: &ExportSnapshot) -> Result<()> {
    let json = serde_json::to_string(snapshot)
        .map_err(|e| MonitorError::Export(format!("serialize: {e}")))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Export immediately, then every `config.interval`, until `shutdown`
/// resolves.
///
/// A cycle where any metric fails is skipped and the previous file is kept.
pub async fn run<S, F>(config: &ExportConfig, source: S, shutdown: F) -> Result<()>
where
    S: MetricSource + 'static,
    F: Future<Output = ()>,
{
    info!(
        "Exporting to '{}' every {} ms",
        config.path.display(),
        config.interval_ms
    );

    let mut source = Box::new(source) as Box<dyn MetricSource>;
    let mut ticker = time::interval(config.interval());
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        // Sampling blocks; keep it off the async threads.
        let (returned, collected) = tokio::task::spawn_blocking(move || {
            let result = collect(source.as_mut());
            (source, result)
        })
        .await
        .map_err(|e| MonitorError::Export(format!("sampling task failed: {e}")))?;
        source = returned;

        match collected.and_then(|snapshot| {
            write_snapshot(&config.path, &snapshot)?;
            Ok(snapshot)
        }) {
            Ok(snapshot) => debug!(?snapshot, "exported"),
            Err(e) => warn!("Export skipped: {e}"),
        }
    }

    info!("Export stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use sysgraph_system::FakeSource;

    fn config(path: PathBuf, interval_ms: u64) -> ExportConfig {
        ExportConfig { path, interval_ms }
    }

    #[test]
    fn collect_reads_all_three_metrics() {
        let mut source = FakeSource::new()
            .steady(MetricKind::Cpu, 12.34)
            .steady(MetricKind::Memory, 150.0)
            .steady(MetricKind::Disk, 40.0);

        let snapshot = collect(&mut source).unwrap();
        assert_eq!(snapshot, ExportSnapshot { cpu: 12.3, memory: 100.0, disk: 40.0 });
    }

    #[test]
    fn writes_flat_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_metrics.json");

        write_snapshot(&path, &ExportSnapshot { cpu: 1.5, memory: 2.0, disk: 3.25 }).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"cpu": 1.5, "memory": 2.0, "disk": 3.25}));
    }

    #[tokio::test]
    async fn run_overwrites_file_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        let source = FakeSource::new()
            .script(MetricKind::Cpu, [sysgraph_system::FakeReading::Value(10.0)])
            .steady(MetricKind::Cpu, 20.0)
            .steady(MetricKind::Memory, 30.0)
            .steady(MetricKind::Disk, 40.0);

        run(&config(path.clone(), 100), source, time::sleep(Duration::from_millis(250)))
            .await
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["cpu"], 20.0);
        assert_eq!(value["disk"], 40.0);
    }

    #[tokio::test]
    async fn failing_metric_skips_the_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        let source = FakeSource::new()
            .steady(MetricKind::Cpu, 20.0)
            .failing(MetricKind::Disk)
            .steady(MetricKind::Memory, 30.0);

        run(&config(path.clone(), 100), source, time::sleep(Duration::from_millis(150)))
            .await
            .unwrap();

        assert!(!path.exists());
    }
}
